//! Test doubles shared by unit tests.

use crate::error::{ChapterizeError, Result};
use crate::llm::{GenerativeModel, SamplingConfig};
use crate::transcript::{RawCaption, TranscriptProvider, TranscriptTrack};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Model that replays scripted replies in order and records its calls.
pub struct StubModel {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    pub calls: Mutex<Vec<(String, SamplingConfig)>>,
}

impl StubModel {
    pub fn new(replies: Vec<std::result::Result<&str, &str>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn prompt(&self, index: usize) -> String {
        self.calls.lock().unwrap()[index].0.clone()
    }

    pub fn sampling(&self, index: usize) -> SamplingConfig {
        self.calls.lock().unwrap()[index].1
    }
}

#[async_trait]
impl GenerativeModel for StubModel {
    async fn generate(&self, prompt: &str, sampling: &SamplingConfig) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), *sampling));

        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(msg)) => Err(ChapterizeError::Model(msg)),
            None => Err(ChapterizeError::Model("no scripted reply left".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

pub fn track(code: &str, generated: bool) -> TranscriptTrack {
    TranscriptTrack {
        language_code: code.to_string(),
        language_name: None,
        is_generated: generated,
        url: format!("https://captions.test/{}/{}", code, generated),
    }
}

/// Provider returning a fixed listing and recording which track was fetched.
pub struct StubProvider {
    pub tracks: Vec<TranscriptTrack>,
    pub captions: Vec<RawCaption>,
    pub fetched: Mutex<Option<TranscriptTrack>>,
    pub fail_listing: bool,
}

impl StubProvider {
    pub fn new(tracks: Vec<TranscriptTrack>, captions: Vec<RawCaption>) -> Self {
        Self {
            tracks,
            captions,
            fetched: Mutex::new(None),
            fail_listing: false,
        }
    }
}

#[async_trait]
impl TranscriptProvider for StubProvider {
    async fn list_tracks(&self, video_id: &str) -> Result<Vec<TranscriptTrack>> {
        if self.fail_listing {
            return Err(ChapterizeError::ToolNotFound(format!("yt-dlp ({})", video_id)));
        }
        Ok(self.tracks.clone())
    }

    async fn fetch_track(&self, _video_id: &str, track: &TranscriptTrack) -> Result<Vec<RawCaption>> {
        *self.fetched.lock().unwrap() = Some(track.clone());
        Ok(self.captions.clone())
    }
}

/// Ten captions spread evenly over the first twenty minutes.
pub fn twenty_minute_captions() -> Vec<RawCaption> {
    (0..10)
        .map(|i| RawCaption {
            start: i as f64 * 120.0,
            duration: 120.0,
            text: format!("segment {} narration", i + 1),
        })
        .collect()
}
