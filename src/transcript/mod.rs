//! Transcript retrieval for YouTube videos.
//!
//! A [`TranscriptProvider`] lists the caption tracks available for a video
//! and fetches the raw captions of one track. The [`TranscriptFetcher`]
//! chooses the track to use and normalizes captions into
//! [`TranscriptEntry`] records with `MM:SS` display times.

mod ytdlp;

pub use ytdlp::YtDlpProvider;

use crate::error::{ChapterizeError, Result};
use crate::video::{extract_video_id, format_time};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Language code preferred when the caller does not ask for one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// One timestamped line of a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Start time formatted as MM:SS.
    pub time: String,
    /// Caption text.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
}

impl TranscriptEntry {
    /// Build an entry, deriving the display time from `start`.
    pub fn new(start: f64, duration: f64, text: impl Into<String>) -> Self {
        Self {
            time: format_time(start),
            text: text.into(),
            start,
            duration,
        }
    }
}

impl From<RawCaption> for TranscriptEntry {
    fn from(caption: RawCaption) -> Self {
        Self::new(caption.start, caption.duration, caption.text)
    }
}

/// A caption exactly as the provider returned it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCaption {
    pub start: f64,
    pub duration: f64,
    pub text: String,
}

/// A transcript available for a video in one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptTrack {
    /// Language code (e.g. "en", "de", "pt-BR").
    pub language_code: String,
    /// Human-readable language name, if the provider reports one.
    pub language_name: Option<String>,
    /// Whether the track was generated by speech recognition.
    pub is_generated: bool,
    /// Where the provider can download this track from.
    pub url: String,
}

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// List all transcript tracks available for a video.
    async fn list_tracks(&self, video_id: &str) -> Result<Vec<TranscriptTrack>>;

    /// Fetch the captions of one track, in chronological order.
    async fn fetch_track(&self, video_id: &str, track: &TranscriptTrack) -> Result<Vec<RawCaption>>;
}

/// A transcript together with the language that was actually used.
#[derive(Debug, Clone)]
pub struct FetchedTranscript {
    pub video_id: String,
    pub language: String,
    pub entries: Vec<TranscriptEntry>,
}

impl FetchedTranscript {
    /// All entry texts joined with single spaces.
    pub fn full_text(&self) -> String {
        full_text(&self.entries)
    }
}

/// Fetches transcripts and picks the language to use.
pub struct TranscriptFetcher {
    provider: Arc<dyn TranscriptProvider>,
}

impl TranscriptFetcher {
    pub fn new(provider: Arc<dyn TranscriptProvider>) -> Self {
        Self { provider }
    }

    /// Fetch the transcript for a YouTube URL.
    ///
    /// An unparseable URL fails with `InvalidInput`; every other failure is
    /// reported as `TranscriptFetch`.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str, language: Option<&str>) -> Result<FetchedTranscript> {
        let video_id = extract_video_id(url)?;
        self.fetch_by_id(&video_id, language).await
    }

    /// Fetch the transcript for an already extracted video ID.
    pub async fn fetch_by_id(&self, video_id: &str, language: Option<&str>) -> Result<FetchedTranscript> {
        let tracks = self
            .provider
            .list_tracks(video_id)
            .await
            .map_err(into_fetch_error)?;

        debug!("Found {} transcript track(s) for {}", tracks.len(), video_id);

        let track = select_track(video_id, &tracks, language)?;

        info!(
            "Fetching {} transcript ({}) for {}",
            track.language_code,
            if track.is_generated { "generated" } else { "manual" },
            video_id
        );

        let captions = self
            .provider
            .fetch_track(video_id, track)
            .await
            .map_err(into_fetch_error)?;

        let entries: Vec<TranscriptEntry> = captions.into_iter().map(TranscriptEntry::from).collect();

        Ok(FetchedTranscript {
            video_id: video_id.to_string(),
            language: track.language_code.clone(),
            entries,
        })
    }
}

/// Choose the track to fetch.
///
/// A requested language must match a listed code exactly. Without a request,
/// English is preferred and otherwise the first listed track is used.
/// Manually created tracks win over generated ones for the same code.
pub fn select_track<'a>(
    video_id: &str,
    tracks: &'a [TranscriptTrack],
    language: Option<&str>,
) -> Result<&'a TranscriptTrack> {
    if tracks.is_empty() {
        return Err(ChapterizeError::TranscriptFetch(format!(
            "No transcripts are available for video {}",
            video_id
        )));
    }

    let requested = language.map(str::trim).filter(|l| !l.is_empty());

    match requested {
        Some(code) => find_by_code(tracks, code).ok_or_else(|| {
            let available: Vec<&str> = tracks.iter().map(|t| t.language_code.as_str()).collect();
            ChapterizeError::TranscriptFetch(format!(
                "No transcript found for video {} in language '{}' (available: {})",
                video_id,
                code,
                available.join(", ")
            ))
        }),
        None => Ok(find_by_code(tracks, DEFAULT_LANGUAGE).unwrap_or(&tracks[0])),
    }
}

fn find_by_code<'a>(tracks: &'a [TranscriptTrack], code: &str) -> Option<&'a TranscriptTrack> {
    tracks
        .iter()
        .find(|t| t.language_code == code && !t.is_generated)
        .or_else(|| tracks.iter().find(|t| t.language_code == code))
}

fn into_fetch_error(err: ChapterizeError) -> ChapterizeError {
    match err {
        ChapterizeError::TranscriptFetch(_) => err,
        other => ChapterizeError::TranscriptFetch(other.to_string()),
    }
}

/// All entry texts joined with single spaces.
pub fn full_text(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|e| e.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render entries as `[MM:SS] text` lines for a prompt.
pub fn timestamped_text(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("[{}] {}", e.time, e.text))
        .collect::<Vec<_>>()
        .join("\n")
}
