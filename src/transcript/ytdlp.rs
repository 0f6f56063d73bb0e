//! Transcript provider backed by yt-dlp.
//!
//! yt-dlp resolves the caption tracks of a video (it already tracks
//! YouTube's moving player internals); the captions themselves are then
//! downloaded directly in YouTube's `json3` timed-text format.

use super::{RawCaption, TranscriptProvider, TranscriptTrack};
use crate::config::YoutubeSettings;
use crate::error::{ChapterizeError, Result};
use crate::video::watch_url;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// Suffix yt-dlp appends to the original-language speech recognition track.
const ORIGINAL_SUFFIX: &str = "-orig";

/// yt-dlp based transcript provider.
pub struct YtDlpProvider {
    ytdlp_path: String,
    caption_format: String,
    client: reqwest::Client,
}

impl YtDlpProvider {
    /// Create a provider from settings.
    pub fn with_config(settings: &YoutubeSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            ytdlp_path: settings.ytdlp_path.clone(),
            caption_format: settings.caption_format.clone(),
            client,
        })
    }

    /// Run yt-dlp and return the video's metadata JSON.
    async fn dump_metadata(&self, video_id: &str) -> Result<Value> {
        let url = watch_url(video_id);

        let output = tokio::process::Command::new(&self.ytdlp_path)
            .args(["--dump-json", "--skip-download", "--no-warnings", &url])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ChapterizeError::ToolNotFound(self.ytdlp_path.clone())
                } else {
                    ChapterizeError::TranscriptFetch(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ChapterizeError::TranscriptFetch(format!(
                "Video {} not found or unavailable: {}",
                video_id,
                stderr.trim()
            )));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            ChapterizeError::TranscriptFetch(format!("Failed to parse yt-dlp output: {}", e))
        })
    }
}

#[async_trait]
impl TranscriptProvider for YtDlpProvider {
    #[instrument(skip(self))]
    async fn list_tracks(&self, video_id: &str) -> Result<Vec<TranscriptTrack>> {
        let metadata = self.dump_metadata(video_id).await?;
        let tracks = parse_track_listing(&metadata, &self.caption_format);
        debug!(
            "Listed tracks: {}",
            tracks
                .iter()
                .map(|t| t.language_code.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(tracks)
    }

    #[instrument(skip(self, track), fields(language = %track.language_code))]
    async fn fetch_track(&self, video_id: &str, track: &TranscriptTrack) -> Result<Vec<RawCaption>> {
        let response = self.client.get(&track.url).send().await?;

        if !response.status().is_success() {
            return Err(ChapterizeError::TranscriptFetch(format!(
                "Caption download for {} ({}) failed with status {}",
                video_id,
                track.language_code,
                response.status()
            )));
        }

        let body = response.text().await?;
        parse_json3(&body)
    }
}

/// Extract native caption tracks from yt-dlp metadata.
///
/// Manual subtitles are listed before automatic captions. Automatic
/// captions that YouTube machine-translates on the fly (their URL carries a
/// `tlang` parameter) are not native tracks and are skipped, as are tracks
/// without a download in `format`.
pub fn parse_track_listing(metadata: &Value, format: &str) -> Vec<TranscriptTrack> {
    let mut tracks = Vec::new();

    for (key, generated) in [("subtitles", false), ("automatic_captions", true)] {
        let Some(languages) = metadata.get(key).and_then(Value::as_object) else {
            continue;
        };

        for (code, formats) in languages {
            if code == "live_chat" {
                continue;
            }

            let Some(entry) = formats
                .as_array()
                .and_then(|list| list.iter().find(|f| f["ext"].as_str() == Some(format)))
            else {
                continue;
            };

            let Some(url) = entry["url"].as_str() else {
                continue;
            };

            if generated && is_translated(url) {
                continue;
            }

            let language_code = code.strip_suffix(ORIGINAL_SUFFIX).unwrap_or(code).to_string();

            if tracks
                .iter()
                .any(|t: &TranscriptTrack| t.language_code == language_code && t.is_generated == generated)
            {
                continue;
            }

            tracks.push(TranscriptTrack {
                language_code,
                language_name: entry["name"].as_str().map(str::to_string),
                is_generated: generated,
                url: url.to_string(),
            });
        }
    }

    tracks
}

fn is_translated(caption_url: &str) -> bool {
    url::Url::parse(caption_url)
        .map(|u| u.query_pairs().any(|(k, _)| k == "tlang"))
        .unwrap_or(false)
}

#[derive(Debug, Deserialize)]
struct Json3Document {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(rename = "tStartMs", default)]
    start_ms: u64,
    #[serde(rename = "dDurationMs", default)]
    duration_ms: u64,
    segs: Option<Vec<Json3Segment>>,
}

#[derive(Debug, Deserialize)]
struct Json3Segment {
    #[serde(default)]
    utf8: String,
}

/// Parse a `json3` timed-text document into captions.
///
/// Events without text segments (window and style events) are skipped.
pub fn parse_json3(body: &str) -> Result<Vec<RawCaption>> {
    let document: Json3Document = serde_json::from_str(body).map_err(|e| {
        ChapterizeError::TranscriptFetch(format!("Malformed caption payload: {}", e))
    })?;

    let captions = document
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs?.into_iter().map(|s| s.utf8).collect();
            let text = text.replace('\n', " ").trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(RawCaption {
                start: event.start_ms as f64 / 1000.0,
                duration: event.duration_ms as f64 / 1000.0,
                text,
            })
        })
        .collect();

    Ok(captions)
}
