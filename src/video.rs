//! YouTube URL handling and timeline formatting.

use crate::error::{ChapterizeError, Result};

/// Extract the video ID from a YouTube URL.
///
/// A `v=` query parameter takes precedence over a `youtu.be/` short link.
/// The ID itself is not validated; a bogus ID fails later when the
/// transcript is fetched.
pub fn extract_video_id(url: &str) -> Result<String> {
    if let Some((_, rest)) = url.split_once("v=") {
        let id = rest.split('&').next().unwrap_or_default();
        return Ok(id.to_string());
    }

    if let Some((_, rest)) = url.split_once("youtu.be/") {
        let id = rest.split('?').next().unwrap_or_default();
        return Ok(id.to_string());
    }

    Err(ChapterizeError::InvalidInput("Invalid YouTube URL".to_string()))
}

/// Canonical watch URL for a video ID.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Format seconds as MM:SS.
///
/// There is no hour component: minutes keep counting past 99, so
/// `7507.0` renders as `125:07`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    format!("{:02}:{:02}", total / 60, total % 60)
}
