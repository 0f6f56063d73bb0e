//! Chapter generation from transcripts.
//!
//! Chapters are produced in two model passes. The [`ChapterDrafter`] proposes
//! chapters from the timestamped transcript; the [`ChapterRefiner`] reviews
//! that draft against the transcript and merges or prunes it. Both passes ask
//! for plain `MM:SS - Title` lines and read the reply with
//! [`parse_chapter_lines`].

mod drafter;
mod refiner;

pub use drafter::ChapterDrafter;
pub use refiner::ChapterRefiner;

use serde::{Deserialize, Serialize};

/// Separator between timestamp and title in model output.
const SEPARATOR: &str = " - ";

/// A chapter marker on the video timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Start time as written by the model, normally MM:SS.
    pub timestamp: String,
    pub title: String,
}

impl Chapter {
    pub fn new(timestamp: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            title: title.into(),
        }
    }
}

impl std::fmt::Display for Chapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.timestamp, SEPARATOR, self.title)
    }
}

/// Parse chapters from free-form model output.
///
/// A line is kept when it contains `" - "` and the text before the first
/// separator contains a `:`. Everything else is dropped, so this never
/// fails; an empty result is valid.
pub fn parse_chapter_lines(text: &str) -> Vec<Chapter> {
    text.trim()
        .split('\n')
        .filter_map(|line| {
            let (timestamp, title) = line.split_once(SEPARATOR)?;
            if !timestamp.contains(':') {
                return None;
            }
            Some(Chapter::new(timestamp.trim(), title.trim()))
        })
        .collect()
}

/// Render chapters as `MM:SS - Title` lines.
pub fn format_chapter_lines(chapters: &[Chapter]) -> String {
    chapters
        .iter()
        .map(Chapter::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_line() {
        let chapters = parse_chapter_lines("02:15 - Setup and Installation");
        assert_eq!(chapters, vec![Chapter::new("02:15", "Setup and Installation")]);
    }

    #[test]
    fn test_parse_drops_non_matching_lines() {
        let text = "Here are the chapters:\n\
                    00:00 - Introduction\n\
                    Random narration text\n\
                    Intro - no timestamp here\n\
                    04:30 - Core Concepts\n\
                    \n\
                    Hope this helps!";

        let chapters = parse_chapter_lines(text);
        assert_eq!(
            chapters,
            vec![
                Chapter::new("00:00", "Introduction"),
                Chapter::new("04:30", "Core Concepts"),
            ]
        );
    }

    #[test]
    fn test_parse_is_tolerant() {
        let text = "  * 01:00 - Setup: Tools - and Tips!  \r\n\
                    **10:00** -  Wrap-up  \n\
                    1:02:03 - Long video part";

        let chapters = parse_chapter_lines(text);
        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[0], Chapter::new("* 01:00", "Setup: Tools - and Tips!"));
        assert_eq!(chapters[1], Chapter::new("**10:00**", "Wrap-up"));
        assert_eq!(chapters[2].timestamp, "1:02:03");
    }

    #[test]
    fn test_parse_requires_spaced_separator() {
        assert!(parse_chapter_lines("03:00-Tight dash").is_empty());
        assert!(parse_chapter_lines("Title - 03:00").is_empty());
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_chapter_lines("").is_empty());
        assert!(parse_chapter_lines("I could not identify any chapters.").is_empty());
    }

    #[test]
    fn test_format_chapter_lines() {
        let chapters = vec![
            Chapter::new("00:00", "Introduction"),
            Chapter::new("05:10", "Deep Dive"),
        ];
        let text = format_chapter_lines(&chapters);
        assert_eq!(text, "00:00 - Introduction\n05:10 - Deep Dive");
        assert_eq!(parse_chapter_lines(&text), chapters);
    }
}
