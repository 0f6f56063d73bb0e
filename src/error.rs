//! Error types for Chapterize.

use thiserror::Error;

/// Library-level error type for Chapterize operations.
#[derive(Error, Debug)]
pub enum ChapterizeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Error fetching transcript: {0}")]
    TranscriptFetch(String),

    #[error("Error generating chapters with AI: {0}")]
    ChapterGeneration(String),

    #[error("Error refining chapters with AI: {0}")]
    ChapterRefinement(String),

    #[error("Model API error: {0}")]
    Model(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Chapterize operations.
pub type Result<T> = std::result::Result<T, ChapterizeError>;
