//! Chapterize - YouTube chapter generation
//!
//! Turns a YouTube video into a navigable chapter list. The transcript is
//! fetched from YouTube, a generative model drafts chapters from it, and a
//! second model pass merges and prunes the draft.
//!
//! # Architecture
//!
//! - `video` - URL parsing and MM:SS formatting
//! - `transcript` - Transcript providers and language selection
//! - `llm` - Generative model abstraction and the Gemini client
//! - `chapters` - Draft and refinement passes, chapter line parsing
//! - `orchestrator` - Pipeline coordination for one request
//! - `config` - Settings and prompt templates
//! - `cli` - Command line interface and the HTTP server
//!
//! # Example
//!
//! ```rust,no_run
//! use chapterize::config::Settings;
//! use chapterize::orchestrator::{Orchestrator, VideoRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(&settings)?;
//!
//!     let request = VideoRequest::new("https://youtu.be/dQw4w9WgXcQ", None);
//!     let response = orchestrator.generate_chapters(&request).await?;
//!     for chapter in &response.chapters {
//!         println!("{}", chapter);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod chapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod transcript;
pub mod video;

#[cfg(test)]
mod testing;

pub use error::{ChapterizeError, Result};
