//! Configuration module for Chapterize.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{DraftPrompts, Prompts, RefinePrompts};
pub use settings::{
    GeneralSettings, ModelSettings, PromptSettings, ServerSettings, Settings, YoutubeSettings,
};
