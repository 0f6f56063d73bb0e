//! Prompt templates for Chapterize.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub draft: DraftPrompts,
    pub refine: RefinePrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompt for the first chapter pass.
///
/// Available variables: `{{transcript}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftPrompts {
    pub template: String,
}

impl Default for DraftPrompts {
    fn default() -> Self {
        Self {
            template: r#"You are a video summarization assistant that writes clear, concise chapter timestamps for YouTube videos. Analyze the transcript below and identify only the major segments of the video.

1. Input
- The full transcript of a YouTube video, one line per caption, prefixed with its start time.
- If the transcript is not in English, translate it to English before doing anything else.

2. Chapters
- Only mark significant topic shifts: a clear, substantial change in content.
- Do not create chapters for minor transitions or repeated content. Group similar or consecutive content together.
- Scale the number of chapters to the video length. For a 20-minute video, aim for 5 to 8 chapters.
- Spread the chapters evenly so the beginning, middle and end of the video are all represented.
- Never place a timestamp beyond the end of the video.

3. Format
- Each chapter has an approximate start time in MM:SS format (e.g. 03:15) and a short descriptive title.
- List the chapters in chronological order. The first chapter is the introduction at or near 00:00.
- The last chapter covers the closing segment of the video.

TRANSCRIPT WITH TIMESTAMPS:
{{transcript}}

OUTPUT FORMAT (ONLY):
00:00 - Introduction
MM:SS - Chapter Title
MM:SS - Chapter Title
..."#
                .to_string(),
        }
    }
}

/// Prompt for the second chapter pass.
///
/// Available variables: `{{initial_chapters}}`, `{{transcript}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinePrompts {
    pub template: String,
}

impl Default for RefinePrompts {
    fn default() -> Self {
        Self {
            template: r#"You are an advanced video summarization assistant that refines chapter timestamps for YouTube videos. You receive a preliminary chapter list produced by another assistant together with the full transcript, and you produce the final, optimized chapter list.

1. Input
- The preliminary chapters, one per line, as MM:SS - Title.
- The full transcript, one line per caption, prefixed with its start time.
- If the transcript is not in English, translate it to English before doing anything else.

2. Review
- Check every preliminary chapter against the transcript.
- Remove chapters that are unnecessary, redundant or overly granular.
- Merge chapters that cover similar or consecutive topics so that each remaining chapter marks a significant topic shift.
- Make sure the chapters cover the whole video and are evenly distributed.

3. Final chapters
- For a 20-minute video, aim for 5 to 8 chapters and scale proportionally for other lengths.
- Never place a timestamp beyond the end of the video.
- Give every chapter a concise, descriptive title.
- List the chapters in chronological order, starting with the introduction at or near 00:00.

INITIAL CHAPTERS:
{{initial_chapters}}

TRANSCRIPT WITH TIMESTAMPS:
{{transcript}}

OUTPUT FORMAT (ONLY):
00:00 - Introduction
MM:SS - Chapter Title
MM:SS - Chapter Title
..."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let draft_path = custom_path.join("draft.toml");
            if draft_path.exists() {
                let content = std::fs::read_to_string(&draft_path)?;
                prompts.draft = toml::from_str(&content)?;
            }

            let refine_path = custom_path.join("refine.toml");
            if refine_path.exists() {
                let content = std::fs::read_to_string(&refine_path)?;
                prompts.refine = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
