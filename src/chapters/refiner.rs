//! Second chapter pass: merge and prune a draft against the transcript.

use super::{format_chapter_lines, parse_chapter_lines, Chapter};
use crate::config::Prompts;
use crate::error::{ChapterizeError, Result};
use crate::llm::{GenerativeModel, SamplingConfig};
use crate::transcript::{timestamped_text, TranscriptEntry};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Refines a drafted chapter list.
pub struct ChapterRefiner {
    model: Arc<dyn GenerativeModel>,
    prompts: Prompts,
    sampling: SamplingConfig,
}

impl ChapterRefiner {
    pub fn new(model: Arc<dyn GenerativeModel>, prompts: Prompts, sampling: SamplingConfig) -> Self {
        Self {
            model,
            prompts,
            sampling,
        }
    }

    /// Build the refinement prompt.
    pub fn build_prompt(&self, initial: &[Chapter], transcript: &[TranscriptEntry]) -> String {
        let mut vars = HashMap::new();
        vars.insert("initial_chapters".to_string(), format_chapter_lines(initial));
        vars.insert("transcript".to_string(), timestamped_text(transcript));
        self.prompts.render_with_custom(&self.prompts.refine.template, &vars)
    }

    /// Ask the model to merge and prune the draft.
    ///
    /// The reply is parsed exactly like the draft reply.
    #[instrument(skip_all, fields(initial = initial.len(), model = %self.model.model_name()))]
    pub async fn refine(&self, initial: &[Chapter], transcript: &[TranscriptEntry]) -> Result<Vec<Chapter>> {
        let prompt = self.build_prompt(initial, transcript);

        let reply = self
            .model
            .generate(&prompt, &self.sampling)
            .await
            .map_err(|e| ChapterizeError::ChapterRefinement(e.to_string()))?;

        debug!("Refinement reply:\n{}", reply);

        let chapters = parse_chapter_lines(&reply);
        info!("Refined {} chapter(s) into {}", initial.len(), chapters.len());

        Ok(chapters)
    }
}
