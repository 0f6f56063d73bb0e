//! First chapter pass: propose chapters from the transcript.

use super::{parse_chapter_lines, Chapter};
use crate::config::Prompts;
use crate::error::{ChapterizeError, Result};
use crate::llm::{GenerativeModel, SamplingConfig};
use crate::transcript::{timestamped_text, TranscriptEntry};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Drafts an initial chapter list.
pub struct ChapterDrafter {
    model: Arc<dyn GenerativeModel>,
    prompts: Prompts,
    sampling: SamplingConfig,
}

impl ChapterDrafter {
    pub fn new(model: Arc<dyn GenerativeModel>, prompts: Prompts, sampling: SamplingConfig) -> Self {
        Self {
            model,
            prompts,
            sampling,
        }
    }

    /// Build the draft prompt for a transcript.
    pub fn build_prompt(&self, transcript: &[TranscriptEntry]) -> String {
        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), timestamped_text(transcript));
        self.prompts.render_with_custom(&self.prompts.draft.template, &vars)
    }

    /// Ask the model for a first chapter list.
    ///
    /// Lines of the reply that do not look like chapters are ignored, so the
    /// result may be empty. Only a failed model call is an error.
    #[instrument(skip_all, fields(entries = transcript.len(), model = %self.model.model_name()))]
    pub async fn draft(&self, transcript: &[TranscriptEntry]) -> Result<Vec<Chapter>> {
        let prompt = self.build_prompt(transcript);

        let reply = self
            .model
            .generate(&prompt, &self.sampling)
            .await
            .map_err(|e| ChapterizeError::ChapterGeneration(e.to_string()))?;

        debug!("Draft reply:\n{}", reply);

        let chapters = parse_chapter_lines(&reply);
        info!("Drafted {} chapter(s)", chapters.len());

        Ok(chapters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubModel;

    fn transcript() -> Vec<TranscriptEntry> {
        vec![
            TranscriptEntry::new(0.0, 5.0, "Welcome to the course"),
            TranscriptEntry::new(135.0, 5.0, "Let's install the tools"),
        ]
    }

    #[tokio::test]
    async fn test_draft_parses_reply() {
        let model = Arc::new(StubModel::new(vec![Ok(
            "00:00 - Introduction\nSome commentary\n02:15 - Setup and Installation\n",
        )]));
        let drafter = ChapterDrafter::new(model.clone(), Prompts::default(), SamplingConfig::drafting());

        let chapters = drafter.draft(&transcript()).await.unwrap();
        assert_eq!(
            chapters,
            vec![
                Chapter::new("00:00", "Introduction"),
                Chapter::new("02:15", "Setup and Installation"),
            ]
        );

        assert_eq!(model.call_count(), 1);
        let prompt = model.prompt(0);
        assert!(prompt.contains("[00:00] Welcome to the course\n[02:15] Let's install the tools"));
        assert!(!prompt.contains("{{transcript}}"));
        assert_eq!(model.sampling(0), SamplingConfig::drafting());
    }

    #[tokio::test]
    async fn test_draft_empty_reply_is_not_an_error() {
        let model = Arc::new(StubModel::new(vec![Ok("Sorry, nothing to chapter here.")]));
        let drafter = ChapterDrafter::new(model, Prompts::default(), SamplingConfig::drafting());

        let chapters = drafter.draft(&transcript()).await.unwrap();
        assert!(chapters.is_empty());
    }

    #[tokio::test]
    async fn test_draft_model_failure() {
        let model = Arc::new(StubModel::new(vec![Err("quota exceeded")]));
        let drafter = ChapterDrafter::new(model, Prompts::default(), SamplingConfig::drafting());

        let err = drafter.draft(&transcript()).await.unwrap_err();
        match err {
            ChapterizeError::ChapterGeneration(msg) => assert!(msg.contains("quota exceeded")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_build_prompt_uses_custom_template() {
        let mut prompts = Prompts::default();
        prompts.draft.template = "{{style}} chapters for:\n{{transcript}}".to_string();
        prompts.variables.insert("style".to_string(), "Short".to_string());

        let model = Arc::new(StubModel::new(vec![]));
        let drafter = ChapterDrafter::new(model, prompts, SamplingConfig::drafting());

        assert_eq!(
            drafter.build_prompt(&transcript()),
            "Short chapters for:\n[00:00] Welcome to the course\n[02:15] Let's install the tools"
        );
    }
}
