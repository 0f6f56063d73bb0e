//! Pipeline orchestrator for Chapterize.
//!
//! Coordinates one chapter request from URL to refined chapters:
//! extract the video ID, fetch the transcript, draft chapters, refine them.
//! Stages run strictly in order and the first failure aborts the request.

use crate::chapters::{Chapter, ChapterDrafter, ChapterRefiner};
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::llm::{GeminiClient, GenerativeModel};
use crate::transcript::{full_text, TranscriptEntry, TranscriptFetcher, TranscriptProvider, YtDlpProvider};
use crate::video::extract_video_id;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A request to chapter one video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRequest {
    /// YouTube watch or short URL.
    pub url: String,
    /// Preferred transcript language; auto-detected when absent.
    #[serde(default)]
    pub language: Option<String>,
}

impl VideoRequest {
    pub fn new(url: impl Into<String>, language: Option<String>) -> Self {
        Self {
            url: url.into(),
            language,
        }
    }
}

/// The result of a chapter request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterResponse {
    pub success: bool,
    pub video_id: String,
    /// Language of the transcript that was used.
    pub language: String,
    pub transcript: Vec<TranscriptEntry>,
    pub full_text: String,
    /// Chapters from the draft pass, kept for comparison.
    pub initial_chapters: Vec<Chapter>,
    /// Refined chapters; the authoritative result.
    pub chapters: Vec<Chapter>,
}

/// Progress of a request through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    IdentifierExtracted,
    TranscriptFetched,
    Drafted,
    Refined,
    Responded,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::IdentifierExtracted => "identifier extracted",
            Stage::TranscriptFetched => "transcript fetched",
            Stage::Drafted => "drafted",
            Stage::Refined => "refined",
            Stage::Responded => "responded",
        };
        f.write_str(name)
    }
}

/// The main orchestrator for the Chapterize pipeline.
pub struct Orchestrator {
    fetcher: TranscriptFetcher,
    drafter: ChapterDrafter,
    refiner: ChapterRefiner,
}

impl Orchestrator {
    /// Create an orchestrator backed by yt-dlp and Gemini.
    ///
    /// Fails when the model API key is missing, so a misconfigured server
    /// never starts.
    pub fn new(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let api_key = settings.api_key()?;
        let model: Arc<dyn GenerativeModel> = Arc::new(GeminiClient::new(&settings.model, &api_key)?);
        let provider: Arc<dyn TranscriptProvider> = Arc::new(YtDlpProvider::with_config(&settings.youtube)?);

        info!("Using {} for chapter generation", settings.model.name);

        Ok(Self::with_components(settings, prompts, provider, model))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: &Settings,
        prompts: Prompts,
        provider: Arc<dyn TranscriptProvider>,
        model: Arc<dyn GenerativeModel>,
    ) -> Self {
        Self {
            fetcher: TranscriptFetcher::new(provider),
            drafter: ChapterDrafter::new(model.clone(), prompts.clone(), settings.drafting),
            refiner: ChapterRefiner::new(model, prompts, settings.refinement),
        }
    }

    /// Run the full pipeline for one request.
    #[instrument(skip(self, request), fields(url = %request.url))]
    pub async fn generate_chapters(&self, request: &VideoRequest) -> Result<ChapterResponse> {
        let mut stage = Stage::Received;

        let result = self.run(request, &mut stage).await;
        if let Err(e) = &result {
            warn!("Request failed after stage '{}': {}", stage, e);
        }
        result
    }

    async fn run(&self, request: &VideoRequest, stage: &mut Stage) -> Result<ChapterResponse> {
        let video_id = extract_video_id(&request.url)?;
        advance(stage, Stage::IdentifierExtracted);

        let transcript = self
            .fetcher
            .fetch_by_id(&video_id, request.language.as_deref())
            .await?;
        advance(stage, Stage::TranscriptFetched);
        info!(
            "Fetched {} transcript entries in '{}'",
            transcript.entries.len(),
            transcript.language
        );

        let initial_chapters = self.drafter.draft(&transcript.entries).await?;
        advance(stage, Stage::Drafted);

        let chapters = self
            .refiner
            .refine(&initial_chapters, &transcript.entries)
            .await?;
        advance(stage, Stage::Refined);

        let response = ChapterResponse {
            success: true,
            full_text: full_text(&transcript.entries),
            video_id,
            language: transcript.language,
            transcript: transcript.entries,
            initial_chapters,
            chapters,
        };
        advance(stage, Stage::Responded);

        Ok(response)
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    tracing::debug!("{} -> {}", stage, next);
    *stage = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChapterizeError;
    use crate::testing::{track, twenty_minute_captions, StubModel, StubProvider};

    const DRAFT: &str = "00:00 - Introduction\n02:00 - Background\n06:00 - Setup\n10:00 - Demo\n14:00 - Results\n18:00 - Wrap-up";
    const REFINED: &str = "Final chapters:\n00:00 - Introduction\n06:00 - Setup and Demo\n14:00 - Results and Wrap-up";

    fn orchestrator(provider: StubProvider, model: Arc<StubModel>) -> Orchestrator {
        Orchestrator::with_components(&Settings::default(), Prompts::default(), Arc::new(provider), model)
    }

    fn english_provider() -> StubProvider {
        StubProvider::new(vec![track("de", false), track("en", true)], twenty_minute_captions())
    }

    fn seconds(timestamp: &str) -> u64 {
        let (m, s) = timestamp.split_once(':').unwrap();
        m.parse::<u64>().unwrap() * 60 + s.parse::<u64>().unwrap()
    }

    #[tokio::test]
    async fn test_generate_chapters_end_to_end() {
        let model = Arc::new(StubModel::new(vec![Ok(DRAFT), Ok(REFINED)]));
        let orchestrator = orchestrator(english_provider(), model.clone());

        let response = orchestrator
            .generate_chapters(&VideoRequest::new("https://www.youtube.com/watch?v=abc123&t=5", None))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.video_id, "abc123");
        assert_eq!(response.language, "en");
        assert_eq!(response.transcript.len(), 10);
        assert_eq!(response.transcript[9].time, "18:00");
        assert!(response.full_text.starts_with("segment 1 narration segment 2"));
        assert_eq!(response.initial_chapters.len(), 6);

        assert!(!response.chapters.is_empty());
        let times: Vec<u64> = response.chapters.iter().map(|c| seconds(&c.timestamp)).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
        assert!(times.iter().all(|&t| t <= 1200));

        assert_eq!(model.call_count(), 2);
        assert!(model.prompt(1).contains("02:00 - Background"));
    }

    #[tokio::test]
    async fn test_requested_language_is_used() {
        let model = Arc::new(StubModel::new(vec![Ok(DRAFT), Ok(REFINED)]));
        let orchestrator = orchestrator(english_provider(), model);

        let response = orchestrator
            .generate_chapters(&VideoRequest::new("https://youtu.be/abc123?si=x", Some("de".to_string())))
            .await
            .unwrap();

        assert_eq!(response.video_id, "abc123");
        assert_eq!(response.language, "de");
    }

    #[tokio::test]
    async fn test_invalid_url_skips_everything() {
        let model = Arc::new(StubModel::new(vec![Ok(DRAFT), Ok(REFINED)]));
        let orchestrator = orchestrator(english_provider(), model.clone());

        let err = orchestrator
            .generate_chapters(&VideoRequest::new("https://vimeo.com/1", None))
            .await
            .unwrap_err();

        assert!(matches!(err, ChapterizeError::InvalidInput(_)));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_transcript_skips_model() {
        let model = Arc::new(StubModel::new(vec![Ok(DRAFT), Ok(REFINED)]));
        let orchestrator = orchestrator(StubProvider::new(vec![], vec![]), model.clone());

        let err = orchestrator
            .generate_chapters(&VideoRequest::new("https://youtu.be/abc", None))
            .await
            .unwrap_err();

        assert!(matches!(err, ChapterizeError::TranscriptFetch(_)));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_draft_failure_skips_refinement() {
        let model = Arc::new(StubModel::new(vec![Err("quota exceeded"), Ok(REFINED)]));
        let orchestrator = orchestrator(english_provider(), model.clone());

        let err = orchestrator
            .generate_chapters(&VideoRequest::new("https://youtu.be/abc", None))
            .await
            .unwrap_err();

        assert!(matches!(err, ChapterizeError::ChapterGeneration(_)));
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_refinement_failure() {
        let model = Arc::new(StubModel::new(vec![Ok(DRAFT), Err("service unavailable")]));
        let orchestrator = orchestrator(english_provider(), model);

        let err = orchestrator
            .generate_chapters(&VideoRequest::new("https://youtu.be/abc", None))
            .await
            .unwrap_err();

        assert!(matches!(err, ChapterizeError::ChapterRefinement(_)));
    }

    #[test]
    fn test_video_request_language_is_optional() {
        let request: VideoRequest = serde_json::from_str(r#"{"url": "https://youtu.be/x"}"#).unwrap();
        assert!(request.language.is_none());

        let request: VideoRequest =
            serde_json::from_str(r#"{"url": "https://youtu.be/x", "language": null}"#).unwrap();
        assert!(request.language.is_none());
    }
}
