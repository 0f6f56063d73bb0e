//! Generative text model access.

mod gemini;

pub use gemini::GeminiClient;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sampling parameters for a single generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
}

impl SamplingConfig {
    /// Sampling for drafting chapters.
    pub fn drafting() -> Self {
        Self {
            temperature: 0.3,
            top_p: 0.95,
            top_k: 40,
        }
    }

    /// Lower-temperature sampling for refining chapters.
    pub fn refinement() -> Self {
        Self {
            temperature: 0.1,
            ..Self::drafting()
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self::drafting()
    }
}

/// Trait for generative text models.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate free-form text for a prompt.
    async fn generate(&self, prompt: &str, sampling: &SamplingConfig) -> Result<String>;

    /// Name of the underlying model.
    fn model_name(&self) -> &str;
}
