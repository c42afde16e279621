use crate::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One entry of a ranked zero-shot result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

/// Raw output of the sentiment model. Only `label` is used downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentOutput {
    pub label: String,
    pub score: f32,
}

/// Decoding parameters passed to the text-generation capability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_length: u32,
    pub do_sample: bool,
    pub repetition_penalty: f32,
    pub no_repeat_ngram_size: u32,
}

/// Defines the model-backed capabilities the analysis pipeline calls into.
///
/// Implementations are constructed once and shared for the life of the
/// process. They must tolerate concurrent calls or serialize internally.
#[async_trait]
pub trait ModelCapabilities: Send + Sync + 'static {
    /// Ranks `candidate_labels` for `text`, best first.
    async fn zero_shot(
        &self,
        text: &str,
        candidate_labels: &[&str],
        multi_label: bool,
    ) -> Result<Vec<LabelScore>, AppError>;

    /// Returns the raw sentiment label code for `text`.
    async fn sentiment(&self, text: &str) -> Result<SentimentOutput, AppError>;

    /// Generates text for `prompt`.
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, AppError>;
}
