use crate::config::{AppConfig, ZeroShotBackend};
use crate::error::{AppError, Capability};
use crate::fs_manager::PortablePathManager;
use crate::services::embedding::EmbeddingZeroShot;
use crate::services::http::HttpInferenceClient;
use crate::services::traits::{GenerationParams, LabelScore, ModelCapabilities, SentimentOutput};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

enum ZeroShot {
    Http { model: String },
    Embedding(Arc<EmbeddingZeroShot>),
    /// The configured backend failed to load.
    Missing,
}

/// Production capabilities: remote models behind one inference service,
/// optionally with local embedding zero-shot.
///
/// Construct once at startup and share it.
pub struct InferenceServices {
    client: HttpInferenceClient,
    zero_shot: ZeroShot,
    sentiment_model: String,
    reply_model: String,
    request_timeout: Duration,
}

impl InferenceServices {
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let client = HttpInferenceClient::new(
            &config.inference_url,
            config.inference_token.clone(),
            config.request_timeout(),
        )?;

        let zero_shot = match config.zero_shot_backend {
            ZeroShotBackend::Http => ZeroShot::Http {
                model: config.zero_shot_model.clone(),
            },
            ZeroShotBackend::Embedding => {
                let cache_dir = PortablePathManager::models_dir().join("embeddings");
                match EmbeddingZeroShot::new(cache_dir) {
                    Some(classifier) => ZeroShot::Embedding(Arc::new(classifier)),
                    None => {
                        warn!("Embedding zero-shot unavailable; unmatched complaints will be General Inquiry");
                        ZeroShot::Missing
                    }
                }
            }
        };

        info!(
            "Model capabilities ready (zero-shot: {:?}, sentiment: {}, reply: {})",
            config.zero_shot_backend, config.sentiment_model, config.reply_model
        );

        Ok(Self {
            client,
            zero_shot,
            sentiment_model: config.sentiment_model.clone(),
            reply_model: config.reply_model.clone(),
            request_timeout: config.request_timeout(),
        })
    }
}

/// Runs CPU-bound model work off the async workers, bounded by `limit`.
///
/// The blocking thread is not interrupted on timeout; its result is dropped.
async fn run_blocking<T, F>(capability: Capability, limit: Duration, work: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
{
    match timeout(limit, tokio::task::spawn_blocking(work)).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(AppError::unavailable(
            capability,
            format!("model task failed: {}", e),
        )),
        Err(_) => Err(AppError::unavailable(
            capability,
            format!("no result within {}ms", limit.as_millis()),
        )),
    }
}

#[async_trait]
impl ModelCapabilities for InferenceServices {
    async fn zero_shot(
        &self,
        text: &str,
        candidate_labels: &[&str],
        multi_label: bool,
    ) -> Result<Vec<LabelScore>, AppError> {
        match &self.zero_shot {
            ZeroShot::Http { model } => {
                self.client
                    .zero_shot(model, text, candidate_labels, multi_label)
                    .await
            }
            // Single-label ranking is all cosine similarity can express
            ZeroShot::Embedding(classifier) => {
                let classifier = Arc::clone(classifier);
                let text = text.to_string();
                let labels: Vec<String> = candidate_labels.iter().map(|l| l.to_string()).collect();

                run_blocking(Capability::ZeroShot, self.request_timeout, move || {
                    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
                    classifier.classify(&text, &labels)
                })
                .await
            }
            ZeroShot::Missing => Err(AppError::unavailable(
                Capability::ZeroShot,
                "embedding model not loaded",
            )),
        }
    }

    async fn sentiment(&self, text: &str) -> Result<SentimentOutput, AppError> {
        self.client.sentiment(&self.sentiment_model, text).await
    }

    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, AppError> {
        self.client.generate(&self.reply_model, prompt, params).await
    }
}
