//! Zero-shot classification using FastEmbed embeddings.
//!
//! Embeds the text and each candidate label with AllMiniLML6V2 and ranks the
//! labels by cosine similarity. Runs fully offline once the model is cached.

use crate::error::{AppError, Capability};
use crate::services::traits::LabelScore;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info, warn};

/// Embedding-backed zero-shot classifier.
pub struct EmbeddingZeroShot {
    model: TextEmbedding,
    /// Candidate labels repeat on every call; embed each only once.
    label_cache: Mutex<HashMap<String, Vec<f32>>>,
}

impl EmbeddingZeroShot {
    /// Loads the embedding model from `cache_dir`, downloading it if needed.
    ///
    /// Returns `None` when the model cannot be loaded, so callers can run
    /// without a zero-shot backend.
    pub fn new(cache_dir: PathBuf) -> Option<Self> {
        let mut options = InitOptions::new(EmbeddingModel::AllMiniLML6V2);
        options.show_download_progress = false;
        options.cache_dir = cache_dir;

        match TextEmbedding::try_new(options) {
            Ok(model) => {
                info!("Embedding model loaded for zero-shot classification");
                Some(Self {
                    model,
                    label_cache: Mutex::new(HashMap::new()),
                })
            }
            Err(e) => {
                warn!("Failed to load embedding model for zero-shot classification: {}", e);
                None
            }
        }
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>, AppError> {
        let mut embeddings = self
            .model
            .embed(vec![text.to_string()], None)
            .map_err(|e| AppError::unavailable(Capability::ZeroShot, format!("Embedding error: {}", e)))?;
        embeddings
            .pop()
            .ok_or_else(|| AppError::unavailable(Capability::ZeroShot, "empty embedding"))
    }

    fn label_embedding(&self, label: &str) -> Result<Vec<f32>, AppError> {
        if let Ok(cache) = self.label_cache.lock() {
            if let Some(embedding) = cache.get(label) {
                return Ok(embedding.clone());
            }
        }

        let embedding = self.embed_one(label)?;
        if let Ok(mut cache) = self.label_cache.lock() {
            cache.insert(label.to_string(), embedding.clone());
        }
        Ok(embedding)
    }

    /// Ranks `candidate_labels` by similarity to `text`, best first.
    pub fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<Vec<LabelScore>, AppError> {
        let query = self.embed_one(text)?;

        let mut ranked = candidate_labels
            .iter()
            .map(|label| {
                self.label_embedding(label).map(|emb| LabelScore {
                    label: label.to_string(),
                    score: cosine_similarity(&query, &emb),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        Ok(ranked)
    }
}

/// Calculate cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c) - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }
}
