//! Test Module
//!
//! Crate-level tests for IncidentDesk.
//!
//! ## Test Categories
//! - `pipeline_tests`: end-to-end analysis scenarios and pipeline invariants
//! - `database_tests`: ticket store and analytics queries
//! - `desk_tests`: intake deadline and persistence-failure handling

pub mod desk_tests;

use crate::error::{AppError, Capability};
use crate::services::{GenerationParams, LabelScore, ModelCapabilities, SentimentOutput};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::time::{sleep, Duration};

// ============================================================================
// Scripted capabilities
// ============================================================================

/// Capabilities that answer from a fixed script and count their calls.
pub struct ScriptedCapabilities {
    /// Top zero-shot label; `None` fails the call.
    pub zero_shot_label: Option<String>,
    /// Answer zero-shot with an empty ranking instead of labels.
    pub zero_shot_empty: bool,
    /// Raw sentiment code; `None` fails the call.
    pub sentiment_label: Option<String>,
    /// Generated text; `None` fails the call.
    pub generated: Option<String>,
    pub delay_ms: u64,
    pub zero_shot_calls: AtomicUsize,
    pub sentiment_calls: AtomicUsize,
    pub generate_calls: AtomicUsize,
    pub last_prompt: Mutex<Option<String>>,
    pub last_params: Mutex<Option<GenerationParams>>,
}

impl ScriptedCapabilities {
    pub fn new(sentiment_label: &str) -> Self {
        Self {
            zero_shot_label: Some("General inquiry or information request".to_string()),
            zero_shot_empty: false,
            sentiment_label: Some(sentiment_label.to_string()),
            generated: Some("We are sorry for the inconvenience and are looking into it.".to_string()),
            delay_ms: 0,
            zero_shot_calls: AtomicUsize::new(0),
            sentiment_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            last_params: Mutex::new(None),
        }
    }

    pub fn negative() -> Self {
        Self::new("LABEL_0")
    }

    pub fn neutral() -> Self {
        Self::new("LABEL_1")
    }

    pub fn positive() -> Self {
        Self::new("LABEL_2")
    }

    pub fn with_zero_shot_label(mut self, label: &str) -> Self {
        self.zero_shot_label = Some(label.to_string());
        self
    }

    pub fn with_empty_zero_shot(mut self) -> Self {
        self.zero_shot_empty = true;
        self
    }

    pub fn with_generated(mut self, text: &str) -> Self {
        self.generated = Some(text.to_string());
        self
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    pub fn failing_zero_shot(mut self) -> Self {
        self.zero_shot_label = None;
        self
    }

    pub fn failing_sentiment(mut self) -> Self {
        self.sentiment_label = None;
        self
    }

    pub fn failing_generation(mut self) -> Self {
        self.generated = None;
        self
    }

    pub fn total_calls(&self) -> usize {
        self.zero_shot_calls.load(Ordering::SeqCst)
            + self.sentiment_calls.load(Ordering::SeqCst)
            + self.generate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelCapabilities for ScriptedCapabilities {
    async fn zero_shot(
        &self,
        _text: &str,
        candidate_labels: &[&str],
        multi_label: bool,
    ) -> Result<Vec<LabelScore>, AppError> {
        self.zero_shot_calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(candidate_labels.len(), 5);
        assert!(!multi_label);

        if self.zero_shot_empty {
            return Ok(vec![]);
        }

        match &self.zero_shot_label {
            Some(label) => Ok(vec![
                LabelScore {
                    label: label.clone(),
                    score: 0.71,
                },
                LabelScore {
                    label: "runner-up".to_string(),
                    score: 0.12,
                },
            ]),
            None => Err(AppError::unavailable(Capability::ZeroShot, "scripted failure")),
        }
    }

    async fn sentiment(&self, _text: &str) -> Result<SentimentOutput, AppError> {
        self.sentiment_calls.fetch_add(1, Ordering::SeqCst);
        match &self.sentiment_label {
            Some(label) => Ok(SentimentOutput {
                label: label.clone(),
                score: 0.9,
            }),
            None => Err(AppError::unavailable(Capability::Sentiment, "scripted failure")),
        }
    }

    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, AppError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 {
            sleep(Duration::from_millis(self.delay_ms)).await;
        }
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }
        if let Ok(mut last) = self.last_params.lock() {
            *last = Some(params.clone());
        }

        match &self.generated {
            Some(text) => Ok(text.clone()),
            None => Err(AppError::unavailable(Capability::Generation, "scripted failure")),
        }
    }
}
