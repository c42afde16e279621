//! Complaint Analyzer - Main orchestrator for the NLU module.
//!
//! Sequences the stages in dependency order:
//! 1. Category (keyword rules, zero-shot fallback)
//! 2. Sentiment
//! 3. Priority (needs sentiment)
//! 4. Department (needs category)
//! 5. Escalation (needs priority and sentiment)
//! 6. Reply draft (needs only the text)
//!
//! Holds no per-call state; one analyzer serves any number of calls.

use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

use super::analysis::{AnalysisResult, Degradation};
use super::category::classify_with_fallback;
use super::{escalation, priority, reply, routing, sentiment};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::ReplySettings;
use crate::services::ModelCapabilities;

/// Per-deployment knobs of the pipeline.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerOptions {
    pub reply: ReplySettings,
    /// Abort instead of degrading to Neutral when sentiment is unavailable.
    pub sentiment_required: bool,
}

impl From<&AppConfig> for AnalyzerOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            reply: config.reply.clone(),
            sentiment_required: config.sentiment_required,
        }
    }
}

pub struct ComplaintAnalyzer<C: ?Sized> {
    capabilities: Arc<C>,
    options: AnalyzerOptions,
}

impl<C: ?Sized> Clone for ComplaintAnalyzer<C> {
    fn clone(&self) -> Self {
        Self {
            capabilities: Arc::clone(&self.capabilities),
            options: self.options.clone(),
        }
    }
}

/// Rejects complaint text that has nothing to analyze.
pub fn validate_complaint(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Please enter a complaint text.".to_string(),
        ));
    }
    Ok(())
}

impl<C> ComplaintAnalyzer<C>
where
    C: ModelCapabilities + ?Sized,
{
    pub fn new(capabilities: Arc<C>, options: AnalyzerOptions) -> Self {
        Self {
            capabilities,
            options,
        }
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Analyzes one complaint.
    ///
    /// Fails with `InvalidInput` before any stage runs when the text is blank,
    /// and with `CapabilityUnavailable` only when sentiment is required and
    /// cannot be scored. Every other capability failure degrades.
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, AppError> {
        validate_complaint(text)?;

        let start = Instant::now();
        let capabilities = &*self.capabilities;
        let mut degradations = Vec::new();

        // 1. Category
        let decision = classify_with_fallback(capabilities, text).await;
        if decision.is_fallback() {
            degradations.push(Degradation::CategoryFallback);
        }

        // 2. Sentiment
        let sentiment = if self.options.sentiment_required {
            sentiment::score(capabilities, text).await?
        } else {
            let (sentiment, failure) = sentiment::score_or_neutral(capabilities, text).await;
            if failure.is_some() {
                degradations.push(Degradation::SentimentFallback);
            }
            sentiment
        };

        // 3-5. Local, total stages
        let priority = priority::prioritize(text, sentiment);
        let department = routing::route(decision.category);
        let escalation_flag = escalation::evaluate(text, priority, sentiment);

        // 6. Reply
        let reply_text = match reply::draft(capabilities, text, &self.options.reply).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Reply generation failed, storing an empty reply: {}", e);
                degradations.push(Degradation::ReplyUnavailable);
                String::new()
            }
        };

        info!(
            category = %decision.category,
            sentiment = %sentiment,
            priority = %priority,
            department,
            escalation_flag,
            degraded = !degradations.is_empty(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Complaint analyzed"
        );

        Ok(AnalysisResult {
            complaint_text: text.to_string(),
            category: decision.category,
            sentiment,
            priority,
            department: department.to_string(),
            escalation_flag,
            reply_text,
            category_source: decision.source,
            degradations,
        })
    }
}
