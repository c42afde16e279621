//! Analysis Result - Output structure of the complaint pipeline.

use serde::{Deserialize, Serialize};

use super::labels::{Category, Priority, Sentiment};

/// How the category was decided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategorySource {
    /// A keyword rule matched.
    Rule { keyword: String },
    /// The zero-shot model ranked this label first.
    ZeroShot { label: String, score: f32 },
    /// Neither path produced a category; defaulted to General Inquiry.
    Fallback,
}

/// A stage that fell back to its safe default instead of failing the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degradation {
    CategoryFallback,
    SentimentFallback,
    ReplyUnavailable,
}

/// Immutable result of analyzing one complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub complaint_text: String,
    pub category: Category,
    pub sentiment: Sentiment,
    pub priority: Priority,
    pub department: String,
    pub escalation_flag: bool,
    pub reply_text: String,
    pub category_source: CategorySource,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degradations: Vec<Degradation>,
}

impl AnalysisResult {
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}
