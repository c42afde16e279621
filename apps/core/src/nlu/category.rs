//! Complaint category classification.
//!
//! Two tiers:
//! 1. Keyword rules over the lower-cased text, first match wins (pure).
//! 2. Zero-shot model over descriptive label phrases, only on a rule miss.

use tracing::{debug, warn};

use super::analysis::CategorySource;
use super::labels::Category;
use crate::services::ModelCapabilities;

/// A keyword group mapped to one category.
struct KeywordRule {
    category: Category,
    keywords: &'static [&'static str],
}

/// Tested in order. Delivery outranks payment when both match.
const RULES: &[KeywordRule] = &[
    KeywordRule {
        category: Category::DeliveryDelay,
        keywords: &["deliver", "shipment", "courier", "not arrived", "hasn't arrived"],
    },
    KeywordRule {
        category: Category::PaymentIssue,
        keywords: &["payment", "charged", "deducted", "billing"],
    },
    KeywordRule {
        category: Category::RefundRequest,
        keywords: &["refund", "return money"],
    },
    KeywordRule {
        category: Category::TechnicalProblem,
        keywords: &["crash", "error", "bug", "not working", "website"],
    },
];

/// Candidate phrases for the zero-shot model, one per category.
pub const CANDIDATE_LABELS: [&str; 5] = [
    "Delivery delay issue related to late or missing shipment",
    "Payment issue related to transaction or billing problem",
    "Technical problem related to website, app, or system malfunction",
    "Refund request for cancelled or returned order",
    "General inquiry or information request",
];

/// Substrings that identify a category inside a ranked label.
const LABEL_MARKERS: &[(&str, Category)] = &[
    ("delivery delay", Category::DeliveryDelay),
    ("payment issue", Category::PaymentIssue),
    ("technical problem", Category::TechnicalProblem),
    ("refund request", Category::RefundRequest),
];

/// Outcome of the full two-tier classification.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDecision {
    pub category: Category,
    pub source: CategorySource,
}

impl CategoryDecision {
    pub fn is_fallback(&self) -> bool {
        self.source == CategorySource::Fallback
    }
}

/// Runs the keyword rules. Returns the category and the keyword that fired.
pub fn match_rules(text: &str) -> Option<(Category, &'static str)> {
    let text_lower = text.to_lowercase();

    RULES.iter().find_map(|rule| {
        rule.keywords
            .iter()
            .find(|kw| text_lower.contains(**kw))
            .map(|kw| (rule.category, *kw))
    })
}

/// Maps a zero-shot label back to its canonical category.
pub fn category_from_label(label: &str) -> Category {
    let label_lower = label.to_lowercase();
    LABEL_MARKERS
        .iter()
        .find(|(marker, _)| label_lower.contains(marker))
        .map(|(_, category)| *category)
        .unwrap_or(Category::GeneralInquiry)
}

/// Classifies with rules first and the zero-shot capability on a miss.
///
/// Never fails: an unavailable or empty zero-shot answer resolves to
/// General Inquiry with a `Fallback` source.
pub async fn classify_with_fallback<C>(capabilities: &C, text: &str) -> CategoryDecision
where
    C: ModelCapabilities + ?Sized,
{
    if let Some((category, keyword)) = match_rules(text) {
        debug!("Category rule matched '{}' -> {}", keyword, category);
        return CategoryDecision {
            category,
            source: CategorySource::Rule {
                keyword: keyword.to_string(),
            },
        };
    }

    match capabilities.zero_shot(text, &CANDIDATE_LABELS, false).await {
        Ok(ranked) => match ranked.into_iter().next() {
            Some(top) => {
                let category = category_from_label(&top.label);
                debug!(
                    "Zero-shot top label '{}' ({:.2}) -> {}",
                    top.label, top.score, category
                );
                CategoryDecision {
                    category,
                    source: CategorySource::ZeroShot {
                        label: top.label,
                        score: top.score,
                    },
                }
            }
            None => {
                warn!("Zero-shot classifier returned no labels, defaulting to General Inquiry");
                fallback()
            }
        },
        Err(e) => {
            warn!("Zero-shot classification failed, defaulting to General Inquiry: {}", e);
            fallback()
        }
    }
}

fn fallback() -> CategoryDecision {
    CategoryDecision {
        category: Category::GeneralInquiry,
        source: CategorySource::Fallback,
    }
}
