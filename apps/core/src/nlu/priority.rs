use super::labels::{Priority, Sentiment};

/// Phrases that raise a negative complaint to High.
pub const HIGH_URGENCY_KEYWORDS: [&str; 13] = [
    "not delivered",
    "hasn't been delivered",
    "no update",
    "no response",
    "urgent",
    "immediately",
    "delay",
    "still waiting",
    "fraud",
    "worst",
    "complaint",
    "refund not received",
    "very frustrating",
];

/// Derives the priority from sentiment and urgency keywords.
///
/// Anything not Negative is Low. Negative is High with an urgency keyword,
/// Medium without.
pub fn prioritize(text: &str, sentiment: Sentiment) -> Priority {
    if sentiment != Sentiment::Negative {
        return Priority::Low;
    }

    let text_lower = text.to_lowercase();
    if HIGH_URGENCY_KEYWORDS.iter().any(|kw| text_lower.contains(kw)) {
        Priority::High
    } else {
        Priority::Medium
    }
}
