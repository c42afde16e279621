use super::labels::{Priority, Sentiment};

/// Mentions that always escalate, whatever the sentiment.
pub const ESCALATION_KEYWORDS: [&str; 4] = ["legal", "court", "police", "fraud"];

/// Whether the complaint needs expedited human review.
pub fn evaluate(text: &str, priority: Priority, sentiment: Sentiment) -> bool {
    if priority == Priority::High && sentiment == Sentiment::Negative {
        return true;
    }

    let text_lower = text.to_lowercase();
    ESCALATION_KEYWORDS.iter().any(|kw| text_lower.contains(kw))
}
