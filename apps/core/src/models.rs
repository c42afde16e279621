use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Decoding settings for the automated reply.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
pub struct ReplySettings {
    /// Upper bound on generated tokens.
    #[validate(range(min = 8, max = 512))]
    pub max_length: u32,
    /// Penalty applied to already generated tokens. 1.0 disables it.
    #[validate(range(min = 1.0, max = 5.0))]
    pub repetition_penalty: f32,
    /// Minimum distance between repeated n-grams of this size. 0 disables it.
    #[validate(range(max = 10))]
    pub no_repeat_ngram_size: u32,
    /// Hard character bound on the stored reply.
    #[validate(range(min = 16, max = 4000))]
    pub max_chars: usize,
}

impl Default for ReplySettings {
    fn default() -> Self {
        Self {
            max_length: 70,
            repetition_penalty: 1.8,
            no_repeat_ngram_size: 3,
            max_chars: 480,
        }
    }
}

/// A persisted, analyzed complaint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    /// Monotonically increasing identifier assigned by the store.
    pub id: i64,
    pub complaint_text: String,
    pub category: String,
    pub sentiment: String,
    pub priority: String,
    pub department: String,
    pub escalation_flag: bool,
    pub reply_text: String,
    /// Unix timestamp assigned at insert time.
    pub created_at: i64,
}

/// Number of tickets sharing one value of a grouped column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

/// Number of tickets created on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DailyCount {
    /// ISO date, `YYYY-MM-DD`.
    pub day: String,
    pub count: i64,
}
