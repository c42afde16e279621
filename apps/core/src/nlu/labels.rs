//! Closed label sets produced by the analysis pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Complaint category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Delivery Delay")]
    DeliveryDelay,
    #[serde(rename = "Payment Issue")]
    PaymentIssue,
    #[serde(rename = "Technical Problem")]
    TechnicalProblem,
    #[serde(rename = "Refund Request")]
    RefundRequest,
    #[serde(rename = "General Inquiry")]
    GeneralInquiry,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::DeliveryDelay,
        Category::PaymentIssue,
        Category::TechnicalProblem,
        Category::RefundRequest,
        Category::GeneralInquiry,
    ];

    /// Canonical name, as stored in tickets.
    pub fn label(&self) -> &'static str {
        match self {
            Category::DeliveryDelay => "Delivery Delay",
            Category::PaymentIssue => "Payment Issue",
            Category::TechnicalProblem => "Technical Problem",
            Category::RefundRequest => "Refund Request",
            Category::GeneralInquiry => "General Inquiry",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Customer sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
            Sentiment::Positive => "Positive",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Ticket priority. Variant order gives `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
