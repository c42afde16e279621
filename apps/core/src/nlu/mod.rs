//! # NLU Module
//!
//! Complaint analysis for IncidentDesk.
//!
//! ## Components
//! - `category`: keyword rules (fast path) with zero-shot fallback
//! - `sentiment`: raw sentiment label mapping
//! - `priority`: sentiment + urgency keyword scoring
//! - `routing`: category to department table
//! - `escalation`: escalation rule
//! - `reply`: reply prompt and output cleanup
//! - `analysis`: output data structure
//! - `analyzer`: main orchestrator

pub mod analysis;
pub mod analyzer;
pub mod category;
pub mod escalation;
pub mod labels;
pub mod priority;
pub mod reply;
pub mod routing;
pub mod sentiment;

pub use analysis::{AnalysisResult, CategorySource, Degradation};
pub use analyzer::{validate_complaint, AnalyzerOptions, ComplaintAnalyzer};
pub use labels::{Category, Priority, Sentiment};
