//! Model-backed capabilities behind the `ModelCapabilities` trait.

pub mod embedding;
pub mod http;
pub mod inference;
pub mod traits;

pub use inference::InferenceServices;
pub use traits::{GenerationParams, LabelScore, ModelCapabilities, SentimentOutput};
