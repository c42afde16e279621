// IncidentDesk Core
// Complaint analysis, ticket log and incident analytics

pub mod config;
pub mod dashboard;
pub mod database;
pub mod desk;
pub mod error;
pub mod fs_manager;
pub mod models;
pub mod nlu;
pub mod services;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use desk::{IncidentDesk, PersistenceOutcome, Submission};
pub use error::AppError;
