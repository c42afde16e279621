use crate::database;
use crate::error::AppError;
use crate::nlu::{AnalysisResult, ComplaintAnalyzer};
use crate::services::ModelCapabilities;
use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// What happened when the analysis was handed to the ticket store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistenceOutcome {
    Stored { ticket_id: i64 },
    /// The analysis is still valid; only the write was lost.
    Failed { reason: String },
    /// No ticket store configured.
    Disabled,
}

/// A completed analysis and its persistence outcome.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    pub persistence: PersistenceOutcome,
}

impl Submission {
    pub fn ticket_id(&self) -> Option<i64> {
        match self.persistence {
            PersistenceOutcome::Stored { ticket_id } => Some(ticket_id),
            _ => None,
        }
    }
}

/// Entry point for complaint intake and analytics.
///
/// Runs the analyzer under a deadline and appends the result to the ticket
/// store. Persistence never discards a finished analysis.
pub struct IncidentDesk<C: ?Sized> {
    analyzer: ComplaintAnalyzer<C>,
    pool: Option<SqlitePool>,
    analysis_timeout: Duration,
}

impl<C> IncidentDesk<C>
where
    C: ModelCapabilities + ?Sized,
{
    pub fn new(
        analyzer: ComplaintAnalyzer<C>,
        pool: Option<SqlitePool>,
        analysis_timeout: Duration,
    ) -> Self {
        Self {
            analyzer,
            pool,
            analysis_timeout,
        }
    }

    /// Analyzes a complaint and records it as a ticket.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for blank text, `Timeout` when the analysis exceeds the
    /// deadline, `CapabilityUnavailable` when a hard-required capability fails.
    /// Store failures are reported in the returned `Submission` instead.
    #[instrument(skip(self, complaint), fields(request_id = %Uuid::new_v4()))]
    pub async fn submit(&self, complaint: &str) -> Result<Submission, AppError> {
        let analysis = timeout(self.analysis_timeout, self.analyzer.analyze(complaint)).await??;

        let persistence = match &self.pool {
            None => PersistenceOutcome::Disabled,
            Some(pool) => match database::insert_ticket(pool, &analysis).await {
                Ok(ticket_id) => {
                    info!("Ticket #{} created", ticket_id);
                    PersistenceOutcome::Stored { ticket_id }
                }
                Err(e) => {
                    let err = AppError::Database(e);
                    error!("Failed to store ticket, returning analysis anyway: {}", err);
                    PersistenceOutcome::Failed {
                        reason: err.to_string(),
                    }
                }
            },
        };

        Ok(Submission {
            analysis,
            persistence,
        })
    }
}
