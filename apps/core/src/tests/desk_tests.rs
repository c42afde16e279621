//! Desk Tests
//!
//! Intake through `IncidentDesk::submit`: deadline, validation and the
//! persistence outcome reported alongside each analysis.

use super::ScriptedCapabilities;
use crate::database;
use crate::error::AppError;
use crate::nlu::{AnalyzerOptions, Category, ComplaintAnalyzer, Priority};
use crate::{IncidentDesk, PersistenceOutcome};
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tempfile::{tempdir, TempDir};

const COMPLAINT: &str = "My refund has not been processed and I am still waiting.";

async fn create_test_pool() -> (SqlitePool, TempDir) {
    let dir = tempdir().expect("Failed to create temp dir");
    let pool = database::init_db(&dir.path().join("desk.sqlite"))
        .await
        .expect("Failed to create test pool");
    (pool, dir)
}

fn desk(
    caps: ScriptedCapabilities,
    pool: Option<SqlitePool>,
    deadline: Duration,
) -> IncidentDesk<ScriptedCapabilities> {
    let analyzer = ComplaintAnalyzer::new(Arc::new(caps), AnalyzerOptions::default());
    IncidentDesk::new(analyzer, pool, deadline)
}

#[cfg(test)]
mod submit_tests {
    use super::*;

    #[tokio::test]
    async fn test_submit_stores_ticket() {
        let (pool, _dir) = create_test_pool().await;
        let desk = desk(
            ScriptedCapabilities::negative(),
            Some(pool.clone()),
            Duration::from_secs(5),
        );

        let submission = desk.submit(COMPLAINT).await.unwrap();
        let id = submission.ticket_id().expect("ticket should be stored");

        assert_eq!(submission.analysis.category, Category::RefundRequest);
        assert_eq!(submission.analysis.priority, Priority::High);

        let tickets = database::get_all_tickets(&pool).await.unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].id, id);
        assert_eq!(tickets[0].category, "Refund Request");
        assert_eq!(tickets[0].department, "Accounts");
        assert_eq!(tickets[0].reply_text, submission.analysis.reply_text);
    }

    #[tokio::test]
    async fn test_submit_without_store_is_disabled() {
        let desk = desk(ScriptedCapabilities::neutral(), None, Duration::from_secs(5));

        let submission = desk.submit(COMPLAINT).await.unwrap();
        assert_eq!(submission.persistence, PersistenceOutcome::Disabled);
        assert_eq!(submission.ticket_id(), None);
    }

    #[tokio::test]
    async fn test_blank_complaint_writes_nothing() {
        let (pool, _dir) = create_test_pool().await;
        let desk = desk(
            ScriptedCapabilities::negative(),
            Some(pool.clone()),
            Duration::from_secs(5),
        );

        let err = desk.submit("   ").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(err.is_user_correctable());
        assert_eq!(database::count_tickets(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_submission_serializes_flat() {
        let desk = desk(ScriptedCapabilities::negative(), None, Duration::from_secs(5));
        let submission = desk.submit(COMPLAINT).await.unwrap();

        let value = serde_json::to_value(&submission).unwrap();
        assert_eq!(value["category"], "Refund Request");
        assert_eq!(value["persistence"]["status"], "disabled");
    }
}

#[cfg(test)]
mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_slow_analysis_times_out() {
        let (pool, _dir) = create_test_pool().await;
        let desk = desk(
            ScriptedCapabilities::negative().with_delay(500),
            Some(pool.clone()),
            Duration::from_millis(50),
        );

        let err = desk.submit(COMPLAINT).await.unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)));
        assert_eq!(database::count_tickets(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_keeps_analysis() {
        let (pool, _dir) = create_test_pool().await;
        sqlx::query("DROP TABLE tickets")
            .execute(&pool)
            .await
            .unwrap();

        let desk = desk(
            ScriptedCapabilities::negative(),
            Some(pool),
            Duration::from_secs(5),
        );

        let submission = desk.submit(COMPLAINT).await.unwrap();
        assert!(matches!(
            submission.persistence,
            PersistenceOutcome::Failed { .. }
        ));
        assert_eq!(submission.analysis.category, Category::RefundRequest);
        assert!(submission.analysis.escalation_flag);
    }
}
