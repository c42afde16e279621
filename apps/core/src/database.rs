use crate::models::{DailyCount, LabelCount, Ticket};
use crate::nlu::AnalysisResult;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

/// Opens (creating if needed) the ticket database and ensures its schema.
pub async fn init_db(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    info!("Initializing database at: {}", db_path.display());

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Idempotently creates the `tickets` table.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tickets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            complaint_text TEXT NOT NULL,
            category TEXT NOT NULL,
            sentiment TEXT NOT NULL,
            priority TEXT NOT NULL,
            department TEXT NOT NULL,
            escalation_flag BOOLEAN NOT NULL DEFAULT 0,
            reply_text TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    info!("Ticket schema ready.");
    Ok(())
}

// --- Tickets ---

/// Appends an analyzed complaint. Returns the new ticket id.
pub async fn insert_ticket(pool: &SqlitePool, analysis: &AnalysisResult) -> Result<i64, sqlx::Error> {
    let created_at = Utc::now().timestamp();

    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO tickets (complaint_text, category, sentiment, priority, department, escalation_flag, reply_text, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&analysis.complaint_text)
    .bind(analysis.category.label())
    .bind(analysis.sentiment.label())
    .bind(analysis.priority.label())
    .bind(&analysis.department)
    .bind(analysis.escalation_flag)
    .bind(&analysis.reply_text)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

/// All tickets, oldest first.
pub async fn get_all_tickets(pool: &SqlitePool) -> Result<Vec<Ticket>, sqlx::Error> {
    sqlx::query_as::<_, Ticket>(
        r#"
        SELECT id, complaint_text, category, sentiment, priority, department, escalation_flag, reply_text, created_at
        FROM tickets
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Most recent tickets, newest first.
pub async fn get_recent_tickets(pool: &SqlitePool, limit: i64) -> Result<Vec<Ticket>, sqlx::Error> {
    sqlx::query_as::<_, Ticket>(
        r#"
        SELECT id, complaint_text, category, sentiment, priority, department, escalation_flag, reply_text, created_at
        FROM tickets
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

// --- Analytics ---

pub async fn count_tickets(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tickets")
        .fetch_one(pool)
        .await
}

pub async fn escalation_count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tickets WHERE escalation_flag = 1")
        .fetch_one(pool)
        .await
}

/// Tickets per category, largest first.
pub async fn category_distribution(pool: &SqlitePool) -> Result<Vec<LabelCount>, sqlx::Error> {
    sqlx::query_as::<_, LabelCount>(
        r#"
        SELECT category AS label, COUNT(*) AS count
        FROM tickets
        GROUP BY category
        ORDER BY count DESC, label ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Tickets per priority, largest first.
pub async fn priority_distribution(pool: &SqlitePool) -> Result<Vec<LabelCount>, sqlx::Error> {
    sqlx::query_as::<_, LabelCount>(
        r#"
        SELECT priority AS label, COUNT(*) AS count
        FROM tickets
        GROUP BY priority
        ORDER BY count DESC, label ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Tickets per UTC day, oldest first.
pub async fn daily_trend(pool: &SqlitePool) -> Result<Vec<DailyCount>, sqlx::Error> {
    sqlx::query_as::<_, DailyCount>(
        r#"
        SELECT date(created_at, 'unixepoch') AS day, COUNT(*) AS count
        FROM tickets
        GROUP BY day
        ORDER BY day ASC
        "#,
    )
    .fetch_all(pool)
    .await
}
