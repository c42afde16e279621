//! Incident analytics over the ticket log.

use crate::database;
use crate::models::{DailyCount, LabelCount, Ticket};
use serde::Serialize;
use sqlx::sqlite::SqlitePool;

/// Share of tickets with one priority.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityShare {
    pub priority: String,
    pub count: i64,
    /// Percentage of all tickets, 0.0-100.0.
    pub percent: f64,
}

/// Aggregate analytics snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub total_tickets: i64,
    pub escalated: i64,
    pub categories: Vec<LabelCount>,
    pub priorities: Vec<PriorityShare>,
    pub daily: Vec<DailyCount>,
    pub recent: Vec<Ticket>,
}

impl DashboardReport {
    pub async fn load(pool: &SqlitePool, recent_limit: i64) -> Result<Self, sqlx::Error> {
        let total_tickets = database::count_tickets(pool).await?;
        let escalated = database::escalation_count(pool).await?;
        let categories = database::category_distribution(pool).await?;
        let priorities = priority_shares(&database::priority_distribution(pool).await?);
        let daily = database::daily_trend(pool).await?;
        let recent = database::get_recent_tickets(pool, recent_limit).await?;

        Ok(Self {
            total_tickets,
            escalated,
            categories,
            priorities,
            daily,
            recent,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.total_tickets == 0
    }

    /// Plain-text rendering for the terminal.
    pub fn render(&self) -> String {
        let mut out = String::from("Smart Incident Analytics Dashboard\n");
        out.push_str("==================================\n");

        if self.is_empty() {
            out.push_str(
                "No tickets have been submitted yet. Submit a complaint with `incidentdesk analyze`.\n",
            );
            return out;
        }

        out.push_str(&format!(
            "Total Tickets Processed: {} | Critical Escalations: {}\n",
            self.total_tickets, self.escalated
        ));

        out.push_str("\nComplaint Category Distribution\n");
        let width = self.categories.iter().map(|c| c.label.len()).max().unwrap_or(0);
        for entry in &self.categories {
            out.push_str(&format!(
                "  {:<width$}  {:>5}  {}\n",
                entry.label,
                entry.count,
                bar(entry.count, self.total_tickets),
                width = width
            ));
        }

        out.push_str("\nPriority Distribution\n");
        for share in &self.priorities {
            out.push_str(&format!(
                "  {:<6}  {:>5}  {:>5.1}%\n",
                share.priority, share.count, share.percent
            ));
        }

        out.push_str("\nDaily Complaint Trend\n");
        for day in &self.daily {
            out.push_str(&format!("  {}  {:>5}\n", day.day, day.count));
        }

        if !self.recent.is_empty() {
            out.push_str("\nRecent Incidents\n");
            for ticket in &self.recent {
                out.push_str(&format!(
                    "  #{:<5} {:<17} {:<8} {:<6} {:<13} {}  {}\n",
                    ticket.id,
                    ticket.category,
                    ticket.sentiment,
                    ticket.priority,
                    ticket.department,
                    if ticket.escalation_flag { "ESC" } else { "   " },
                    preview(&ticket.complaint_text, 60)
                ));
            }
        }

        out
    }
}

/// Percent shares for a priority distribution.
pub fn priority_shares(counts: &[LabelCount]) -> Vec<PriorityShare> {
    let total: i64 = counts.iter().map(|c| c.count).sum();

    counts
        .iter()
        .map(|c| PriorityShare {
            priority: c.label.clone(),
            count: c.count,
            percent: if total > 0 {
                c.count as f64 * 100.0 / total as f64
            } else {
                0.0
            },
        })
        .collect()
}

fn bar(count: i64, total: i64) -> String {
    const WIDTH: i64 = 30;
    if total <= 0 {
        return String::new();
    }
    let filled = (count * WIDTH + total - 1) / total;
    "#".repeat(filled.clamp(0, WIDTH) as usize)
}

fn preview(text: &str, max_chars: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let mut cut: String = single_line.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}
