// IncidentDesk Entry Point
// Command-line intake and analytics for the complaint analysis engine

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use incidentdesk_core::config::AppConfig;
use incidentdesk_core::dashboard::DashboardReport;
use incidentdesk_core::database;
use incidentdesk_core::fs_manager::PortablePathManager;
use incidentdesk_core::nlu::{AnalyzerOptions, CategorySource, ComplaintAnalyzer};
use incidentdesk_core::services::InferenceServices;
use incidentdesk_core::telemetry;
use incidentdesk_core::{IncidentDesk, PersistenceOutcome, Submission};
use sqlx::sqlite::SqlitePool;
use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "incidentdesk")]
#[command(about = "Classify, route and triage customer complaints", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit Bunyan JSON logs on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a complaint and store it as a ticket
    Analyze {
        /// Complaint text (omit with --stdin)
        text: Option<String>,

        /// Read the complaint from standard input
        #[arg(long, conflicts_with = "text")]
        stdin: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Analyze without writing a ticket
        #[arg(long)]
        no_store: bool,
    },

    /// Show incident analytics
    Dashboard {
        /// Number of recent tickets to list
        #[arg(long, default_value_t = 10)]
        recent: i64,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every stored ticket
    Tickets {
        /// Print tickets as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create the ticket database if it does not exist
    InitDb,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("Invalid configuration")?;

    telemetry::init_tracing(cli.log_json || config.log_json)?;

    // Initialize File System (Portable)
    if let Err(e) = PortablePathManager::init() {
        error!("Failed to initialize portable file system: {}", e);
    }

    match cli.command {
        Commands::Analyze {
            text,
            stdin,
            json,
            no_store,
        } => analyze(&config, text, stdin, json, no_store).await,
        Commands::Dashboard { recent, json } => {
            dashboard(&config, recent, json).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Tickets { json } => {
            tickets(&config, json).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::InitDb => {
            open_db(&config).await?;
            println!("Database ready at {}", config.db_path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn open_db(config: &AppConfig) -> Result<SqlitePool> {
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }
    database::init_db(&config.db_path)
        .await
        .with_context(|| format!("Cannot open database {}", config.db_path.display()))
}

async fn analyze(
    config: &AppConfig,
    text: Option<String>,
    stdin: bool,
    json: bool,
    no_store: bool,
) -> Result<ExitCode> {
    let complaint = if stdin {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read complaint from stdin")?;
        buf
    } else {
        text.unwrap_or_default()
    };

    // A broken database must not block analysis
    let pool = if no_store {
        None
    } else {
        match open_db(config).await {
            Ok(pool) => Some(pool),
            Err(e) => {
                error!("Failed to initialize database: {:#}", e);
                None
            }
        }
    };

    info!("Initializing NLU capabilities...");
    let services = Arc::new(InferenceServices::from_config(config)?);
    let analyzer = ComplaintAnalyzer::new(services, AnalyzerOptions::from(config));
    let desk = IncidentDesk::new(analyzer, pool, config.analysis_timeout());

    match desk.submit(&complaint).await {
        Ok(submission) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&submission)?);
            } else {
                print_submission(&submission);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_user_correctable() => {
            eprintln!("{}", e);
            Ok(ExitCode::from(e.exit_code()))
        }
        Err(e) => Err(e.into()),
    }
}

fn print_submission(submission: &Submission) {
    let analysis = &submission.analysis;

    match &submission.persistence {
        PersistenceOutcome::Stored { ticket_id } => println!("Ticket:      #{}", ticket_id),
        PersistenceOutcome::Failed { reason } => println!("Ticket:      not stored ({})", reason),
        PersistenceOutcome::Disabled => println!("Ticket:      not stored"),
    }

    let source = match &analysis.category_source {
        CategorySource::Rule { keyword } => format!("keyword \"{}\"", keyword),
        CategorySource::ZeroShot { score, .. } => format!("zero-shot, {:.2}", score),
        CategorySource::Fallback => "default".to_string(),
    };
    println!("Category:    {} ({})", analysis.category, source);
    println!("Sentiment:   {}", analysis.sentiment);
    println!("Priority:    {}", analysis.priority);
    println!("Department:  {}", analysis.department);
    println!(
        "Escalation:  {}",
        if analysis.escalation_flag { "YES" } else { "no" }
    );
    println!("Reply:       {}", analysis.reply_text);

    if analysis.is_degraded() {
        println!("Degraded:    {:?}", analysis.degradations);
    }
}

async fn dashboard(config: &AppConfig, recent: i64, json: bool) -> Result<()> {
    let pool = open_db(config).await?;
    let report = DashboardReport::load(&pool, recent).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}

async fn tickets(config: &AppConfig, json: bool) -> Result<()> {
    let pool = open_db(config).await?;
    let tickets = database::get_all_tickets(&pool).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tickets)?);
        return Ok(());
    }

    for t in &tickets {
        println!(
            "#{} [{}] {} / {} / {} -> {}{}",
            t.id,
            t.created_at,
            t.category,
            t.sentiment,
            t.priority,
            t.department,
            if t.escalation_flag { " (escalated)" } else { "" }
        );
    }
    Ok(())
}
