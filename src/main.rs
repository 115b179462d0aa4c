use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use shipment_tracker::{
    open_repository, parse_status, BackendKind, DynRepository, ManagerReport, ShipmentStatus,
    TrackerConfig, TrackingReport,
};

#[derive(Parser)]
#[command(name = "shipment-tracker")]
#[command(about = "Shipment status tracking over flat record files", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the store files (default: ./data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Storage backend: csv or sqlite
    #[arg(long, global = true)]
    backend: Option<BackendKind>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a shipment by tracking number
    Track { tracking_id: String },
    /// Check credentials and show the granted role
    Login {
        #[arg(long)]
        user: String,
        #[arg(long)]
        password: String,
    },
    /// Record a new status for a shipment (operators)
    Record {
        tracking_id: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        status: String,
        #[arg(long)]
        user: String,
        #[arg(long)]
        password: String,
    },
    /// Show accounts and shipment summaries (managers)
    Report {
        #[arg(long)]
        user: String,
        #[arg(long)]
        password: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List accepted status names
    Statuses,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Statuses = cli.command {
        print_statuses();
        return Ok(());
    }

    let mut config = TrackerConfig::from_env().context("Invalid environment configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    let mut repo = open_or_exit(&config);

    match cli.command {
        Commands::Track { tracking_id } => run_track(&repo, &tracking_id),
        Commands::Login { user, password } => run_login(&repo, &user, &password),
        Commands::Record {
            tracking_id,
            location,
            status,
            user,
            password,
        } => run_record(&mut repo, &tracking_id, &location, &status, &user, &password),
        Commands::Report {
            user,
            password,
            json,
        } => run_report(&repo, &user, &password, json),
        Commands::Statuses => Ok(()),
    }
}

/// Startup failures are fatal
fn open_or_exit(config: &TrackerConfig) -> DynRepository {
    let opened = fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create data directory {}", config.data_dir.display()))
        .and_then(|_| open_repository(config).map_err(anyhow::Error::from));

    match opened {
        Ok(repo) => repo,
        Err(e) => {
            eprintln!("❌ Critical startup error!");
            eprintln!("   {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run_track(repo: &DynRepository, tracking_id: &str) -> Result<()> {
    let report = repo.track(tracking_id)?;
    print_tracking_report(&report);
    Ok(())
}

fn run_login(repo: &DynRepository, user: &str, password: &str) -> Result<()> {
    let session = repo.login(user.trim(), password.trim())?;
    println!("✓ Welcome, {}! Role: {}", session.username, session.role);
    Ok(())
}

fn run_record(
    repo: &mut DynRepository,
    tracking_id: &str,
    location: &str,
    status: &str,
    user: &str,
    password: &str,
) -> Result<()> {
    let session = repo.login(user.trim(), password.trim())?;
    let status = parse_status(status)?;

    let entry = repo.record_event(&session, tracking_id, location, status)?;
    println!(
        "✅ Recorded new status ({}) for shipment {}",
        entry.status, entry.tracking_id
    );
    println!("   {} @ {}", entry.location, entry.timestamp.format("%Y-%m-%d %H:%M"));
    Ok(())
}

fn run_report(repo: &DynRepository, user: &str, password: &str, json: bool) -> Result<()> {
    let session = repo.login(user.trim(), password.trim())?;
    let report = repo.manager_report(&session)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_manager_report(&report);
    }
    Ok(())
}

// ============================================================================
// Output
// ============================================================================

fn print_statuses() {
    println!("Accepted status names:");
    for status in ShipmentStatus::ALL {
        println!("  {:<18} {}", status.code(), status.label());
    }
}

fn print_tracking_report(report: &TrackingReport) {
    let marker = if report.delivered { "✅" } else { "🚚" };

    println!("📦 Shipment {}", report.tracking_id);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "{} Current status: {} ({})",
        marker, report.current_status, report.current_location
    );
    println!("🕒 Estimated delivery: {}", report.estimated_delivery);
    println!();
    println!("{:<18} {:<28} {}", "Date/Time", "Location", "Status");
    for entry in &report.history {
        println!(
            "{:<18} {:<28} {}",
            entry.timestamp.format("%d/%m/%Y %H:%M"),
            entry.location,
            entry.status
        );
    }
}

fn print_manager_report(report: &ManagerReport) {
    println!("📊 Manager Report");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("\n👤 Users ({})", report.accounts.len());
    println!("{:<20} {:<12} {}", "Username", "Password", "Role");
    for account in &report.accounts {
        println!(
            "{:<20} {:<12} {}",
            account.username, account.password, account.role
        );
    }

    println!("\n📦 Shipments ({})", report.shipment_count());
    println!(
        "{:<16} {:<16} {:<16} {}",
        "Tracking No", "Sender", "Recipient", "Current Status"
    );
    for row in &report.shipments {
        println!(
            "{:<16} {:<16} {:<16} {}",
            row.tracking_id, row.sender, row.recipient, row.current_status
        );
    }

    println!("\n📈 By status ({} events logged)", report.total_events);
    for (status, count) in &report.by_status {
        println!("  {:<22} {}", status.label(), count);
    }
}
