//! WITNESS — audit chain command-line tool.
//!
//! Operates directly on an audit database file:
//!
//!   witness verify data/audit.db
//!   witness list data/audit.db --limit 20
//!   witness append data/audit.db --actor svc --action create --payload '{"amount":10}'
//!
//! `verify` exits 0 and prints the verified record count, or exits 1 with
//! the integrity error on stderr.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use witness_chain::canonical::parse_timestamp;
use witness_contracts::payload::Payload;
use witness_core::facade::AuditLog;
use witness_store::SqliteStore;

// ── CLI definition ────────────────────────────────────────────────────────────

/// WITNESS — tamper-evident audit chain tool.
#[derive(Parser)]
#[command(
    name = "witness",
    about = "Verify, list, and append to a tamper-evident audit chain",
    long_about = "Every record in the audit chain commits to its predecessor via\n\
                  SHA-256. `verify` replays the hash computation over the whole\n\
                  chain and reports the first tampered record, if any."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify the integrity of the entire stored chain.
    Verify {
        /// Path to the SQLite database containing the audit_log table.
        database: PathBuf,
    },
    /// Print the most recent records, newest first.
    List {
        /// Path to the SQLite database containing the audit_log table.
        database: PathBuf,
        /// Maximum number of records to print.
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },
    /// Append a single record to the chain.
    Append {
        /// Path to the SQLite database containing the audit_log table.
        database: PathBuf,
        /// Who or what caused the event.
        #[arg(long)]
        actor: String,
        /// The event kind.
        #[arg(long)]
        action: String,
        /// JSON payload text.  Omitted means a null payload.
        #[arg(long)]
        payload: Option<String>,
        /// RFC 3339 timestamp with an explicit UTC offset.  Defaults to now.
        #[arg(long)]
        timestamp: Option<String>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    // Structured logging; set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Verify { database } => run_verify(&database),
        Command::List { database, limit } => run_list(&database, limit),
        Command::Append {
            database,
            actor,
            action,
            payload,
            timestamp,
        } => run_append(&database, &actor, &action, payload, timestamp),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn open_log(database: &Path) -> Result<AuditLog, String> {
    let store = SqliteStore::open(database)
        .map_err(|e| format!("failed to open audit database: {e}"))?;
    Ok(AuditLog::new(Arc::new(store)))
}

fn run_verify(database: &Path) -> Result<(), String> {
    let log = open_log(database)?;

    log.verify()
        .map_err(|e| format!("audit log verification failed: {e}"))?;

    let count = log
        .all_records()
        .map_err(|e| format!("failed to read audit log: {e}"))?
        .len();
    println!("audit log ok: {count} entries verified");
    Ok(())
}

fn run_list(database: &Path, limit: usize) -> Result<(), String> {
    if limit == 0 {
        return Err("limit must be positive".to_string());
    }

    let log = open_log(database)?;
    let records = log
        .all_records()
        .map_err(|e| format!("failed to read audit log: {e}"))?;

    for record in records.iter().rev().take(limit) {
        println!(
            "{:>6}  {}  {:<20}  {}",
            record.id, record.ts, record.actor, record.action
        );
    }
    Ok(())
}

fn run_append(
    database: &Path,
    actor: &str,
    action: &str,
    payload: Option<String>,
    timestamp: Option<String>,
) -> Result<(), String> {
    let payload = payload.map_or(Payload::Null, |text| Payload::pre_encoded(text));
    let ts = timestamp
        .as_deref()
        .map(parse_timestamp)
        .transpose()
        .map_err(|e| e.to_string())?;

    let log = open_log(database)?;
    let record = log
        .append(actor, action, payload, ts)
        .map_err(|e| e.to_string())?;

    println!("appended record {} ({})", record.id, record.this_hash);
    Ok(())
}
