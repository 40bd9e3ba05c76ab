//! CLI smoke probe.
//!
//! # Responsibility
//! - Open (or create) a database file and apply migrations.
//! - Print version, schema version and store counts for quick sanity checks.
//!
//! Usage: `rentwise_cli [DB_PATH]` (default `rentwise.sqlite3`).

use rentwise_core::db::migrations::latest_version;
use rentwise_core::{core_version, dashboard_summary, open_db, ping};
use std::process::ExitCode;

const DEFAULT_DB_PATH: &str = "rentwise.sqlite3";

fn main() -> ExitCode {
    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

    println!("rentwise_core ping={}", ping());
    println!("rentwise_core version={}", core_version());
    println!("schema_version={}", latest_version());

    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };
    let summary = match dashboard_summary(&conn) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("failed to summarize `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };

    let leads: usize = summary.leads_by_status.iter().map(|entry| entry.count).sum();
    println!("db_path={db_path}");
    println!("properties={}", summary.properties.len());
    println!(
        "rooms={} occupied={} vacant={}",
        summary.rooms.total, summary.rooms.occupied, summary.rooms.vacant
    );
    println!(
        "leads={leads} pending_reminders={}",
        summary.pending_reminders
    );
    ExitCode::SUCCESS
}
