//! Ordered schema scripts for the rental store.
//!
//! Each step runs in its own `IMMEDIATE` transaction together with the
//! `user_version` bump, so a database is always at exactly one known step.
//! The version is re-read under the write lock; concurrent openers of a
//! fresh file therefore never run the same script twice.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, TransactionBehavior};

/// One schema step, identified by the `user_version` it leaves behind.
#[derive(Debug, Clone, Copy)]
struct Step {
    version: u32,
    name: &'static str,
    script: &'static str,
}

const STEPS: &[Step] = &[
    Step {
        version: 1,
        name: "properties_rooms",
        script: include_str!("0001_properties_rooms.sql"),
    },
    Step {
        version: 2,
        name: "leads",
        script: include_str!("0002_leads.sql"),
    },
];

/// Schema version this build writes and expects.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `Migration` when a script fails; earlier steps stay applied.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let latest = latest_version();
    let found = schema_version(conn)?;
    if found > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    for step in STEPS.iter().filter(|step| step.version > found) {
        run_step(conn, step)?;
    }
    Ok(())
}

fn run_step(conn: &mut Connection, step: &Step) -> DbResult<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    if schema_version(&tx)? >= step.version {
        return Ok(());
    }

    let failed = |source| DbError::Migration {
        version: step.version,
        source,
    };
    tx.execute_batch(step.script).map_err(failed)?;
    tx.pragma_update(None, "user_version", step.version)
        .map_err(failed)?;
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok version={} name={}",
        step.version, step.name
    );
    Ok(())
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
