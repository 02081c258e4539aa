// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations, applied at open time via refinery.
//!
//! Migration files live under `migrations/` and are compiled into the binary,
//! so a deployed store never depends on loose SQL files on disk.

use rusqlite::Connection;

use parley_core::ParleyError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
///
/// Refinery tracks applied versions in its own table, so calling this on
/// every open is idempotent.
pub fn run_migrations(conn: &mut Connection) -> Result<(), ParleyError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| ParleyError::Storage { source: Box::new(e) })?;

    let applied = report.applied_migrations().len();
    if applied > 0 {
        tracing::info!(count = applied, "applied schema migrations");
    }
    Ok(())
}
