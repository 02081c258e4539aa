// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value reads and writes against the `conversation_kv` table.
//!
//! A put is a single upsert statement, so it commits (or fails) as one unit.
//! There is never a moment where a reader can observe a partially-written
//! value for a key.

use crate::database::{Database, map_tr_err};
use parley_core::ParleyError;

/// Fetch the value stored under `(scope, key)`, if any.
pub async fn get_value(
    db: &Database,
    scope: &str,
    key: &str,
) -> Result<Option<Vec<u8>>, ParleyError> {
    let scope = scope.to_string();
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT value FROM conversation_kv WHERE scope = ?1 AND key = ?2",
                [&scope, &key],
                |row| row.get::<_, Vec<u8>>(0),
            );
            match result {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Store `value` under `(scope, key)`, replacing any previous value.
pub async fn put_value(
    db: &Database,
    scope: &str,
    key: &str,
    value: &[u8],
) -> Result<(), ParleyError> {
    let scope = scope.to_string();
    let key = key.to_string();
    let value = value.to_vec();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO conversation_kv (scope, key, value, updated_at)
                 VALUES (?1, ?2, ?3, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                 ON CONFLICT (scope, key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = excluded.updated_at",
                rusqlite::params![scope, key, value],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
