//! Version-conflict translation for the artifact tables
//!
//! `insert_next` reads the current max version and inserts max+1; under
//! concurrent uploads the loser hits UNIQUE(page_id, version). That database
//! error becomes a typed `VersionConflict` the caller can retry on, never a
//! silent overwrite or duplicate.

use copyflow_common::Error;
use uuid::Uuid;

pub(crate) fn map_insert_error(
    err: sqlx::Error,
    page_id: Uuid,
    kind: &'static str,
    version: i64,
) -> Error {
    match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => Error::VersionConflict {
            page_id,
            kind,
            version,
        },
        other => Error::Database(other),
    }
}
