//! Row decoding helpers shared by the query modules.

use jiff::Timestamp;
use rusqlite::{types::Type, Row};
use uuid::Uuid;

use crate::schedule::WeekId;

fn conversion_error(
    index: usize,
    error: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
}

/// Reads an integer ID column.
pub(crate) fn id(row: &Row, index: usize) -> rusqlite::Result<u64> {
    Ok(row.get::<_, i64>(index)? as u64)
}

/// Reads an RFC 3339 timestamp column.
pub(crate) fn timestamp(row: &Row, index: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(index)?
        .parse::<Timestamp>()
        .map_err(|e| conversion_error(index, e))
}

/// Reads a week column stored as its Sunday date.
pub(crate) fn week(row: &Row, index: usize) -> rusqlite::Result<WeekId> {
    row.get::<_, String>(index)?
        .parse::<WeekId>()
        .map_err(|e| conversion_error(index, e))
}

/// Reads a nullable week column.
pub(crate) fn optional_week(row: &Row, index: usize) -> rusqlite::Result<Option<WeekId>> {
    row.get::<_, Option<String>>(index)?
        .map(|raw| raw.parse::<WeekId>().map_err(|e| conversion_error(index, e)))
        .transpose()
}

/// Reads a nullable UUID column.
pub(crate) fn optional_uuid(row: &Row, index: usize) -> rusqlite::Result<Option<Uuid>> {
    row.get::<_, Option<String>>(index)?
        .map(|raw| Uuid::parse_str(&raw).map_err(|e| conversion_error(index, e)))
        .transpose()
}
