//! Column conversion helpers shared by the query modules.

use std::{fmt::Display, str::FromStr};

use jiff::civil::Time;
use rusqlite::{Row, types::Type};

/// Wrap a text-decoding failure the way rusqlite reports type errors.
pub(crate) fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
    )
}

/// Read a text column and parse it with [`FromStr`].
pub(crate) fn parse_text<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| conversion_error(idx, format!("Invalid value '{raw}': {e}")))
}

/// Nullable variant of [`parse_text`].
pub(crate) fn parse_optional_text<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| {
        raw.parse::<T>()
            .map_err(|e| conversion_error(idx, format!("Invalid value '{raw}': {e}")))
    })
    .transpose()
}

fn parse_hhmm(idx: usize, raw: &str) -> rusqlite::Result<Time> {
    Time::strptime("%H:%M", raw)
        .map_err(|e| conversion_error(idx, format!("Invalid time '{raw}': {e}")))
}

/// Read an `HH:MM` column.
pub(crate) fn time_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Time> {
    let raw: String = row.get(idx)?;
    parse_hhmm(idx, &raw)
}

/// Read a nullable `HH:MM` column.
pub(crate) fn optional_time_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Time>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| parse_hhmm(idx, &raw)).transpose()
}
