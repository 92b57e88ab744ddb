/// Turns spreadsheet rows into chronological records
///
/// Rows arrive newest first as `[timestamp, deaths, injuries]` strings with a
/// header row on top, the shape of a Google Sheets `values` response.

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::timeline::record::{LocalDateTime, Record};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed sheet payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("row {row}: expected 3 columns, found {found}")]
    ShortRow { row: usize, found: usize },

    #[error("row {row}: unparsable timestamp {value:?}")]
    Timestamp { row: usize, value: String },
}

#[derive(Debug, Deserialize)]
struct SheetValues {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Parse a `{ "values": [[...], ...] }` payload
pub fn parse_sheet_values(json: &str) -> Result<Vec<Record>, IngestError> {
    let sheet: SheetValues = serde_json::from_str(json)?;
    records_from_rows(&sheet.values)
}

/// Drop the header, parse every row and return them oldest first
pub fn records_from_rows<R: AsRef<[String]>>(rows: &[R]) -> Result<Vec<Record>, IngestError> {
    let mut records = rows
        .iter()
        .enumerate()
        .skip(1)
        .map(|(row, cells)| parse_row(row, cells.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    records.reverse();
    Ok(records)
}

fn parse_row(row: usize, cells: &[String]) -> Result<Record, IngestError> {
    let [timestamp, deaths, injuries, ..] = cells else {
        return Err(IngestError::ShortRow { row, found: cells.len() });
    };

    let timestamp = LocalDateTime::parse(timestamp).ok_or_else(|| IngestError::Timestamp {
        row,
        value: timestamp.clone(),
    })?;

    Ok(Record::new(timestamp, parse_count(row, deaths), parse_count(row, injuries)))
}

/// Counts that do not parse draw as an empty disc instead of failing the load
fn parse_count(row: usize, cell: &str) -> u32 {
    cell.trim().parse().unwrap_or_else(|_| {
        warn!("row {}: count {:?} is not a number, using 0", row, cell);
        0
    })
}
