//! Parsing of uploaded bulk check-in files.
//!
//! The file is CSV without a header row. The first column of every row holds
//! an attendee id; further columns are ignored. Parsing is strict: one
//! malformed row rejects the whole file, so nobody is checked in from a file
//! that was only partly understood.

use csv::{ReaderBuilder, Trim};

use crate::utils::error::AppError;

pub fn parse_attendee_ids(contents: &[u8]) -> Result<Vec<i64>, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(contents);

    let mut attendee_ids = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let row = index + 1;
        let record = record
            .map_err(|e| AppError::ValidationError(format!("Row {}: unreadable CSV: {}", row, e)))?;

        let field = record.get(0).unwrap_or_default();
        let attendee_id = field.parse::<i64>().map_err(|_| {
            AppError::ValidationError(format!(
                "Row {}: '{}' is not a valid attendee id",
                row, field
            ))
        })?;
        attendee_ids.push(attendee_id);
    }

    Ok(attendee_ids)
}
