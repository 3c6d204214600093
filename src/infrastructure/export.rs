//! JSON-lines output of evaluation rows

use std::io::Write;

use serde::Serialize;

use crate::domain::DomainError;

/// Write one JSON object per line
///
/// Non-finite numbers (e.g. NaN expected loss) are written as `null`.
/// Returns the number of rows written.
pub fn write_json_lines<W, T>(mut writer: W, rows: &[T]) -> Result<usize, DomainError>
where
    W: Write,
    T: Serialize,
{
    for row in rows {
        serde_json::to_writer(&mut writer, row)
            .map_err(|e| DomainError::internal(format!("Failed to serialize row: {}", e)))?;
        writer
            .write_all(b"\n")
            .map_err(|e| DomainError::internal(format!("Failed to write row: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| DomainError::internal(format!("Failed to flush output: {}", e)))?;

    Ok(rows.len())
}
