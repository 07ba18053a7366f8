use std::collections::HashMap;
use std::io::Read;

use thiserror::Error;

use cuadre_core::{Cell, Row, UploadedFile};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("File has no header row")]
    NoHeader,
}

/// Decode a CSV export into an `UploadedFile`.
///
/// Deliberately lenient, per the decoder contract: short records are padded
/// with empty cells, fully blank records are skipped, and a malformed cell
/// never aborts the file.
pub fn decode_csv<R: Read>(file_name: &str, data: R) -> Result<UploadedFile, DecodeError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
        return Err(DecodeError::NoHeader);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let mut cells = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let cell = match record.get(i).map(str::trim) {
                None | Some("") => Cell::Empty,
                Some(value) => Cell::Text(value.to_string()),
            };
            cells.insert(column.clone(), cell);
        }
        rows.push(Row::new(cells));
    }

    Ok(UploadedFile {
        file_name: file_name.to_string(),
        columns,
        rows,
    })
}
