use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;

use crate::error::{ConvertError, Result};

/// Header row and data rows of a CSV file.
#[derive(Debug)]
pub struct CsvTable {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
}

impl CsvTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }
}

/// Read a whole CSV file. Rows may have fewer or more cells than the header row.
pub fn read_table(
    mut input_stream: impl Read,
    file: &'static str,
    max_rows: usize,
) -> Result<CsvTable> {
    let mut content = String::new();
    input_stream.read_to_string(&mut content)?;
    let content = maybe_remove_byte_order_mark(content);

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(content.as_bytes());
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        if rows.len() == max_rows {
            return Err(ConvertError::TooManyRows {
                file,
                limit: max_rows,
            });
        }
        rows.push(record?);
    }
    log::info!("Read {} rows from {}", rows.len(), file);
    Ok(CsvTable { headers, rows })
}

pub fn maybe_remove_byte_order_mark(mut content: String) -> String {
    if content.starts_with('\u{FEFF}') {
        content.remove(0);
    }
    content
}
