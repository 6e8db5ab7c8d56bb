//! CSV ingest: schema-checked parsing of rating uploads and template export.
//!
//! A file is accepted or rejected as a whole. The header is matched against
//! the declared columns case-insensitively; every data row must coerce each
//! declared column to its type. Errors name the data row (1-based, header
//! excluded), the physical line, and the column.

pub mod parser;
pub mod rows;

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};
use parser::RecordReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    String,
    Float,
    Integer,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Float => "float",
            Self::Integer => "integer",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub data_type: DataType,
}

impl ColumnSpec {
    pub const fn new(label: &'static str, data_type: DataType) -> Self {
        Self { label, data_type }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CsvValue {
    Text(String),
    Float(f64),
    Integer(i64),
}

impl CsvValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            Self::Text(_) => None,
        }
    }
}

/// One parsed data row, keyed by declared column label.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRecord {
    /// 1-based data row number (the header is not counted).
    pub row: usize,
    pub values: BTreeMap<&'static str, CsvValue>,
    /// Respondent that uploaded the file.
    pub uploader: String,
}

impl CsvRecord {
    pub fn text(&self, label: &str) -> Result<&str> {
        self.values
            .get(label)
            .and_then(CsvValue::as_str)
            .ok_or_else(|| self.missing(label))
    }

    pub fn number(&self, label: &str) -> Result<f64> {
        self.values
            .get(label)
            .and_then(CsvValue::as_f64)
            .ok_or_else(|| self.missing(label))
    }

    fn missing(&self, label: &str) -> Error {
        Error::validation(format!("row {}: column {label:?} is not available", self.row))
    }
}

fn coerce(raw: &str, data_type: DataType) -> Option<CsvValue> {
    let raw = raw.trim();
    match data_type {
        DataType::String => Some(CsvValue::Text(raw.to_string())),
        DataType::Float => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(CsvValue::Float),
        DataType::Integer => raw.parse::<i64>().ok().map(CsvValue::Integer),
    }
}

/// Parse `text` against `schema`, tagging every row with `uploader`.
/// A leading UTF-8 byte order mark is ignored.
pub fn parse(text: &str, schema: &[ColumnSpec], uploader: &str) -> Result<Vec<CsvRecord>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = RecordReader::new(text);
    let header = match records.next() {
        Some(h) => h?,
        None => return Err(Error::validation("the file is empty")),
    };

    let mut indices = Vec::with_capacity(schema.len());
    let mut missing = Vec::new();
    for col in schema {
        match header
            .fields
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(col.label))
        {
            Some(idx) => indices.push((col, idx)),
            None => missing.push(col.label),
        }
    }
    if !missing.is_empty() {
        return Err(Error::validation(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let mut rows = Vec::new();
    for (n, record) in records.enumerate() {
        let record = record?;
        let row = n + 1;
        let mut values = BTreeMap::new();
        for (col, idx) in &indices {
            let raw = record.fields.get(*idx).map(String::as_str).unwrap_or("");
            let value = coerce(raw, col.data_type).ok_or_else(|| {
                Error::validation(format!(
                    "row {row} (line {}), column {:?}: expected {}, found {:?}",
                    record.line,
                    col.label,
                    col.data_type,
                    raw.trim()
                ))
            })?;
            values.insert(col.label, value);
        }
        rows.push(CsvRecord {
            row,
            values,
            uploader: uploader.to_string(),
        });
    }

    Ok(rows)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
