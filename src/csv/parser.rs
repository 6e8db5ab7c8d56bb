//! Quote-aware record reader.
//!
//! Splits text into records of fields: commas separate fields, newlines end
//! records, and a field that starts with a double quote may contain commas,
//! newlines and `""` (a literal quote). Lines with only blank fields are
//! skipped. Reading stops at the first error.

use crate::error::{Error, Result};

/// Longest field accepted before the file is rejected. Keeps an unterminated
/// quote in a huge file from buffering the whole input.
pub const MAX_FIELD_LEN: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 1-based physical line the record starts on.
    pub line: usize,
    pub fields: Vec<String>,
}

pub struct RecordReader<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
    failed: bool,
}

impl<'a> RecordReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 0,
            failed: false,
        }
    }

    /// Read one record starting at `self.pos`. Returns the fields and whether
    /// any field was quoted.
    fn read_record(&mut self) -> Result<(Vec<String>, bool)> {
        let start_line = self.line + 1;
        let rest = &self.text[self.pos..];
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut any_quoted = false;
        let mut chars = rest.char_indices().peekable();

        while let Some((i, ch)) = chars.next() {
            if field.len() > MAX_FIELD_LEN {
                return Err(Error::validation(format!(
                    "line {start_line}: field longer than {MAX_FIELD_LEN} bytes"
                )));
            }
            if in_quotes {
                match ch {
                    '"' if matches!(chars.peek(), Some((_, '"'))) => {
                        field.push('"');
                        chars.next();
                    }
                    '"' => in_quotes = false,
                    '\n' => {
                        self.line += 1;
                        field.push(ch);
                    }
                    _ => field.push(ch),
                }
                continue;
            }
            match ch {
                '"' if field.trim().is_empty() => {
                    field.clear();
                    in_quotes = true;
                    any_quoted = true;
                }
                ',' => fields.push(std::mem::take(&mut field)),
                '\r' if matches!(chars.peek(), Some((_, '\n'))) => {}
                '\n' | '\r' => {
                    self.line += 1;
                    self.pos += i + ch.len_utf8();
                    fields.push(field);
                    return Ok((fields, any_quoted));
                }
                _ => field.push(ch),
            }
        }

        if in_quotes {
            return Err(Error::validation(format!(
                "line {start_line}: unterminated quoted field"
            )));
        }
        self.line += 1;
        self.pos = self.text.len();
        fields.push(field);
        Ok((fields, any_quoted))
    }
}

impl Iterator for RecordReader<'_> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.failed && self.pos < self.text.len() {
            let line = self.line + 1;
            match self.read_record() {
                Ok((fields, quoted)) => {
                    if !quoted && fields.iter().all(|f| f.trim().is_empty()) {
                        continue;
                    }
                    return Some(Ok(RawRecord { line, fields }));
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// Quote a field when it contains a delimiter, quote or line break.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Join fields into one CSV line (without the trailing newline).
pub fn write_record<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
