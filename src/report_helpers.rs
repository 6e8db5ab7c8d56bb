use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::error::Result;

/// Compute the max display width of `labels`, with a minimum of `min`.
pub fn max_label_width<'a>(labels: impl Iterator<Item = &'a str>, min: usize) -> usize {
    labels.map(|l| l.width()).max().unwrap_or(min).max(min)
}

/// Left-align `s` in `width` terminal columns. Wide characters count double.
pub fn pad(s: &str, width: usize) -> String {
    let w = s.width();
    if w >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - w))
    }
}

/// Print a horizontal separator of box-drawing chars.
pub fn separator(width: usize) -> String {
    "\u{2500}".repeat(width)
}

/// Serialize to pretty JSON and print to stdout.
pub fn print_json_stdout(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "report_helpers_test.rs"]
mod tests;
