//! Parameter presets: one `frequency,amplitude,phase` line per channel.
//!
//! No header, no quoting, no version. Row order is channel order.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use lj_engine::ParamRow;

use crate::FormatError;

const DELIMITER: char = ',';

/// Parse preset text into rows.
///
/// Blank lines are skipped, fields are trimmed (so `\r\n` endings load),
/// and fields past the third are ignored. Values are returned as written;
/// range clamping happens when they are applied to a channel.
pub fn parse_rows(text: &str) -> Result<Vec<ParamRow>, FormatError> {
    let mut rows = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        rows.push(parse_line(line, i + 1)?);
    }
    Ok(rows)
}

fn parse_line(line: &str, line_no: usize) -> Result<ParamRow, FormatError> {
    let fields: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
    if fields.len() < 3 {
        return Err(FormatError::MissingFields {
            line: line_no,
            found: fields.len(),
        });
    }
    Ok(ParamRow::new(
        parse_field(fields[0], line_no)?,
        parse_field(fields[1], line_no)?,
        parse_field(fields[2], line_no)?,
    ))
}

fn parse_field(field: &str, line_no: usize) -> Result<f32, FormatError> {
    field.parse::<f32>().map_err(|_| FormatError::InvalidNumber {
        line: line_no,
        value: field.to_string(),
    })
}

/// Render rows as preset text. `{:?}` keeps a decimal point and prints the
/// shortest form that parses back to the same value.
pub fn format_rows(rows: &[ParamRow]) -> String {
    let mut out = String::new();
    for row in rows {
        // Writing into a String cannot fail
        let _ = writeln!(
            out,
            "{:?}{DELIMITER}{:?}{DELIMITER}{:?}",
            row.frequency, row.amplitude, row.phase
        );
    }
    out
}

/// Read and parse a preset file.
pub fn load_preset(path: &Path) -> Result<Vec<ParamRow>, FormatError> {
    let text = fs::read_to_string(path)?;
    parse_rows(&text)
}

/// Write rows to a preset file, replacing it.
pub fn save_preset(path: &Path, rows: &[ParamRow]) -> Result<(), FormatError> {
    fs::write(path, format_rows(rows))?;
    Ok(())
}
