//! Content file parser
//!
//! Converts an uploaded CSV or spreadsheet file into a [`NormalizedContent`]
//! record. Both formats produce the same output type, so the content manager
//! never needs to know which one the writer uploaded.
//!
//! Expected columns (case-insensitive, order-free): `meta_title`,
//! `meta_description`, `h1`, `h2`, `h3`, `paragraphs`, `alt_texts`. Heading
//! and alt-text cells hold semicolon-separated lists; the paragraphs cell
//! separates paragraphs with blank lines. Missing columns yield empty values.

mod csv;
mod sheet;

use copyflow_common::db::models::NormalizedContent;
use std::collections::HashMap;
use thiserror::Error;

/// Uploads above this size are rejected before any parsing happens.
pub const MAX_CONTENT_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Content file parsing errors, surfaced verbatim to the uploader.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported file format '{0}'. Please upload a CSV or Excel (.xlsx) file")]
    UnsupportedFormat(String),

    #[error("File size must be less than 5 MiB (got {size} bytes)")]
    FileTooLarge { size: usize },

    #[error("File must have a header row and at least one data row")]
    MissingDataRow,

    #[error("Could not read spreadsheet: {0}")]
    Spreadsheet(String),
}

/// Parse an uploaded content file into a normalized record.
///
/// Dispatches on the file extension; `csv`, `xlsx` and `xls` are supported.
/// The size ceiling is checked before any format work.
pub fn parse_content_file(file_name: &str, bytes: &[u8]) -> Result<NormalizedContent, ParseError> {
    if bytes.len() > MAX_CONTENT_FILE_BYTES {
        return Err(ParseError::FileTooLarge { size: bytes.len() });
    }

    let extension = file_name
        .rsplit('.')
        .next()
        .filter(|ext| !ext.is_empty() && *ext != file_name)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => csv::parse_csv_content(&String::from_utf8_lossy(bytes)),
        "xlsx" | "xls" => sheet::parse_sheet_content(bytes),
        other => Err(ParseError::UnsupportedFormat(other.to_string())),
    }
}

/// Cheap validation used by callers that want to reject a file before
/// transferring its bytes anywhere.
pub fn validate_content_file(file_name: &str, size: usize) -> Result<(), ParseError> {
    let extension = file_name
        .rsplit('.')
        .next()
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !matches!(extension.as_str(), "csv" | "xlsx" | "xls") {
        return Err(ParseError::UnsupportedFormat(extension));
    }
    if size > MAX_CONTENT_FILE_BYTES {
        return Err(ParseError::FileTooLarge { size });
    }
    Ok(())
}

/// Case-insensitive, whitespace-trimmed header → column index map.
fn header_map(headers: &[String]) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.trim().is_empty())
        .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
        .collect()
}

/// Assemble the normalized record from a header map and one row of cell
/// values. Missing headers become empty fields, not errors.
fn build_record(headers: &HashMap<String, usize>, values: &[String]) -> NormalizedContent {
    let get = |key: &str| -> String {
        headers
            .get(key)
            .and_then(|&i| values.get(i))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    NormalizedContent {
        meta_title: get("meta_title"),
        meta_description: get("meta_description"),
        h1: split_delimited(&get("h1")),
        h2: split_delimited(&get("h2")),
        h3: split_delimited(&get("h3")),
        paragraphs: split_paragraphs(&get("paragraphs")),
        alt_texts: split_delimited(&get("alt_texts")),
    }
}

/// Split a semicolon-delimited multi-value cell; entries trimmed, empties
/// dropped.
fn split_delimited(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a paragraphs cell on runs of two-or-more newlines. Single newlines
/// inside a paragraph are preserved.
fn split_paragraphs(value: &str) -> Vec<String> {
    value
        .split("\n\n")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
