//! Spreadsheet content parsing (.xlsx / .xls)
//!
//! Reads the first sheet only: row 0 is headers, row 1 is the data row.
//! Additional rows are ignored. Cell values are coerced to strings before
//! the shared normalization step, so numeric cells behave like typed text.

use super::{build_record, header_map, ParseError};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use copyflow_common::db::models::NormalizedContent;
use std::io::Cursor;

pub fn parse_sheet_content(bytes: &[u8]) -> Result<NormalizedContent, ParseError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| ParseError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ParseError::MissingDataRow)?
        .map_err(|e| ParseError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or(ParseError::MissingDataRow)?;
    let data_row = rows.next().ok_or(ParseError::MissingDataRow)?;

    let headers: Vec<String> = header_row.iter().map(cell_to_string).collect();
    let headers = header_map(&headers);
    let values: Vec<String> = data_row.iter().map(cell_to_string).collect();

    Ok(build_record(&headers, &values))
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Bool(b) => b.to_string(),
        Data::Int(i) => i.to_string(),
        // Whole floats render without the trailing ".0" Excel never showed
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        other => other.to_string(),
    }
}
