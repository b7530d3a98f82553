//! CSV content parsing
//!
//! A content CSV is a header line plus a single logical data row. Paragraph
//! cells may contain raw newlines, so everything after the header line is
//! re-joined into one string before field-splitting; only unquoted commas
//! separate fields. Quoted fields use doubled-quote escaping (`""` → `"`).

use super::{build_record, header_map, ParseError};
use copyflow_common::db::models::NormalizedContent;

pub fn parse_csv_content(text: &str) -> Result<NormalizedContent, ParseError> {
    let text = text.replace("\r\n", "\n");
    let mut lines = text.split('\n');

    let header_line = lines.next().ok_or(ParseError::MissingDataRow)?;
    let data = lines.collect::<Vec<_>>().join("\n");
    if data.trim().is_empty() {
        return Err(ParseError::MissingDataRow);
    }

    let headers = split_fields(header_line.trim());
    let headers = header_map(&headers);
    let values = split_fields(&data);

    Ok(build_record(&headers, &values))
}

/// Split one logical CSV row into fields.
///
/// Commas inside quotes are not separators, and a doubled quote inside a
/// quoted field is an escaped literal quote. Newlines are ordinary characters
/// here; the caller has already decided where the row boundary is.
fn split_fields(row: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = row.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }

    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_row() {
        let csv = "meta_title,meta_description,h1,h2,h3,paragraphs\n\
                   Pumps | Acme,Industrial pump catalogue,Main;Hero,Sub one;Sub two,,Intro text";
        let record = parse_csv_content(csv).unwrap();
        assert_eq!(record.meta_title, "Pumps | Acme");
        assert_eq!(record.h1, vec!["Main", "Hero"]);
        assert_eq!(record.h2, vec!["Sub one", "Sub two"]);
        assert!(record.h3.is_empty());
        assert_eq!(record.paragraphs, vec!["Intro text"]);
    }

    #[test]
    fn quoted_comma_is_not_a_separator() {
        let csv = "meta_title,meta_description\n\"Pumps, Valves & More\",Catalogue";
        let record = parse_csv_content(csv).unwrap();
        assert_eq!(record.meta_title, "Pumps, Valves & More");
        assert_eq!(record.meta_description, "Catalogue");
    }

    #[test]
    fn doubled_quote_is_an_escaped_quote() {
        let csv = "meta_title,h1\n\"The \"\"Best\"\" Pumps\",Heading";
        let record = parse_csv_content(csv).unwrap();
        assert_eq!(record.meta_title, "The \"Best\" Pumps");
    }

    #[test]
    fn multi_paragraph_cell_preserves_internal_newlines() {
        // The paragraphs cell spans multiple physical lines: two paragraphs
        // separated by a blank line, the first containing a single internal
        // newline that must survive.
        let csv = "meta_title,paragraphs\n\
                   Title,\"First paragraph line one\nline two\n\nSecond paragraph\"";
        let record = parse_csv_content(csv).unwrap();
        assert_eq!(record.paragraphs.len(), 2);
        assert_eq!(record.paragraphs[0], "First paragraph line one\nline two");
        assert_eq!(record.paragraphs[1], "Second paragraph");
    }

    #[test]
    fn header_match_is_case_insensitive_and_trimmed() {
        let csv = " Meta_Title , H1 \nHello, Main";
        let record = parse_csv_content(csv).unwrap();
        assert_eq!(record.meta_title, "Hello");
        assert_eq!(record.h1, vec!["Main"]);
    }

    #[test]
    fn missing_header_yields_empty_field() {
        // No h3 column: parse succeeds with h3 empty
        let csv = "meta_title,h1,h2,paragraphs\nTitle,Main,Sub,Text";
        let record = parse_csv_content(csv).unwrap();
        assert!(record.h3.is_empty());
        assert_eq!(record.h1, vec!["Main"]);
    }

    #[test]
    fn header_only_file_is_missing_data_row() {
        assert!(matches!(
            parse_csv_content("meta_title,h1"),
            Err(ParseError::MissingDataRow)
        ));
        assert!(matches!(
            parse_csv_content("meta_title,h1\n"),
            Err(ParseError::MissingDataRow)
        ));
    }

    #[test]
    fn crlf_line_endings_are_normalized() {
        let csv = "meta_title,h1\r\nHello,Main";
        let record = parse_csv_content(csv).unwrap();
        assert_eq!(record.meta_title, "Hello");
    }

    #[test]
    fn round_trips_a_known_record() {
        let csv = "meta_title,meta_description,h1,h2,h3,paragraphs,alt_texts\n\
                   \"Pumps | Acme\",Catalogue,Main;Hero,Sub A;Sub B,Deep one,\"Para one\n\nPara two\",pump photo;valve photo";
        let record = parse_csv_content(csv).unwrap();
        assert_eq!(record.meta_title, "Pumps | Acme");
        assert_eq!(record.meta_description, "Catalogue");
        assert_eq!(record.h1, vec!["Main", "Hero"]);
        assert_eq!(record.h2, vec!["Sub A", "Sub B"]);
        assert_eq!(record.h3, vec!["Deep one"]);
        assert_eq!(record.paragraphs, vec!["Para one", "Para two"]);
        assert_eq!(record.alt_texts, vec!["pump photo", "valve photo"]);
    }
}
