//! Parser integration tests
//!
//! Exercise the parse-then-upload path the file endpoint uses: a CSV on the
//! wire ends up as a normalized payload readable from the latest content
//! artifact.

mod common;

use common::{seed_page, test_state};
use copyflow_engine::parser::{parse_content_file, ParseError};
use copyflow_engine::services::content_manager;
use uuid::Uuid;

const CATALOGUE_CSV: &str = "meta_title,meta_description,h1,h2,paragraphs\n\
Industrial Pumps | Acme,Full pump catalogue,Industrial Pumps,Centrifugal;Diaphragm,\
\"Built for continuous duty.\nRated to 400 bar.\n\nEvery unit is tested before shipping.\"";

#[tokio::test]
async fn parsed_csv_round_trips_through_upload() {
    let state = test_state().await;
    let page_id = seed_page(&state.db).await;

    let parsed = parse_content_file("catalogue.csv", CATALOGUE_CSV.as_bytes()).unwrap();
    assert_eq!(parsed.meta_title, "Industrial Pumps | Acme");
    assert_eq!(parsed.h2, vec!["Centrifugal", "Diaphragm"]);
    // Two paragraphs; the first keeps its internal newline
    assert_eq!(parsed.paragraphs.len(), 2);
    assert_eq!(
        parsed.paragraphs[0],
        "Built for continuous duty.\nRated to 400 bar."
    );
    // No h3 column in the file: empty list, not an error
    assert!(parsed.h3.is_empty());

    let artifact = content_manager::upload_content_data(
        &state,
        page_id,
        parsed.clone(),
        Some("https://docs.example.com/sheet/42".to_string()),
        Uuid::new_v4(),
    )
    .await
    .unwrap();
    assert_eq!(artifact.version, 1);

    let loaded = content_manager::get_latest_content_data(&state, page_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.parsed_content, parsed);
}

#[tokio::test]
async fn oversized_upload_is_rejected_before_parsing() {
    // 6 MiB body; the ceiling check must fire before any CSV work
    let mut body = Vec::with_capacity(6 * 1024 * 1024);
    body.extend_from_slice(b"meta_title,h1\n");
    body.resize(6 * 1024 * 1024, b'x');

    let err = parse_content_file("big.csv", &body).unwrap_err();
    assert!(matches!(err, ParseError::FileTooLarge { size } if size == 6 * 1024 * 1024));
}

#[tokio::test]
async fn unsupported_and_empty_files_fail_with_typed_errors() {
    assert!(matches!(
        parse_content_file("notes.txt", b"hello"),
        Err(ParseError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        parse_content_file("empty.csv", b"meta_title,h1\n"),
        Err(ParseError::MissingDataRow)
    ));
}
