mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::{line_item, sale_record, write_promotions};
use predicates::prelude::*;
use serde_json::json;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

#[test]
fn test_malformed_event_lines() {
    let mut events = NamedTempFile::new().unwrap();
    writeln!(
        events,
        "{}",
        sale_record(1, 7, json!([]), vec![line_item(1, "100", "0", "2")])
    )
    .unwrap();
    writeln!(events, "not json at all").unwrap();
    writeln!(events, "{{\"transactionId\": \"abc\"}}").unwrap();
    writeln!(events).unwrap();
    writeln!(
        events,
        "{}",
        sale_record(2, 7, json!([]), vec![line_item(2, "300", "0", "2")])
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("sale-postprocess"));
    cmd.arg(events.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading sale record"))
        .stdout(predicate::str::contains(",2,2.00,POS"))
        .stdout(predicate::str::contains(",2,6.00,POS"));
}

#[test]
fn test_unknown_offer_leaves_no_partial_rows() {
    let promotions = write_promotions();
    let mut events = NamedTempFile::new().unwrap();
    writeln!(
        events,
        "{}",
        sale_record(
            1,
            7,
            json!([{"offerNo": "1-10-20", "itemIds": "1"}, {"offerNo": "9-9-9", "itemIds": "2"}]),
            vec![line_item(1, "100", "0", "2"), line_item(2, "100", "0", "2")]
        )
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("sale-postprocess"));
    cmd.arg(events.path()).arg("--promotions").arg(promotions.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("promotion event not found: 9-9-9"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_missing_input_file() {
    let mut cmd = Command::new(cargo_bin!("sale-postprocess"));
    cmd.arg("does/not/exist.jsonl");

    cmd.assert().failure();
}
