mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::{data_rows, line_item, sale_record, write_events, write_promotions};
use predicates::prelude::*;
use serde_json::json;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

#[test]
fn test_fee_allocation_end_to_end() {
    let promotions = write_promotions();
    let events = write_events(&[sale_record(
        1,
        7,
        json!([{"offerNo": "1-10-20", "couponNo": "", "itemIds": "1,"}]),
        vec![
            line_item(1, "1000", "100", "3"),
            line_item(2, "200", "0", "2"),
        ],
    )]);

    let mut cmd = Command::new(cargo_bin!("sale-postprocess"));
    cmd.arg(events.path()).arg("--promotions").arg(promotions.path());

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    assert_eq!(data_rows(&output.stdout), 2);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("transaction_id,transaction_dtl_id,order_id,order_item_id"));
    // promotion rate wins for item 1, item rate for item 2
    assert!(stdout.contains("1,100,10,1,0,0,7,3,1000,900,0,0,3,0,5,5,45.00,POS"));
    assert!(stdout.contains("1,200,10,2,0,0,7,3,200,200,0,0,2,0,0,2,4.00,POS"));
}

#[test]
fn test_mileage_output() {
    let events = write_events(&[
        sale_record(1, 7, json!([]), vec![line_item(1, "100", "0", "0")]),
        sale_record(2, 0, json!([]), vec![line_item(2, "100", "0", "0")]),
        sale_record(1, 7, json!([]), vec![line_item(1, "100", "0", "0")]),
    ]);

    let mut cmd = Command::new(cargo_bin!("sale-postprocess"));
    cmd.arg(events.path()).arg("--output").arg("mileage");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("transaction_id,order_id,refund_id,customer_id,store_id"));
    assert!(stdout.contains("1,10,0,7,3,POS,0,12"));
    assert_eq!(data_rows(&output.stdout), 1);
}

#[test]
fn test_zero_rate_rejected_by_default() {
    let promotions = write_promotions();
    let events = write_events(&[sale_record(
        1,
        7,
        json!([{"offerNo": "1-12-22", "itemIds": "1"}]),
        vec![line_item(1, "1000", "0", "3")],
    )]);

    let mut cmd = Command::new(cargo_bin!("sale-postprocess"));
    cmd.arg(events.path()).arg("--promotions").arg(promotions.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("activity fee rate cannot be zero"));
}

#[test]
fn test_zero_rate_deferred_under_first_match() {
    let promotions = write_promotions();
    let events = write_events(&[sale_record(
        1,
        7,
        json!([{"offerNo": "1-12-22", "itemIds": "1"}, {"offerNo": "1-10-20", "itemIds": "1"}]),
        vec![line_item(1, "1000", "0", "3")],
    )]);

    let mut cmd = Command::new(cargo_bin!("sale-postprocess"));
    cmd.arg(events.path())
        .arg("--promotions")
        .arg(promotions.path())
        .arg("--offer-resolution")
        .arg("first-match")
        .arg("--output")
        .arg("fail-markers");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "transaction_id,order_id,refund_id,offer_no,fee_rate,is_processed",
        ))
        .stdout(predicate::str::contains("1,10,0,1-12-22,0,false"));
}

#[test]
fn test_floor_truncate_rounding() {
    let events = write_events(&[sale_record(
        1,
        7,
        json!([]),
        vec![line_item(1, "100.01", "0", "3")],
    )]);

    let mut half_up = Command::new(cargo_bin!("sale-postprocess"));
    half_up.arg(events.path());
    half_up
        .assert()
        .success()
        .stdout(predicate::str::contains(",0,3,3.00,POS"));

    let mut floor = Command::new(cargo_bin!("sale-postprocess"));
    floor.arg(events.path()).arg("--fee-rounding").arg("floor-truncate");
    floor
        .assert()
        .success()
        .stdout(predicate::str::contains(",0,3,3.01,POS"));
}

#[test]
fn test_catalog_promotions() {
    let mut catalog = NamedTempFile::new().unwrap();
    write!(
        catalog,
        "{}",
        json!([{
            "campaign": {"id": 10, "name": "Autumn", "feeRate": "7.5",
                         "channels": [{"brandCode": "BR"}]},
            "ruleset": {"id": 20, "type": "channel",
                        "action": {"discountType": "to_percentage", "discountValue": "10"}}
        }])
    )
    .unwrap();
    let events = write_events(&[sale_record(
        1,
        7,
        json!([{"offerNo": "1-10-20", "itemCodes": "SKU-1"}]),
        vec![line_item(1, "200", "0", "0")],
    )]);

    let mut cmd = Command::new(cargo_bin!("sale-postprocess"));
    cmd.arg(events.path()).arg("--catalog").arg(catalog.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(",7.5,7.5,15.00,POS"));
}
