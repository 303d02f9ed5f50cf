mod common;

use assert_cmd::cargo_bin;
use common::{data_rows, random_sale_record, write_events};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::process::Command;

#[test]
fn test_one_fee_row_per_line_item() {
    let mut rng = StdRng::seed_from_u64(7);
    let promotions = common::write_promotions();

    let mut events = Vec::new();
    let mut expected_rows = 0;
    for transaction_id in 1..=25 {
        let (event, items) = random_sale_record(&mut rng, transaction_id);
        events.push(event);
        expected_rows += items;
    }
    let input = write_events(&events);

    let output = Command::new(cargo_bin!("sale-postprocess"))
        .arg(input.path())
        .arg("--promotions")
        .arg(promotions.path())
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert_eq!(data_rows(&output.stdout), expected_rows);

    // every item is scoped to the 5% promotion, overriding its 2% item rate
    let stdout = String::from_utf8_lossy(&output.stdout);
    for row in stdout.lines().skip(1) {
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields[14], "5", "event fee rate in {row}");
        assert_eq!(fields[15], "5", "applied fee rate in {row}");
    }
}
