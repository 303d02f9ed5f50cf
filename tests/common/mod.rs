#![allow(dead_code)]

use rand::Rng;
use serde_json::{Value, json};
use std::io::Write;
use tempfile::NamedTempFile;

pub const PROMOTIONS_CSV: &str = "\
offerNo,eventTypeCode,feeRate,brandCode
1-10-20,01,5,BR
1-11-21,02,8,BR
1-12-22,03,0,BR
1-13-23,07,9,BR
";

pub fn write_promotions() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(PROMOTIONS_CSV.as_bytes()).unwrap();
    file
}

pub fn write_events(events: &[Value]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for event in events {
        writeln!(file, "{}", event).unwrap();
    }
    file
}

pub fn line_item(id: i64, list_price: &str, cart_offer_price: &str, fee_rate: &str) -> Value {
    json!({
        "id": id * 100,
        "orderItemId": id,
        "itemCode": format!("SKU-{}", id),
        "totalPrice": {"listPrice": list_price, "salePrice": list_price},
        "distributedPrice": {
            "totalDistributedCartOfferPrice": cart_offer_price,
            "totalDistributedItemOfferPrice": "0"
        },
        "mileagePrice": "0",
        "feeRate": fee_rate
    })
}

pub fn sale_record(transaction_id: i64, customer_id: i64, offers: Value, items: Vec<Value>) -> Value {
    json!({
        "transactionId": transaction_id,
        "orderId": transaction_id.saturating_mul(10),
        "customerId": customer_id,
        "storeId": 3,
        "transactionChannelType": "POS",
        "mileage": "0",
        "obtainMileage": "12",
        "cartOffers": offers,
        "assortedSaleRecordDtlList": items
    })
}

/// A sale record with a random number of line items, all scoped to one promotion.
pub fn random_sale_record(rng: &mut impl Rng, transaction_id: i64) -> (Value, usize) {
    let count = rng.gen_range(1..=20);
    let items: Vec<Value> = (1..=count as i64)
        .map(|i| {
            let id = transaction_id * 1000 + i;
            let price = rng.gen_range(1..=5000).to_string();
            line_item(id, &price, "0", "2")
        })
        .collect();
    let ids: Vec<String> = items
        .iter()
        .map(|item| item["orderItemId"].to_string())
        .collect();
    let offers = json!([{"offerNo": "1-10-20", "couponNo": "", "itemIds": ids.join(",")}]);
    (sale_record(transaction_id, 1, offers, items), count)
}

/// Counts data rows (excluding the header) in CSV output.
pub fn data_rows(stdout: &[u8]) -> usize {
    let text = String::from_utf8_lossy(stdout);
    text.lines().count().saturating_sub(1)
}
