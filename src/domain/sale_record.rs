use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A set of line-item identifiers carried on the wire as a comma-joined string.
///
/// Matching is by exact membership, so `"12"` never matches an item `"123"`.
/// Empty tokens (trailing commas, `",,"`) are dropped on parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemIdList(BTreeSet<String>);

impl ItemIdList {
    pub fn contains(&self, id: &str) -> bool {
        !id.is_empty() && self.0.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromStr for ItemIdList {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(
            s.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
        ))
    }
}

impl fmt::Display for ItemIdList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.0.iter().map(String::as_str).collect();
        f.write_str(&joined.join(","))
    }
}

impl Serialize for ItemIdList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ItemIdList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(|s| s.parse().unwrap_or_default())
            .unwrap_or_default())
    }
}

/// A promotional offer applied at cart level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CartOffer {
    pub offer_no: String,
    /// Empty for promotion offers; coupons never carry a fee rate.
    pub coupon_no: String,
    pub item_ids: ItemIdList,
    pub item_codes: ItemIdList,
}

impl CartOffer {
    /// Whether this offer should be resolved against the promotion catalog.
    pub fn is_fee_rate_candidate(&self) -> bool {
        self.coupon_no.is_empty() && !self.offer_no.is_empty()
    }

    /// Whether the offer is scoped to the given line item.
    pub fn applies_to(&self, dtl: &AssortedSaleRecordDtl) -> bool {
        self.item_ids.contains(&dtl.order_item_id.to_string())
            || self.item_codes.contains(&dtl.item_code)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TotalPrice {
    pub list_price: Decimal,
    pub sale_price: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DistributedPrice {
    pub total_distributed_cart_offer_price: Decimal,
    pub total_distributed_item_offer_price: Decimal,
}

/// One line item of a sale record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssortedSaleRecordDtl {
    /// Transaction detail id; fee rows are keyed by it.
    pub id: i64,
    pub order_item_id: i64,
    pub item_code: String,
    pub refund_item_id: i64,
    pub total_price: TotalPrice,
    pub distributed_price: DistributedPrice,
    pub mileage_price: Decimal,
    pub fee_rate: Decimal,
    pub item_fee: Decimal,
    pub mileage: Decimal,
}

impl AssortedSaleRecordDtl {
    /// List price minus distributed offer discounts.
    pub fn payment_price(&self) -> Decimal {
        self.total_price.list_price
            - self.distributed_price.total_distributed_cart_offer_price
            - self.distributed_price.total_distributed_item_offer_price
    }

    /// Payment price minus the part paid with mileage.
    pub fn selling_amount(&self) -> Decimal {
        self.payment_price() - self.mileage_price
    }
}

/// A completed or refunded transaction delivered by the upstream stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaleRecordEvent {
    pub transaction_id: i64,
    pub order_id: i64,
    pub refund_id: i64,
    pub customer_id: i64,
    pub store_id: i64,
    pub transaction_channel_type: String,
    pub mileage: Decimal,
    pub obtain_mileage: Decimal,
    pub cart_offers: Vec<CartOffer>,
    pub assorted_sale_record_dtl_list: Vec<AssortedSaleRecordDtl>,
}
