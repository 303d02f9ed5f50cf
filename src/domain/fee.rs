use super::promotion::PromotionEvent;
use super::sale_record::{AssortedSaleRecordDtl, CartOffer, SaleRecordEvent};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// How cart offers are resolved into fee-bearing promotions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OfferResolution {
    /// Every eligible offer is collected; a non-positive fee rate rejects the record.
    #[default]
    MultiOffer,
    /// Resolution stops at the first eligible offer; a non-positive fee rate
    /// defers the record with a fail marker.
    FirstMatch,
}

/// How the fee amount is brought to cent precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FeeRounding {
    /// `round(selling * rate / 100, 2)`, midpoint away from zero.
    #[default]
    HalfUp,
    /// `selling - floor((selling - selling * rate / 100) / 0.01) * 0.01`.
    FloorTruncate,
}

impl FeeRounding {
    pub fn fee_amount(self, selling_amt: Decimal, fee_rate: Decimal) -> Decimal {
        let raw = selling_amt * fee_rate / Decimal::ONE_HUNDRED;
        let mut fee = match self {
            FeeRounding::HalfUp => {
                raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            }
            FeeRounding::FloorTruncate => {
                let net = selling_amt - raw;
                selling_amt - (net / CENT).floor() * CENT
            }
        };
        // both policies print with cent scale
        fee.rescale(2);
        fee
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeePolicy {
    pub resolution: OfferResolution,
    pub rounding: FeeRounding,
}

/// A cart offer paired with the promotion it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOffer {
    pub offer: CartOffer,
    pub promotion: PromotionEvent,
}

/// Fee allocation for one line item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostSaleRecordFee {
    pub transaction_id: i64,
    pub transaction_dtl_id: i64,
    pub order_id: i64,
    pub order_item_id: i64,
    pub refund_id: i64,
    pub refund_item_id: i64,
    pub customer_id: i64,
    pub store_id: i64,
    pub total_sale_price: Decimal,
    pub total_payment_price: Decimal,
    pub mileage: Decimal,
    pub mileage_price: Decimal,
    pub item_fee_rate: Decimal,
    pub item_fee: Decimal,
    pub event_fee_rate: Decimal,
    pub applied_fee_rate: Decimal,
    pub fee_amount: Decimal,
    pub transaction_channel_type: String,
}

/// Storage key of a fee row. `line` counts earlier rows of the same batch
/// with the same transaction and detail id, so lines that repeat or omit the
/// detail id stay separate while re-saving a batch overwrites in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeeRowKey {
    pub transaction_id: i64,
    pub transaction_dtl_id: i64,
    pub line: u32,
}

impl FeeRowKey {
    pub fn for_rows(rows: &[PostSaleRecordFee]) -> Vec<FeeRowKey> {
        let mut seen: HashMap<(i64, i64), u32> = HashMap::new();
        rows.iter()
            .map(|row| {
                let count = seen
                    .entry((row.transaction_id, row.transaction_dtl_id))
                    .or_insert(0);
                let key = FeeRowKey {
                    transaction_id: row.transaction_id,
                    transaction_dtl_id: row.transaction_dtl_id,
                    line: *count,
                };
                *count += 1;
                key
            })
            .collect()
    }

    /// Big-endian bytes; the transaction id leads so it works as a prefix.
    pub fn to_bytes(self) -> [u8; 20] {
        let mut key = [0u8; 20];
        key[..8].copy_from_slice(&self.transaction_id.to_be_bytes());
        key[8..16].copy_from_slice(&self.transaction_dtl_id.to_be_bytes());
        key[16..].copy_from_slice(&self.line.to_be_bytes());
        key
    }
}

/// Retry marker for a transaction whose fee-bearing promotion had no usable rate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostFailCreateSaleFee {
    pub transaction_id: i64,
    pub order_id: i64,
    pub refund_id: i64,
    pub offer_no: String,
    pub fee_rate: Decimal,
    pub is_processed: bool,
}

impl PostFailCreateSaleFee {
    pub fn new(event: &SaleRecordEvent, promotion: &PromotionEvent) -> Self {
        Self {
            transaction_id: event.transaction_id,
            order_id: event.order_id,
            refund_id: event.refund_id,
            offer_no: promotion.offer_no.clone(),
            fee_rate: promotion.fee_rate,
            is_processed: false,
        }
    }
}

/// Promotion rate wins when one matched and is non-zero; otherwise a positive
/// item rate; otherwise zero.
pub fn applied_fee_rate(event_fee_rate: Option<Decimal>, item_fee_rate: Decimal) -> Decimal {
    match event_fee_rate {
        Some(rate) if !rate.is_zero() => rate,
        _ if item_fee_rate > Decimal::ZERO => item_fee_rate,
        _ => Decimal::ZERO,
    }
}

/// Fee rate of the first resolved offer scoped to this line item.
pub fn event_fee_rate(dtl: &AssortedSaleRecordDtl, resolved: &[ResolvedOffer]) -> Option<Decimal> {
    resolved
        .iter()
        .find(|r| r.offer.applies_to(dtl))
        .map(|r| r.promotion.fee_rate)
}

/// Computes one fee row per line item of the record.
pub fn allocate_fees(
    event: &SaleRecordEvent,
    resolved: &[ResolvedOffer],
    rounding: FeeRounding,
) -> Vec<PostSaleRecordFee> {
    event
        .assorted_sale_record_dtl_list
        .iter()
        .map(|dtl| {
            let event_rate = event_fee_rate(dtl, resolved);
            let applied = applied_fee_rate(event_rate, dtl.fee_rate);

            PostSaleRecordFee {
                transaction_id: event.transaction_id,
                transaction_dtl_id: dtl.id,
                order_id: event.order_id,
                order_item_id: dtl.order_item_id,
                refund_id: event.refund_id,
                refund_item_id: dtl.refund_item_id,
                customer_id: event.customer_id,
                store_id: event.store_id,
                total_sale_price: dtl.total_price.sale_price,
                total_payment_price: dtl.payment_price(),
                mileage: dtl.mileage,
                mileage_price: dtl.mileage_price,
                item_fee_rate: dtl.fee_rate,
                item_fee: dtl.item_fee,
                event_fee_rate: event_rate.unwrap_or_default(),
                applied_fee_rate: applied,
                fee_amount: rounding.fee_amount(dtl.selling_amount(), applied),
                transaction_channel_type: event.transaction_channel_type.clone(),
            }
        })
        .collect()
}
