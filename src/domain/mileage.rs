use super::sale_record::SaleRecordEvent;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Why a sale record produced no mileage posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MileageSkip {
    NoCustomer,
    NoMileage,
    AlreadyPosted,
}

/// Mileage accrual for one transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostMileage {
    pub transaction_id: i64,
    pub order_id: i64,
    pub refund_id: i64,
    pub customer_id: i64,
    pub store_id: i64,
    pub transaction_channel_type: String,
    pub mileage: Decimal,
    pub obtain_mileage: Decimal,
}

impl PostMileage {
    /// Decides whether the record carries anything to post.
    ///
    /// The duplicate check is a separate step since it needs the backing store.
    pub fn eligibility(event: &SaleRecordEvent) -> Result<(), MileageSkip> {
        if event.customer_id == 0 {
            return Err(MileageSkip::NoCustomer);
        }
        if event.mileage.is_zero() && event.obtain_mileage.is_zero() {
            return Err(MileageSkip::NoMileage);
        }
        Ok(())
    }
}

impl From<&SaleRecordEvent> for PostMileage {
    fn from(event: &SaleRecordEvent) -> Self {
        Self {
            transaction_id: event.transaction_id,
            order_id: event.order_id,
            refund_id: event.refund_id,
            customer_id: event.customer_id,
            store_id: event.store_id,
            transaction_channel_type: event.transaction_channel_type.clone(),
            mileage: event.mileage,
            obtain_mileage: event.obtain_mileage,
        }
    }
}
