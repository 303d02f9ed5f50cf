use super::fee_handler::{FeeHandler, FeeOutcome};
use super::mileage_handler::{MileageHandler, MileageOutcome};
use crate::domain::fee::{FeePolicy, PostFailCreateSaleFee, PostSaleRecordFee};
use crate::domain::mileage::PostMileage;
use crate::domain::ports::{
    DuplicateGuardBox, FeeFailMarkerStoreBox, MileageStoreBox, PromotionLookupBox,
    SaleRecordFeeStoreBox,
};
use crate::domain::sale_record::SaleRecordEvent;
use crate::error::Result;
use tracing::{Instrument, info_span};

/// Result of both processing paths for one event.
///
/// The paths are independent: a failure in one does not prevent the other.
#[derive(Debug)]
pub struct ProcessReport {
    pub mileage: Result<MileageOutcome>,
    pub fees: Result<FeeOutcome>,
}

/// Storage backends the engine is wired with.
pub struct Stores {
    pub promotions: PromotionLookupBox,
    pub duplicate_guard: DuplicateGuardBox,
    pub mileage: MileageStoreBox,
    pub fees: SaleRecordFeeStoreBox,
    pub fail_markers: FeeFailMarkerStoreBox,
}

/// Entry point for sale-record post-processing.
///
/// Each event is handled to completion before `process` returns.
pub struct PostprocessEngine {
    mileage: MileageHandler,
    fees: FeeHandler,
}

impl PostprocessEngine {
    pub fn new(stores: Stores, policy: FeePolicy) -> Self {
        Self {
            mileage: MileageHandler::new(stores.duplicate_guard, stores.mileage),
            fees: FeeHandler::new(stores.promotions, stores.fees, stores.fail_markers, policy),
        }
    }

    pub async fn process(&self, event: &SaleRecordEvent) -> ProcessReport {
        let span = info_span!("sale_record", transaction_id = event.transaction_id);
        async {
            ProcessReport {
                mileage: self.mileage.handle(event).await,
                fees: self.fees.handle(event).await,
            }
        }
        .instrument(span)
        .await
    }

    pub async fn mileage_postings(&self) -> Result<Vec<PostMileage>> {
        self.mileage.postings().await
    }

    pub async fn sale_record_fees(&self) -> Result<Vec<PostSaleRecordFee>> {
        self.fees.allocated().await
    }

    pub async fn fail_markers(&self) -> Result<Vec<PostFailCreateSaleFee>> {
        self.fees.fail_markers().await
    }
}
