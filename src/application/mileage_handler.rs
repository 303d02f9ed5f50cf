use crate::domain::mileage::{MileageSkip, PostMileage};
use crate::domain::ports::{DuplicateGuardBox, MileageStoreBox};
use crate::domain::sale_record::SaleRecordEvent;
use crate::error::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum MileageOutcome {
    Posted(PostMileage),
    Skipped(MileageSkip),
}

/// Posts mileage accrual for sale records, at most once per transaction.
pub struct MileageHandler {
    guard: DuplicateGuardBox,
    store: MileageStoreBox,
}

impl MileageHandler {
    pub fn new(guard: DuplicateGuardBox, store: MileageStoreBox) -> Self {
        Self { guard, store }
    }

    pub async fn postings(&self) -> Result<Vec<PostMileage>> {
        self.store.get_all().await
    }

    pub async fn handle(&self, event: &SaleRecordEvent) -> Result<MileageOutcome> {
        if let Err(skip) = PostMileage::eligibility(event) {
            debug!(transaction_id = event.transaction_id, ?skip, "no mileage to post");
            return Ok(MileageOutcome::Skipped(skip));
        }

        if self
            .guard
            .check_order_refund_exist(event.transaction_id)
            .await?
        {
            info!(
                transaction_id = event.transaction_id,
                "transaction already has a mileage posting"
            );
            return Ok(MileageOutcome::Skipped(MileageSkip::AlreadyPosted));
        }

        let posting = PostMileage::from(event);
        self.store.create(posting.clone()).await?;
        info!(
            transaction_id = posting.transaction_id,
            customer_id = posting.customer_id,
            mileage = %posting.mileage,
            obtain_mileage = %posting.obtain_mileage,
            "mileage posted"
        );
        Ok(MileageOutcome::Posted(posting))
    }
}
