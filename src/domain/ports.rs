use super::fee::{PostFailCreateSaleFee, PostSaleRecordFee};
use super::mileage::PostMileage;
use super::promotion::PromotionEvent;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PromotionLookup: Send + Sync {
    /// Resolves an offer number; an unknown offer is an error.
    async fn get_by_no(&self, offer_no: &str) -> Result<PromotionEvent>;
}

#[async_trait]
pub trait DuplicateGuard: Send + Sync {
    /// Whether the transaction already has a refund or posting recorded.
    async fn check_order_refund_exist(&self, transaction_id: i64) -> Result<bool>;
}

#[async_trait]
pub trait MileageStore: Send + Sync {
    async fn create(&self, posting: PostMileage) -> Result<()>;
    async fn get_all(&self) -> Result<Vec<PostMileage>>;
}

#[async_trait]
pub trait SaleRecordFeeStore: Send + Sync {
    async fn exists(&self, transaction_id: i64) -> Result<bool>;
    /// Persists a whole transaction's rows, or none of them.
    async fn save_all(&self, fees: Vec<PostSaleRecordFee>) -> Result<()>;
    async fn get_all(&self) -> Result<Vec<PostSaleRecordFee>>;
}

#[async_trait]
pub trait FeeFailMarkerStore: Send + Sync {
    async fn get(&self, transaction_id: i64) -> Result<Option<PostFailCreateSaleFee>>;
    async fn save(&self, marker: PostFailCreateSaleFee) -> Result<()>;
    /// Flags a marker as handled by reconciliation. Returns false if none exists.
    async fn mark_processed(&self, transaction_id: i64) -> Result<bool>;
    async fn get_all(&self) -> Result<Vec<PostFailCreateSaleFee>>;
}

pub type PromotionLookupBox = Box<dyn PromotionLookup>;
pub type DuplicateGuardBox = Box<dyn DuplicateGuard>;
pub type MileageStoreBox = Box<dyn MileageStore>;
pub type SaleRecordFeeStoreBox = Box<dyn SaleRecordFeeStore>;
pub type FeeFailMarkerStoreBox = Box<dyn FeeFailMarkerStore>;
