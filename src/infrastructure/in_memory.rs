use crate::domain::fee::{FeeRowKey, PostFailCreateSaleFee, PostSaleRecordFee};
use crate::domain::mileage::PostMileage;
use crate::domain::ports::{
    DuplicateGuard, FeeFailMarkerStore, MileageStore, PromotionLookup, SaleRecordFeeStore,
};
use crate::domain::promotion::PromotionEvent;
use crate::error::{PostprocessError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Promotion catalog held in memory, keyed by offer number.
#[derive(Default, Clone)]
pub struct InMemoryPromotionCatalog {
    events: Arc<RwLock<HashMap<String, PromotionEvent>>>,
}

impl InMemoryPromotionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: impl IntoIterator<Item = PromotionEvent>) -> Self {
        let map = events
            .into_iter()
            .map(|e| (e.offer_no.clone(), e))
            .collect();
        Self {
            events: Arc::new(RwLock::new(map)),
        }
    }

    /// Adds or replaces a promotion.
    pub async fn insert(&self, event: PromotionEvent) {
        let mut events = self.events.write().await;
        events.insert(event.offer_no.clone(), event);
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }
}

#[async_trait]
impl PromotionLookup for InMemoryPromotionCatalog {
    async fn get_by_no(&self, offer_no: &str) -> Result<PromotionEvent> {
        let events = self.events.read().await;
        events
            .get(offer_no)
            .cloned()
            .ok_or_else(|| PostprocessError::PromotionNotFound(offer_no.to_string()))
    }
}

/// Mileage postings keyed by transaction id.
///
/// Doubles as the duplicate guard: a transaction with a posting counts as processed.
#[derive(Default, Clone)]
pub struct InMemoryMileageStore {
    postings: Arc<RwLock<BTreeMap<i64, PostMileage>>>,
}

impl InMemoryMileageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MileageStore for InMemoryMileageStore {
    async fn create(&self, posting: PostMileage) -> Result<()> {
        let mut postings = self.postings.write().await;
        postings.insert(posting.transaction_id, posting);
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<PostMileage>> {
        let postings = self.postings.read().await;
        Ok(postings.values().cloned().collect())
    }
}

#[async_trait]
impl DuplicateGuard for InMemoryMileageStore {
    async fn check_order_refund_exist(&self, transaction_id: i64) -> Result<bool> {
        let postings = self.postings.read().await;
        Ok(postings.contains_key(&transaction_id))
    }
}

/// Fee rows keyed by [`FeeRowKey`], so a re-run overwrites instead of duplicating.
#[derive(Default, Clone)]
pub struct InMemorySaleRecordFeeStore {
    fees: Arc<RwLock<BTreeMap<FeeRowKey, PostSaleRecordFee>>>,
}

impl InMemorySaleRecordFeeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SaleRecordFeeStore for InMemorySaleRecordFeeStore {
    async fn exists(&self, transaction_id: i64) -> Result<bool> {
        let fees = self.fees.read().await;
        Ok(fees.keys().any(|k| k.transaction_id == transaction_id))
    }

    async fn save_all(&self, rows: Vec<PostSaleRecordFee>) -> Result<()> {
        let keys = FeeRowKey::for_rows(&rows);
        let mut fees = self.fees.write().await;
        fees.extend(keys.into_iter().zip(rows));
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<PostSaleRecordFee>> {
        let fees = self.fees.read().await;
        Ok(fees.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryFeeFailMarkerStore {
    markers: Arc<RwLock<BTreeMap<i64, PostFailCreateSaleFee>>>,
}

impl InMemoryFeeFailMarkerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeeFailMarkerStore for InMemoryFeeFailMarkerStore {
    async fn get(&self, transaction_id: i64) -> Result<Option<PostFailCreateSaleFee>> {
        let markers = self.markers.read().await;
        Ok(markers.get(&transaction_id).cloned())
    }

    async fn save(&self, marker: PostFailCreateSaleFee) -> Result<()> {
        let mut markers = self.markers.write().await;
        markers.insert(marker.transaction_id, marker);
        Ok(())
    }

    async fn mark_processed(&self, transaction_id: i64) -> Result<bool> {
        let mut markers = self.markers.write().await;
        match markers.get_mut(&transaction_id) {
            Some(marker) => {
                marker.is_processed = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_all(&self) -> Result<Vec<PostFailCreateSaleFee>> {
        let markers = self.markers.read().await;
        Ok(markers.values().cloned().collect())
    }
}
