use crate::domain::fee::{FeeRowKey, PostFailCreateSaleFee, PostSaleRecordFee};
use crate::domain::mileage::PostMileage;
use crate::domain::ports::{DuplicateGuard, FeeFailMarkerStore, MileageStore, SaleRecordFeeStore};
use crate::error::{PostprocessError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Column Family for mileage postings, keyed by transaction id.
pub const CF_MILEAGE: &str = "mileage";
/// Column Family for fee rows, keyed by [`FeeRowKey::to_bytes`].
pub const CF_SALE_RECORD_FEES: &str = "sale_record_fees";
/// Column Family for fee-fail markers, keyed by transaction id.
pub const CF_FEE_FAIL_MARKERS: &str = "fee_fail_markers";

/// A persistent store implementation using RocksDB.
///
/// Holds mileage postings, fee rows and fee-fail markers in separate Column
/// Families. Values are JSON encoded.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

fn storage_error(msg: String) -> PostprocessError {
    PostprocessError::Storage(Box::new(std::io::Error::other(msg)))
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| storage_error(format!("Serialization error: {}", e)))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| storage_error(format!("Deserialization error: {}", e)))
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path, creating the
    /// column families on first use.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = [CF_MILEAGE, CF_SALE_RECORD_FEES, CF_FEE_FAIL_MARKERS]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, cfs)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| storage_error(format!("{} column family not found", name)))
    }

    fn get_value<T: DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, key)? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn all_values<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut values = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) =
                item.map_err(|e| storage_error(format!("RocksDB iteration error: {}", e)))?;
            values.push(decode(&value)?);
        }
        Ok(values)
    }
}

#[async_trait]
impl MileageStore for RocksDBStore {
    async fn create(&self, posting: PostMileage) -> Result<()> {
        let cf = self.cf(CF_MILEAGE)?;
        self.db
            .put_cf(cf, posting.transaction_id.to_be_bytes(), encode(&posting)?)?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<PostMileage>> {
        self.all_values(CF_MILEAGE)
    }
}

#[async_trait]
impl DuplicateGuard for RocksDBStore {
    async fn check_order_refund_exist(&self, transaction_id: i64) -> Result<bool> {
        let cf = self.cf(CF_MILEAGE)?;
        let result = self.db.get_pinned_cf(cf, transaction_id.to_be_bytes())?;
        Ok(result.is_some())
    }
}

#[async_trait]
impl SaleRecordFeeStore for RocksDBStore {
    async fn exists(&self, transaction_id: i64) -> Result<bool> {
        let cf = self.cf(CF_SALE_RECORD_FEES)?;
        let prefix = transaction_id.to_be_bytes();
        let mut iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(&prefix, Direction::Forward));

        match iter.next() {
            Some(item) => {
                let (key, _value) =
                    item.map_err(|e| storage_error(format!("RocksDB iteration error: {}", e)))?;
                Ok(key.starts_with(&prefix))
            }
            None => Ok(false),
        }
    }

    async fn save_all(&self, fees: Vec<PostSaleRecordFee>) -> Result<()> {
        let cf = self.cf(CF_SALE_RECORD_FEES)?;
        let mut batch = WriteBatch::default();
        for (key, fee) in FeeRowKey::for_rows(&fees).into_iter().zip(&fees) {
            batch.put_cf(cf, key.to_bytes(), encode(fee)?);
        }
        self.db.write(batch)?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<PostSaleRecordFee>> {
        self.all_values(CF_SALE_RECORD_FEES)
    }
}

#[async_trait]
impl FeeFailMarkerStore for RocksDBStore {
    async fn get(&self, transaction_id: i64) -> Result<Option<PostFailCreateSaleFee>> {
        self.get_value(CF_FEE_FAIL_MARKERS, &transaction_id.to_be_bytes())
    }

    async fn save(&self, marker: PostFailCreateSaleFee) -> Result<()> {
        let cf = self.cf(CF_FEE_FAIL_MARKERS)?;
        self.db
            .put_cf(cf, marker.transaction_id.to_be_bytes(), encode(&marker)?)?;
        Ok(())
    }

    async fn mark_processed(&self, transaction_id: i64) -> Result<bool> {
        let Some(mut marker) = FeeFailMarkerStore::get(self, transaction_id).await? else {
            return Ok(false);
        };
        marker.is_processed = true;
        FeeFailMarkerStore::save(self, marker).await?;
        Ok(true)
    }

    async fn get_all(&self) -> Result<Vec<PostFailCreateSaleFee>> {
        self.all_values(CF_FEE_FAIL_MARKERS)
    }
}
