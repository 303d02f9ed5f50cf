use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum PostprocessError {
    #[error("activity fee rate cannot be zero (offer {offer_no})")]
    #[diagnostic(code(sale_postprocess::zero_fee_rate))]
    ZeroFeeRate { offer_no: String },

    #[error("promotion event not found: {0}")]
    #[diagnostic(code(sale_postprocess::promotion_not_found))]
    PromotionNotFound(String),

    #[error("catalog translation error: {0}")]
    #[diagnostic(code(sale_postprocess::catalog))]
    Catalog(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    #[diagnostic(code(sale_postprocess::storage))]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for PostprocessError {
    fn from(err: rocksdb::Error) -> Self {
        PostprocessError::Storage(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, PostprocessError>;
