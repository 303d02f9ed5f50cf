use crate::domain::fee::{FeePolicy, FeeRounding, OfferResolution};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Which persisted table is written to stdout after processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputTable {
    #[default]
    Fees,
    Mileage,
    FailMarkers,
}

/// Computes mileage postings and fee allocations for sale-record events.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Input sale-record events, one JSON object per line
    pub input: PathBuf,

    /// Promotion events CSV (offerNo, eventTypeCode, feeRate, ...)
    #[arg(long, env = "SALEPOST_PROMOTIONS")]
    pub promotions: Option<PathBuf>,

    /// Catalog campaigns JSON, translated into promotion events at load
    #[arg(long, env = "SALEPOST_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "SALEPOST_DB_PATH")]
    pub db_path: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t, env = "SALEPOST_OFFER_RESOLUTION")]
    pub offer_resolution: OfferResolution,

    #[arg(long, value_enum, default_value_t, env = "SALEPOST_FEE_ROUNDING")]
    pub fee_rounding: FeeRounding,

    #[arg(long, value_enum, default_value_t)]
    pub output: OutputTable,

    /// Default log filter; `RUST_LOG` takes precedence
    #[arg(long, default_value = "info", env = "SALEPOST_LOG_LEVEL")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "SALEPOST_LOG_JSON")]
    pub log_json: bool,
}

impl Config {
    pub fn fee_policy(&self) -> FeePolicy {
        FeePolicy {
            resolution: self.offer_resolution,
            rounding: self.fee_rounding,
        }
    }
}
