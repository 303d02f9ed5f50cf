use clap::Parser;
use miette::{IntoDiagnostic, Result};
use sale_postprocess::application::engine::{PostprocessEngine, Stores};
use sale_postprocess::config::{Config, OutputTable};
use sale_postprocess::infrastructure::in_memory::{
    InMemoryFeeFailMarkerStore, InMemoryMileageStore, InMemoryPromotionCatalog,
    InMemorySaleRecordFeeStore,
};
use sale_postprocess::interfaces::csv::promotion_reader::PromotionReader;
use sale_postprocess::interfaces::csv::record_writer::RecordWriter;
use sale_postprocess::interfaces::json::catalog_reader::read_catalog;
use sale_postprocess::interfaces::json::event_reader::SaleRecordReader;
use sale_postprocess::logging::init_tracing;
use std::fs::File;
use std::io;
use tracing::{error, info, warn};

async fn load_promotions(config: &Config) -> Result<InMemoryPromotionCatalog> {
    let catalog = InMemoryPromotionCatalog::new();

    if let Some(path) = &config.promotions {
        let file = File::open(path).into_diagnostic()?;
        for promotion in PromotionReader::new(file).promotions() {
            match promotion {
                Ok(promotion) => catalog.insert(promotion).await,
                Err(e) => warn!(error = %e, "skipping unreadable promotion row"),
            }
        }
    }

    if let Some(path) = &config.catalog {
        let file = File::open(path).into_diagnostic()?;
        for promotion in read_catalog(file)? {
            catalog.insert(promotion).await;
        }
    }

    info!(promotions = catalog.len().await, "promotion catalog loaded");
    Ok(catalog)
}

fn in_memory_stores(promotions: InMemoryPromotionCatalog) -> Stores {
    let mileage = InMemoryMileageStore::new();
    Stores {
        promotions: Box::new(promotions),
        duplicate_guard: Box::new(mileage.clone()),
        mileage: Box::new(mileage),
        fees: Box::new(InMemorySaleRecordFeeStore::new()),
        fail_markers: Box::new(InMemoryFeeFailMarkerStore::new()),
    }
}

#[cfg(feature = "storage-rocksdb")]
fn build_stores(config: &Config, promotions: InMemoryPromotionCatalog) -> Result<Stores> {
    use sale_postprocess::infrastructure::rocksdb::RocksDBStore;

    let Some(db_path) = &config.db_path else {
        return Ok(in_memory_stores(promotions));
    };
    let store = RocksDBStore::open(db_path)?;
    Ok(Stores {
        promotions: Box::new(promotions),
        duplicate_guard: Box::new(store.clone()),
        mileage: Box::new(store.clone()),
        fees: Box::new(store.clone()),
        fail_markers: Box::new(store),
    })
}

#[cfg(not(feature = "storage-rocksdb"))]
fn build_stores(config: &Config, promotions: InMemoryPromotionCatalog) -> Result<Stores> {
    if let Some(db_path) = &config.db_path {
        warn!(
            db_path = %db_path.display(),
            "persistent storage requested but the storage-rocksdb feature is not enabled, falling back to in-memory storage"
        );
    }
    Ok(in_memory_stores(promotions))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    init_tracing(&config.log_level, config.log_json);

    let promotions = load_promotions(&config).await?;
    let engine = PostprocessEngine::new(build_stores(&config, promotions)?, config.fee_policy());
    info!(policy = ?config.fee_policy(), "engine ready");

    let file = File::open(&config.input).into_diagnostic()?;
    for event in SaleRecordReader::new(file).events() {
        let event = match event {
            Ok(event) => event,
            Err(e) => {
                error!(error = %e, "Error reading sale record");
                continue;
            }
        };

        let report = engine.process(&event).await;
        if let Err(e) = report.mileage {
            error!(transaction_id = event.transaction_id, error = %e, "mileage posting failed");
        }
        if let Err(e) = report.fees {
            error!(transaction_id = event.transaction_id, error = %e, "fee allocation failed");
        }
    }

    let stdout = io::stdout();
    let mut writer = RecordWriter::new(stdout.lock());
    match config.output {
        OutputTable::Fees => writer.write_records(engine.sale_record_fees().await?)?,
        OutputTable::Mileage => writer.write_records(engine.mileage_postings().await?)?,
        OutputTable::FailMarkers => writer.write_records(engine.fail_markers().await?)?,
    }

    Ok(())
}
