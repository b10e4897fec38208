use clap::Parser;
use fleet_tools::adapters::db::{connect, PgVehicleStore};
use fleet_tools::core::import::{read_import_rows, run_import};
use fleet_tools::domain::model::ImportSummary;
use fleet_tools::utils::{logger, validation::Validate};
use fleet_tools::{ImportConfig, Result};

#[tokio::main]
async fn main() {
    let config = ImportConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::info!("Starting vehicle import");

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    match run(&config).await {
        Ok(summary) => {
            tracing::info!(
                "Import finished: {} inserted, {} skipped",
                summary.inserted,
                summary.skipped
            );
            println!(
                "✅ Imported {} vehicles, skipped {}",
                summary.inserted, summary.skipped
            );
        }
        Err(e) => {
            tracing::error!("Import failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(config: &ImportConfig) -> Result<ImportSummary> {
    let rows = read_import_rows(&config.excel_path, &config.imei_column, &config.plate_column)?;
    tracing::info!("Read {} usable rows from {}", rows.len(), config.excel_path);

    let db_config = config.db.resolve()?;
    let pool = connect(&db_config).await?;
    let store = PgVehicleStore::new(pool.clone());

    let summary = run_import(&store, &rows, &config.strategy(), config.provider_id).await;

    pool.close().await;
    Ok(summary)
}
