use clap::Parser;
use fleet_tools::core::fetch::{download, validate_export};
use fleet_tools::utils::{logger, validation::Validate};
use fleet_tools::{FetchConfig, Result};

#[tokio::main]
async fn main() {
    let config = FetchConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::info!("Fetching vehicle export");

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(2);
    }

    if let Err(e) = run(&config).await {
        tracing::error!("Fetch failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(2);
    }
}

async fn run(config: &FetchConfig) -> Result<()> {
    let path = download(config).await?;
    tracing::info!("Export saved to {}", path);

    if config.save_only {
        println!("✅ File saved to {}", path);
        return Ok(());
    }

    let rows = validate_export(&path, &config.allowed_statuses())?;
    tracing::info!("Validated {} data rows", rows);
    println!("✅ File saved to {} ({} rows validated)", path, rows);
    Ok(())
}
