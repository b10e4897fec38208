use std::fs::File;
use std::io;

use clap::Parser;
use fleet_tools::adapters::db::{connect, PgPointLookup};
use fleet_tools::core::check::{find_matches, read_imeis, write_report};
use fleet_tools::utils::{logger, validation::Validate};
use fleet_tools::{CheckConfig, Result};

#[tokio::main]
async fn main() {
    let config = CheckConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::info!("Starting IMEI check");

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&config).await {
        tracing::error!("IMEI check failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(config: &CheckConfig) -> Result<()> {
    let imeis = read_imeis(&config.excel_path)?;
    tracing::info!(
        "Checking {} unique IMEIs from {}",
        imeis.len(),
        config.excel_path
    );

    let db_config = config.db.resolve()?;
    let pool = connect(&db_config).await?;
    let lookup = PgPointLookup::new(pool.clone(), config.match_as);

    let matches = find_matches(&lookup, &imeis).await;
    pool.close().await;
    let matches = matches?;

    let matched = matches.iter().filter(|m| !m.client_tail.is_empty()).count();
    tracing::info!("{} of {} IMEIs matched a point", matched, matches.len());

    match &config.output {
        Some(path) => {
            write_report(File::create(path)?, &matches)?;
            println!("✅ Report saved to {}", path);
        }
        None => write_report(io::stdout().lock(), &matches)?,
    }
    Ok(())
}
