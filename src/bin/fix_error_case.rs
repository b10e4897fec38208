use clap::Parser;
use fleet_tools::core::patch::lowercase_error_messages;
use fleet_tools::utils::{logger, validation::Validate};
use fleet_tools::FixConfig;

fn main() {
    let config = FixConfig::parse();

    logger::init_cli_logger(config.verbose);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    match lowercase_error_messages(&config.root) {
        Ok(outcome) => {
            tracing::info!(
                "{} fixes across {} files",
                outcome.fixes,
                outcome.files_changed
            );
            println!("{}", outcome.fixes);
        }
        Err(e) => {
            tracing::error!("Patch run failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}
