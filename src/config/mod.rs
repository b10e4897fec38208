pub mod db;

use std::collections::HashSet;

use clap::Parser;

use crate::adapters::db::ClientMatch;
use crate::core::oid::{Direction, OidMode, OidStrategy};
use crate::utils::error::{Result, ToolError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_url, Validate,
};

fn parse_mode(s: &str) -> Result<OidMode> {
    s.parse()
}

fn parse_direction(s: &str) -> Result<Direction> {
    s.parse()
}

/// Bulk-imports vehicles from a spreadsheet into the tracking database.
#[derive(Debug, Clone, Parser)]
#[command(name = "import-vehicles")]
#[command(about = "Bulk-import vehicles from a spreadsheet into the tracking database")]
pub struct ImportConfig {
    #[arg(long)]
    pub excel_path: String,

    /// Header of the column holding device identifiers
    #[arg(long)]
    pub imei_column: String,

    /// Header of the column holding license plate numbers
    #[arg(long)]
    pub plate_column: String,

    #[arg(long)]
    pub provider_id: i32,

    /// OID derivation mode: digits, bytes or max_digits
    #[arg(long, value_parser = parse_mode)]
    pub oid_type: OidMode,

    /// Which end of the identifier to take: start or end
    #[arg(long, value_parser = parse_direction)]
    pub oid_from: Direction,

    /// Digit or byte count, required for digits and bytes modes
    #[arg(long)]
    pub oid_count: Option<usize>,

    #[command(flatten)]
    pub db: db::DbArgs,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl ImportConfig {
    pub fn strategy(&self) -> OidStrategy {
        OidStrategy {
            mode: self.oid_type,
            direction: self.oid_from,
            count: self.oid_count,
        }
    }
}

impl Validate for ImportConfig {
    fn validate(&self) -> Result<()> {
        validate_path("excel_path", &self.excel_path)?;
        validate_non_empty_string("imei_column", &self.imei_column)?;
        validate_non_empty_string("plate_column", &self.plate_column)?;
        if matches!(self.oid_type, OidMode::Digits | OidMode::Bytes) && self.oid_count.is_none() {
            return Err(ToolError::MissingCount {
                mode: self.oid_type.to_string(),
            });
        }
        Ok(())
    }
}

/// Matches spreadsheet IMEIs against the `point` table by tail.
#[derive(Debug, Clone, Parser)]
#[command(name = "check-imei")]
#[command(about = "Match spreadsheet IMEIs against tracked points by tail")]
pub struct CheckConfig {
    #[arg(long)]
    pub excel_path: String,

    #[command(flatten)]
    pub db: db::DbArgs,

    /// Compare the JSON client field as a number or as text
    #[arg(long, value_enum, default_value = "numeric")]
    pub match_as: ClientMatch,

    /// Write the CSV report here instead of stdout
    #[arg(long)]
    pub output: Option<String>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl Validate for CheckConfig {
    fn validate(&self) -> Result<()> {
        validate_path("excel_path", &self.excel_path)
    }
}

/// Downloads the exported vehicle spreadsheet and validates it.
#[derive(Debug, Clone, Parser)]
#[command(name = "fetch-vehicles")]
#[command(about = "Download the exported vehicle spreadsheet over HTTP and validate it")]
pub struct FetchConfig {
    #[arg(long)]
    pub url: String,

    /// Where to save the download; defaults to the server-supplied name
    #[arg(long)]
    pub output: Option<String>,

    /// Value for the X-API-Key request header
    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub provider_id: Option<i32>,

    #[arg(long)]
    pub moderation_status: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Save the file without validating it
    #[arg(long)]
    pub save_only: bool,

    /// Comma-separated set of acceptable moderation statuses
    #[arg(long, default_value = "pending,approved,rejected")]
    pub allowed_status: String,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl FetchConfig {
    pub fn allowed_statuses(&self) -> HashSet<String> {
        self.allowed_status
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Validate for FetchConfig {
    fn validate(&self) -> Result<()> {
        validate_url("url", &self.url)?;
        validate_positive_number("timeout", self.timeout, 1)?;
        if self.allowed_statuses().is_empty() && !self.save_only {
            return Err(ToolError::InvalidConfigValue {
                field: "allowed_status".to_string(),
                value: self.allowed_status.clone(),
                reason: "at least one status is required for validation".to_string(),
            });
        }
        Ok(())
    }
}

/// Lowercases the first letter of fmt.Errorf messages in a Go tree.
#[derive(Debug, Clone, Parser)]
#[command(name = "fix-error-case")]
#[command(about = "Lowercase the first letter of fmt.Errorf messages in a Go source tree")]
pub struct FixConfig {
    /// Directory to scan
    #[arg(default_value = ".")]
    pub root: String,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl Validate for FixConfig {
    fn validate(&self) -> Result<()> {
        validate_path("root", &self.root)
    }
}
