use std::fs;

use clap::Args;
use serde::Deserialize;

use crate::utils::error::{Result, ToolError};

/// Connection flags shared by every database-touching tool. Individual
/// `--db-*` flags override values loaded from `--db-config`.
#[derive(Debug, Clone, Args)]
pub struct DbArgs {
    /// TOML file with a [database] section
    #[arg(long = "db-config")]
    pub db_config: Option<String>,

    #[arg(long = "db-host")]
    pub db_host: Option<String>,

    #[arg(long = "db-port")]
    pub db_port: Option<u16>,

    #[arg(long = "db-name")]
    pub db_name: Option<String>,

    #[arg(long = "db-user")]
    pub db_user: Option<String>,

    #[arg(long = "db-password")]
    pub db_password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct DbConfigFile {
    database: DbSection,
}

#[derive(Debug, Default, Deserialize)]
struct DbSection {
    host: Option<String>,
    port: Option<u16>,
    name: Option<String>,
    user: Option<String>,
    password: Option<String>,
}

impl DbArgs {
    pub fn resolve(&self) -> Result<DbConfig> {
        let file = match &self.db_config {
            Some(path) => {
                let text = fs::read_to_string(path)?;
                toml::from_str::<DbConfigFile>(&text)?.database
            }
            None => DbSection::default(),
        };

        Ok(DbConfig {
            host: self
                .db_host
                .clone()
                .or(file.host)
                .ok_or_else(|| missing("db-host"))?,
            port: self.db_port.or(file.port).unwrap_or(5432),
            name: self
                .db_name
                .clone()
                .or(file.name)
                .ok_or_else(|| missing("db-name"))?,
            user: self
                .db_user
                .clone()
                .or(file.user)
                .ok_or_else(|| missing("db-user"))?,
            password: self
                .db_password
                .clone()
                .or(file.password)
                .ok_or_else(|| missing("db-password"))?,
        })
    }
}

fn missing(field: &str) -> ToolError {
    ToolError::MissingConfig {
        field: field.to_string(),
    }
}
