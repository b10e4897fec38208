pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{CheckConfig, FetchConfig, FixConfig, ImportConfig};
pub use utils::error::{Result, ToolError};
