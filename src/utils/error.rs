use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("oid-count is required when oid-type is {mode}")]
    MissingCount { mode: String },

    #[error("identifier {identifier:?} contains no digits")]
    EmptyIdentifier { identifier: String },

    #[error("unknown strategy value: {value:?}")]
    UnknownStrategy { value: String },

    #[error("no window of {identifier:?} fits into 4 bytes")]
    NoFittingWindow { identifier: String },

    #[error("column not found in spreadsheet: {column}")]
    MissingColumn { column: String },

    #[error("unexpected header: {found:?} != {expected:?}")]
    HeaderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("data errors ({total}): {preview}")]
    RowValidation { total: usize, preview: String },

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file error: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("invalid value for {field}: {value:?} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("missing required setting: {field}")]
    MissingConfig { field: String },
}

pub type Result<T> = std::result::Result<T, ToolError>;
