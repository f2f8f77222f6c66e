use thiserror::Error;

#[derive(Error, Debug)]
pub enum VineSightError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config file error: {0}")]
    Config(String),

    /// Unsupported growth stage, irrigation method or soil type, or an
    /// irrigation system that cannot deliver water. Never defaulted.
    #[error("Configuration error: unsupported {kind} '{value}'")]
    Configuration { kind: &'static str, value: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl VineSightError {
    pub fn configuration(kind: &'static str, value: impl Into<String>) -> Self {
        VineSightError::Configuration {
            kind,
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VineSightError>;
