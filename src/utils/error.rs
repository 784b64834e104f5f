use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Authentication error (401): invalid API token or insufficient permissions ({url})")]
    AuthError { url: String },

    #[error("Not found error (404): {url}")]
    NotFoundError { url: String },

    #[error("HTTP error {status}: {url}")]
    HttpStatusError {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Database error: {0}")]
    DatabaseError(#[from] duckdb::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for '{field}' = '{value}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, EtlError>;
