use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("Required source '{table}' not available at {path}")]
    MissingRequiredSource { table: String, path: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type FeatureResult<T> = Result<T, FeatureError>;
