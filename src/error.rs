use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayerError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Duplicate column after rename: {0}")]
    DuplicateColumn(String),

    #[error("Invalid timestamp at row {row}: {value:?}")]
    InvalidTimestamp { row: usize, value: String },

    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Registry error: {message}")]
    Registry { message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LayerError>;
