use thiserror::Error;

#[derive(Debug, Error)]
pub enum InspectionError {
    #[error("Missing record: {0}")]
    MissingRecord(String),

    #[error("Unknown document: {0}")]
    UnknownDocument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
