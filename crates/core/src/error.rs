use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("Data error: {0}")]
    Data(String),

    #[error("Member error: {0}")]
    Member(String),

    #[error("Malformed ancestry at member '{member}': {reason}")]
    MalformedAncestry { member: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TreeError>;
