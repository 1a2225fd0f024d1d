//! Error type shared by the loader, the bindings and the server

use std::path::PathBuf;

/// Errors that can occur while loading data or answering a request
#[derive(Debug, thiserror::Error)]
pub enum DashError {
    /// Dataset file does not exist
    #[error("Dataset file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader/writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed dataset content
    #[error("Parse error on line {line}: {reason}")]
    Parse { line: u64, reason: String },

    /// Column not present in the dataset
    #[error("Column not found: {0}")]
    UnknownColumn(String),

    /// Axis value outside its option list
    #[error("Invalid {axis}-axis selection: {value:?}")]
    InvalidAxis { axis: char, value: String },

    /// Query string could not be decoded
    #[error("Bad query: {0}")]
    BadQuery(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file error
    #[error("Config error: {0}")]
    Config(String),

    /// HTTP server could not start
    #[error("Server error: {0}")]
    Server(String),
}

impl DashError {
    /// HTTP status used when this error ends a request
    pub fn status_code(&self) -> u16 {
        match self {
            DashError::InvalidAxis { .. } | DashError::UnknownColumn(_) | DashError::BadQuery(_) => {
                400
            }
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;
