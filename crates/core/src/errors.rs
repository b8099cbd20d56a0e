use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FulfillmentError {
    #[error("bad request: {message}")]
    BadRequest { message: String },
}

/// Wire body of every rejected webhook call: `{"status": 400, "message": ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
}

impl FulfillmentError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest { .. } => 400,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message } => message,
        }
    }

    pub fn into_body(self) -> ErrorBody {
        let status = self.status_code();
        match self {
            Self::BadRequest { message } => ErrorBody { status, message },
        }
    }
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("could not open dataset `{path}`: {source}")]
    Open { path: PathBuf, source: std::io::Error },
    #[error("could not parse dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset header is missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("dataset row {row} has {found} fields, expected {expected}")]
    FieldCount { row: usize, found: usize, expected: usize },
    #[error("dataset row {row} has an empty `{column}` field")]
    EmptyField { row: usize, column: &'static str },
}
