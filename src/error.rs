use std::path::PathBuf;

use crate::models::vacancy::Source;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{provider} vacancy is missing field '{field}'")]
    MissingField { provider: Source, field: String },

    #[error("{provider} vacancy field '{field}' is invalid: {reason}")]
    InvalidField {
        provider: Source,
        field: String,
        reason: String,
    },

    #[error("{provider} request failed: {error}")]
    Request {
        provider: Source,
        #[source]
        error: reqwest::Error,
    },

    #[error("Failed to decode {provider} response: {error}")]
    Decode {
        provider: Source,
        #[source]
        error: reqwest::Error,
    },

    #[error("Unexpected {provider} response: {reason}")]
    UnexpectedResponse { provider: Source, reason: String },

    #[error("Data file {} is corrupt: {error}", path.display())]
    CorruptFile {
        path: PathBuf,
        #[source]
        error: serde_json::Error,
    },

    #[error("Data file entry #{index} is invalid: {reason}")]
    SchemaInvalid { index: usize, reason: String },

    #[error("Data file {} is not usable: {reason}, run `jobfeed fetch` first", path.display())]
    NotReady { path: PathBuf, reason: String },

    #[error("I/O error on {}: {error}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("No API key configured for {0} (set SUPERJOB_API_KEY)")]
    MissingApiKey(Source),

    #[error("Internal error: {0}")]
    Internal(String),
}
