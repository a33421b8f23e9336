use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum AzkarError {
    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("invalid content source: {0}")]
    InvalidSource(String),

    #[error("content source request failed: {0}")]
    SourceHttp(String),

    #[error("content source returned status {status}: {message}")]
    SourceStatus { status: u16, message: String },

    #[error("content source returned an undecodable payload: {0}")]
    SourcePayload(String),

    #[error("failed to parse persisted snapshot: {0}")]
    SnapshotParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
