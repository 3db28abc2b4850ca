//! Error types for feature comparison runs
//!
//! Only conditions that abort a run live here. Registry drift and probe
//! failures are advisory and never surface as errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while scanning a single man-page document
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed document at byte {position}: {message}")]
pub struct ExtractError {
    /// Byte offset in the document where the reader gave up
    pub position: u64,
    /// Reader error text
    pub message: String,
}

impl ExtractError {
    pub fn new(position: u64, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Fatal errors for a feature comparison run
#[derive(Debug, Error)]
pub enum FeatCmpError {
    /// Page document could not be read from disk
    #[error("failed to read page {page} from {}: {source}", path.display())]
    ReadPage {
        page: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Page document is not well-formed XML
    #[error("page {page} is malformed: {source}")]
    MalformedPage {
        page: String,
        #[source]
        source: ExtractError,
    },

    /// Page was requested but the source has no document for it
    #[error("no document available for page {0}")]
    MissingPage(String),

    /// Registry file could not be read
    #[error("failed to read registry {}: {source}", path.display())]
    RegistryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Registry file is not valid registry JSON
    #[error("invalid registry: {0}")]
    RegistryFormat(#[from] serde_json::Error),

    /// Report could not be written
    #[error("failed to write report to {}: {source}", path.display())]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Presence probe could not be set up (bad pattern, missing repository)
    #[error("probe setup failed: {0}")]
    ProbeSetup(String),
}

pub type Result<T> = std::result::Result<T, FeatCmpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_page_message_names_page_and_position() {
        let err = FeatCmpError::MalformedPage {
            page: "systemd.service".to_string(),
            source: ExtractError::new(42, "expected `</term>`"),
        };
        let msg = err.to_string();
        assert!(msg.contains("systemd.service"));
        assert!(msg.contains("byte 42"));
    }

    #[test]
    fn test_read_page_message_includes_path() {
        let err = FeatCmpError::ReadPage {
            page: "sd_notify".to_string(),
            path: PathBuf::from("/tmp/systemd/man/sd_notify.xml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/tmp/systemd/man/sd_notify.xml"));
    }
}
