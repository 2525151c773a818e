//! Error types for the novafs namespace layer.

use crate::entity::LinkKind;
use crate::types::{FileId, LinkId};
use thiserror::Error;

/// Record-store errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize record collection: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Namespace service errors
#[derive(Debug, Error)]
pub enum NamespaceError {
    #[error("Link not found: {0}")]
    LinkNotFound(LinkId),

    #[error("File record not found: {0}")]
    FileNotFound(FileId),

    #[error("Operation requires a {expected} link, got {actual}")]
    WrongKind {
        expected: &'static str,
        actual: LinkKind,
    },

    #[error("Invalid move target: {0}")]
    InvalidTarget(String),

    #[error("Broken parent chain walking up from {link}: ancestor {missing} does not resolve")]
    BrokenChain { link: LinkId, missing: LinkId },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Physical storage I/O failure: {0}")]
    Io(#[from] std::io::Error),
}
