//! Identifier types for the novafs namespace.
//!
//! Both identifiers are random UUIDs assigned once at creation and never
//! reused; physical blob filenames are derived from `FileId`, which keeps
//! the blob directory collision-free by construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a logical namespace node (`Link`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(Uuid);

/// Identifier of a physical file record (`FileRecord`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(Uuid);

impl LinkId {
    /// Allocate a fresh identifier.
    pub fn generate() -> Self {
        LinkId(Uuid::new_v4())
    }
}

impl FileId {
    /// Allocate a fresh identifier.
    pub fn generate() -> Self {
        FileId(Uuid::new_v4())
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for LinkId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(LinkId(Uuid::parse_str(s)?))
    }
}

impl FromStr for FileId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FileId(Uuid::parse_str(s)?))
    }
}
