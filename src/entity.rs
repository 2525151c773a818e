//! Entity model for the logical namespace.
//!
//! Two record types make up the whole persisted state: `Link`, a node in the
//! logical tree, and `FileRecord`, the metadata for one physical content
//! object. The record stores hold these without interpreting them; every
//! referential invariant between them is maintained by the namespace service.

use crate::types::{FileId, LinkId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Kind of a namespace node. Root and Trash are structural singletons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkKind {
    Root,
    Folder,
    File,
    Trash,
}

impl LinkKind {
    /// Whether links of this kind may own children.
    pub fn is_container(&self) -> bool {
        matches!(self, LinkKind::Root | LinkKind::Folder | LinkKind::Trash)
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkKind::Root => "ROOT",
            LinkKind::Folder => "FOLDER",
            LinkKind::File => "FILE",
            LinkKind::Trash => "TRASH",
        };
        f.write_str(name)
    }
}

/// A node in the logical namespace tree.
///
/// `parent_id` is `None` only for the Root singleton. `target_file_id` is
/// `Some` exactly when `kind == File`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub kind: LinkKind,
    pub display_name: String,
    pub parent_id: Option<LinkId>,
    pub target_file_id: Option<FileId>,
}

impl Link {
    /// The Root singleton. No parent by construction.
    pub fn root(display_name: impl Into<String>) -> Self {
        Link {
            id: LinkId::generate(),
            kind: LinkKind::Root,
            display_name: display_name.into(),
            parent_id: None,
            target_file_id: None,
        }
    }

    /// The Trash singleton, parented to Root.
    pub fn trash(display_name: impl Into<String>, root_id: LinkId) -> Self {
        Link {
            id: LinkId::generate(),
            kind: LinkKind::Trash,
            display_name: display_name.into(),
            parent_id: Some(root_id),
            target_file_id: None,
        }
    }

    /// A logical folder under the given parent.
    pub fn folder(display_name: impl Into<String>, parent_id: LinkId) -> Self {
        Link {
            id: LinkId::generate(),
            kind: LinkKind::Folder,
            display_name: display_name.into(),
            parent_id: Some(parent_id),
            target_file_id: None,
        }
    }

    /// A file link under the given parent, owning the given record.
    pub fn file(display_name: impl Into<String>, parent_id: LinkId, target: FileId) -> Self {
        Link {
            id: LinkId::generate(),
            kind: LinkKind::File,
            display_name: display_name.into(),
            parent_id: Some(parent_id),
            target_file_id: Some(target),
        }
    }
}

/// Metadata for one physical content object in the blob directory.
///
/// `id` and `physical_path` never change after creation; only `display_name`
/// mutates, when a rename propagates from the owning link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: FileId,
    pub display_name: String,
    pub extension: String,
    pub physical_path: PathBuf,
}

impl FileRecord {
    pub fn new(
        display_name: impl Into<String>,
        extension: impl Into<String>,
        physical_path: PathBuf,
    ) -> Self {
        FileRecord {
            id: FileId::generate(),
            display_name: display_name.into(),
            extension: extension.into(),
            physical_path,
        }
    }

    /// Display name with the recorded extension appended when missing.
    ///
    /// Used when materializing the record outside the namespace (export),
    /// where the on-disk name should carry the original suffix.
    pub fn export_name(&self) -> String {
        if self.extension.is_empty() {
            return self.display_name.clone();
        }
        let suffix = format!(".{}", self.extension);
        if self
            .display_name
            .to_lowercase()
            .ends_with(&suffix.to_lowercase())
        {
            self.display_name.clone()
        } else {
            format!("{}{}", self.display_name, suffix)
        }
    }
}
