//! Namespace Service
//!
//! Owns all tree semantics over the two record stores and the physical blob
//! directory: navigation and path resolution, creation and import, the
//! move/trash/delete state machine, and the consistency reconciliation
//! passes. The stores hold data without interpreting it, so every
//! cross-entity invariant is enforced here.
//!
//! The service performs no internal locking; callers must serialize mutating
//! calls. Reads may overlap each other (the JSON stores guard their maps
//! with a read/write lock) but not a concurrent write.

use crate::entity::{FileRecord, Link, LinkKind};
use crate::error::NamespaceError;
use crate::store::{FileRecordStore, LinkStore};
use crate::types::{FileId, LinkId};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Outcome of a recursive directory import.
///
/// The walk never aborts on a per-entry failure; each skipped entry is
/// recorded here with the reason.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub folders_created: usize,
    pub files_imported: usize,
    pub failures: Vec<(PathBuf, String)>,
}

/// Outcome of a full reconciliation pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileReport {
    pub dangling_links_removed: usize,
    pub orphan_files_attached: usize,
}

/// The namespace service. See module docs.
pub struct NamespaceService {
    links: Arc<dyn LinkStore>,
    files: Arc<dyn FileRecordStore>,
    blobs_root: PathBuf,
    root_id: LinkId,
    trash_id: LinkId,
}

impl NamespaceService {
    /// Construct the service over bootstrapped stores.
    ///
    /// `root_id` and `trash_id` come from the bootstrap pass; they are held
    /// as explicit values rather than re-scanned on use. Creates the blob
    /// directory if it does not exist yet.
    pub fn new(
        links: Arc<dyn LinkStore>,
        files: Arc<dyn FileRecordStore>,
        blobs_root: PathBuf,
        root_id: LinkId,
        trash_id: LinkId,
    ) -> Result<Self, NamespaceError> {
        fs::create_dir_all(&blobs_root)?;
        Ok(Self {
            links,
            files,
            blobs_root,
            root_id,
            trash_id,
        })
    }

    pub fn root_id(&self) -> LinkId {
        self.root_id
    }

    pub fn trash_id(&self) -> LinkId {
        self.trash_id
    }

    // ---------- Navigation ----------

    /// All links under `parent_id`, in store iteration order.
    pub fn children(&self, parent_id: LinkId) -> Result<Vec<Link>, NamespaceError> {
        Ok(self.links.find_children(&parent_id)?)
    }

    pub fn find_link(&self, id: LinkId) -> Result<Link, NamespaceError> {
        self.links
            .find_by_id(&id)?
            .ok_or(NamespaceError::LinkNotFound(id))
    }

    /// Resolve the file record a File link points at. `Ok(None)` for
    /// non-File links and links with an unset target.
    pub fn file_for_link(&self, link: &Link) -> Result<Option<FileRecord>, NamespaceError> {
        if link.kind != LinkKind::File {
            return Ok(None);
        }
        let Some(file_id) = link.target_file_id else {
            return Ok(None);
        };
        Ok(self.files.find_by_id(&file_id)?)
    }

    /// Absolute logical path of a link: `/`-joined display names from Root
    /// down, excluding the Root name itself.
    ///
    /// Walks persisted parent references, which external tampering can
    /// corrupt, so a dangling ancestor or a parent cycle surfaces as
    /// `BrokenChain` rather than looping or panicking.
    pub fn resolve_logical_path(&self, link_id: LinkId) -> Result<String, NamespaceError> {
        let start = self.find_link(link_id)?;

        let mut parts = vec![start.display_name.clone()];
        let mut seen: HashSet<LinkId> = HashSet::from([start.id]);
        let mut current = start;

        while let Some(parent_id) = current.parent_id {
            let parent = self.links.find_by_id(&parent_id)?.ok_or(
                NamespaceError::BrokenChain {
                    link: link_id,
                    missing: parent_id,
                },
            )?;
            if !seen.insert(parent.id) {
                // Parent cycle: corruption, same remedy as a dangling ancestor.
                return Err(NamespaceError::BrokenChain {
                    link: link_id,
                    missing: parent.id,
                });
            }
            if parent.kind != LinkKind::Root {
                parts.push(parent.display_name.clone());
            }
            current = parent;
        }

        parts.reverse();
        Ok(format!("/{}", parts.join("/")))
    }

    // ---------- Creation / import ----------

    /// Create a logical folder under `parent_id`. No physical side effect.
    pub fn create_folder(
        &self,
        parent_id: LinkId,
        name: impl Into<String>,
    ) -> Result<Link, NamespaceError> {
        let parent = self.find_link(parent_id)?;
        if !parent.kind.is_container() {
            return Err(NamespaceError::WrongKind {
                expected: "container",
                actual: parent.kind,
            });
        }

        let folder = Link::folder(name, parent_id);
        self.links.save(&folder)?;
        debug!(folder_id = %folder.id, name = %folder.display_name, "created folder");
        Ok(folder)
    }

    /// Materialize a new empty managed file: blob first, then FileRecord,
    /// then the File link. The two record writes are not atomic as a pair;
    /// the start-up reconciliation pass absorbs the orphan window.
    pub fn create_managed_file(
        &self,
        parent_id: LinkId,
        display_name: impl Into<String>,
        extension: impl Into<String>,
    ) -> Result<Link, NamespaceError> {
        let display_name = display_name.into();
        let extension = extension.into();
        let parent = self.find_link(parent_id)?;
        if !parent.kind.is_container() {
            return Err(NamespaceError::WrongKind {
                expected: "container",
                actual: parent.kind,
            });
        }

        let record = FileRecord::new(
            display_name.clone(),
            extension.clone(),
            PathBuf::new(), // placeholder, replaced below
        );
        let dest = self.blob_path(&record.id, &extension);
        fs::File::create(&dest)?;

        let record = FileRecord {
            physical_path: dest,
            ..record
        };
        self.files.save(&record)?;

        let link = Link::file(display_name, parent_id, record.id);
        self.links.save(&link)?;
        info!(link_id = %link.id, file_id = %record.id, "created managed file");
        Ok(link)
    }

    /// Import one external file: copy its bytes into a fresh blob location,
    /// then persist the FileRecord and File link. A copy failure aborts
    /// before any record is persisted, leaving no partial pair behind.
    pub fn import_existing_file(
        &self,
        parent_id: LinkId,
        source: &Path,
    ) -> Result<Link, NamespaceError> {
        let parent = self.find_link(parent_id)?;
        if !parent.kind.is_container() {
            return Err(NamespaceError::WrongKind {
                expected: "container",
                actual: parent.kind,
            });
        }

        let display_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string());
        let extension = source
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        let record = FileRecord::new(display_name.clone(), extension.clone(), PathBuf::new());
        let dest = self.blob_path(&record.id, &extension);
        fs::copy(source, &dest)?;

        let record = FileRecord {
            physical_path: dest,
            ..record
        };
        self.files.save(&record)?;

        let link = Link::file(display_name, parent_id, record.id);
        self.links.save(&link)?;
        info!(link_id = %link.id, source = %source.display(), "imported file");
        Ok(link)
    }

    /// Import a directory tree: the directory becomes a Folder link under
    /// `parent_id`, subdirectories become folders, files become managed
    /// imports into their mirrored folder. One unreadable entry never aborts
    /// the walk; every skipped entry is recorded in the report.
    pub fn import_directory_recursive(
        &self,
        parent_id: LinkId,
        source_dir: &Path,
    ) -> Result<ImportReport, NamespaceError> {
        let dir_name = source_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "import".to_string());
        let top = self.create_folder(parent_id, dir_name)?;

        let mut report = ImportReport {
            folders_created: 1,
            ..ImportReport::default()
        };
        let mut folder_ids: HashMap<PathBuf, LinkId> =
            HashMap::from([(source_dir.to_path_buf(), top.id)]);

        for entry in WalkDir::new(source_dir).min_depth(1) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| source_dir.to_path_buf());
                    warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                    report.failures.push((path, e.to_string()));
                    continue;
                }
            };

            let path = entry.path();
            let Some(parent_path) = path.parent() else {
                continue;
            };
            let Some(&folder_id) = folder_ids.get(parent_path) else {
                // Parent folder failed to materialize earlier; skip subtree
                // entries as they surface.
                report
                    .failures
                    .push((path.to_path_buf(), "parent folder not imported".to_string()));
                continue;
            };

            if entry.file_type().is_dir() {
                let name = entry.file_name().to_string_lossy().into_owned();
                match self.create_folder(folder_id, name) {
                    Ok(folder) => {
                        folder_ids.insert(path.to_path_buf(), folder.id);
                        report.folders_created += 1;
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "failed to mirror directory");
                        report.failures.push((path.to_path_buf(), e.to_string()));
                    }
                }
            } else if entry.file_type().is_file() {
                match self.import_existing_file(folder_id, path) {
                    Ok(_) => report.files_imported += 1,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "failed to import file");
                        report.failures.push((path.to_path_buf(), e.to_string()));
                    }
                }
            }
            // Symlinks and other special entries are ignored.
        }

        info!(
            folders = report.folders_created,
            files = report.files_imported,
            failures = report.failures.len(),
            source = %source_dir.display(),
            "recursive import finished"
        );
        Ok(report)
    }

    // ---------- Move / trash / delete ----------

    /// Generalized move: reparent a Folder or File link.
    ///
    /// Root and Trash are structural singletons and never valid sources.
    /// The destination must resolve, must be a container, must not be the
    /// link itself, and must not be a descendant of the link (checked by
    /// walking upward from the destination). All validation completes before
    /// any write.
    pub fn move_link(&self, link_id: LinkId, new_parent_id: LinkId) -> Result<(), NamespaceError> {
        let mut link = self.find_link(link_id)?;
        if matches!(link.kind, LinkKind::Root | LinkKind::Trash) {
            return Err(NamespaceError::WrongKind {
                expected: "FOLDER or FILE",
                actual: link.kind,
            });
        }

        let new_parent = self
            .links
            .find_by_id(&new_parent_id)?
            .ok_or_else(|| NamespaceError::InvalidTarget(format!("{new_parent_id} not found")))?;
        if !new_parent.kind.is_container() {
            return Err(NamespaceError::WrongKind {
                expected: "container",
                actual: new_parent.kind,
            });
        }
        if new_parent_id == link_id {
            return Err(NamespaceError::InvalidTarget(
                "cannot move a link into itself".to_string(),
            ));
        }
        self.ensure_not_descendant(link_id, new_parent_id)?;

        link.parent_id = Some(new_parent_id);
        self.links.save(&link)?;
        debug!(link_id = %link_id, new_parent = %new_parent_id, "moved link");
        Ok(())
    }

    /// Move a File link into the Trash singleton.
    pub fn move_to_trash(&self, file_link_id: LinkId) -> Result<(), NamespaceError> {
        let mut link = self.find_link(file_link_id)?;
        if link.kind != LinkKind::File {
            return Err(NamespaceError::WrongKind {
                expected: "FILE",
                actual: link.kind,
            });
        }

        link.parent_id = Some(self.trash_id);
        self.links.save(&link)?;
        info!(link_id = %file_link_id, "moved to trash");
        Ok(())
    }

    /// Permanently delete a File link, its FileRecord, and its bytes.
    ///
    /// Byte removal is best-effort: a missing or undeletable blob is logged,
    /// never an abort, so the namespace stays consistent even when the bytes
    /// are not definitely gone. The link is deleted strictly last so it never
    /// outlives its record. A repeat call fails with `LinkNotFound` and has
    /// no side effect.
    pub fn delete_file_permanently(&self, file_link_id: LinkId) -> Result<(), NamespaceError> {
        let link = self.find_link(file_link_id)?;
        if link.kind != LinkKind::File {
            return Err(NamespaceError::WrongKind {
                expected: "FILE",
                actual: link.kind,
            });
        }

        if let Some(file_id) = link.target_file_id {
            if let Some(record) = self.files.find_by_id(&file_id)? {
                match fs::remove_file(&record.physical_path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        warn!(path = %record.physical_path.display(), "blob already missing");
                    }
                    Err(e) => {
                        warn!(path = %record.physical_path.display(), error = %e, "failed to delete blob");
                    }
                }
                self.files.delete(&file_id)?;
            }
        }

        self.links.delete(&file_link_id)?;
        info!(link_id = %file_link_id, "permanently deleted");
        Ok(())
    }

    // ---------- Presentation-facing save / rename / export ----------

    /// Save path for an externally mutated detached copy of a link.
    pub fn save_link(&self, link: &Link) -> Result<(), NamespaceError> {
        Ok(self.links.save(link)?)
    }

    /// Save path for an externally mutated detached copy of a file record.
    pub fn save_file_record(&self, record: &FileRecord) -> Result<(), NamespaceError> {
        Ok(self.files.save(record)?)
    }

    /// Rename a link; for File links the new name propagates to the owned
    /// FileRecord as well. The physical blob is never touched.
    pub fn rename_link(
        &self,
        link_id: LinkId,
        new_name: impl Into<String>,
    ) -> Result<Link, NamespaceError> {
        let new_name = new_name.into();
        let mut link = self.find_link(link_id)?;

        if let Some(mut record) = self.file_for_link(&link)? {
            record.display_name = new_name.clone();
            self.files.save(&record)?;
        }

        link.display_name = new_name;
        self.links.save(&link)?;
        Ok(link)
    }

    /// Copy a managed blob out of the namespace into `dest_dir`, named by
    /// its display name with the recorded extension appended when missing.
    pub fn export_file(
        &self,
        file_link_id: LinkId,
        dest_dir: &Path,
    ) -> Result<PathBuf, NamespaceError> {
        let link = self.find_link(file_link_id)?;
        if link.kind != LinkKind::File {
            return Err(NamespaceError::WrongKind {
                expected: "FILE",
                actual: link.kind,
            });
        }
        let file_id = link
            .target_file_id
            .ok_or(NamespaceError::LinkNotFound(file_link_id))?;
        let record = self
            .files
            .find_by_id(&file_id)?
            .ok_or(NamespaceError::FileNotFound(file_id))?;

        let dest = dest_dir.join(record.export_name());
        fs::copy(&record.physical_path, &dest)?;
        info!(link_id = %file_link_id, dest = %dest.display(), "exported file");
        Ok(dest)
    }

    // ---------- Reconciliation ----------

    /// Delete every File link whose target is unset or does not resolve to a
    /// live FileRecord. Idempotent. Returns the number of links removed.
    pub fn cleanup_dangling_file_links(&self) -> Result<usize, NamespaceError> {
        let live_files: HashSet<FileId> =
            self.files.find_all()?.into_iter().map(|r| r.id).collect();

        let mut removed = 0;
        for link in self.links.find_all()? {
            if link.kind != LinkKind::File {
                continue;
            }
            let dangling = match link.target_file_id {
                None => true,
                Some(id) => !live_files.contains(&id),
            };
            if dangling {
                warn!(link_id = %link.id, name = %link.display_name, "removing dangling file link");
                self.links.delete(&link.id)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Create one File link under Root for every FileRecord no link
    /// references, so every physical record stays reachable from the
    /// namespace. Idempotent. Returns the number of links created.
    pub fn attach_orphan_files_to_root(&self) -> Result<usize, NamespaceError> {
        let referenced: HashSet<FileId> = self
            .links
            .find_all()?
            .into_iter()
            .filter(|l| l.kind == LinkKind::File)
            .filter_map(|l| l.target_file_id)
            .collect();

        let mut attached = 0;
        for record in self.files.find_all()? {
            if referenced.contains(&record.id) {
                continue;
            }
            let link = Link::file(record.display_name.clone(), self.root_id, record.id);
            self.links.save(&link)?;
            info!(file_id = %record.id, link_id = %link.id, "attached orphan file to root");
            attached += 1;
        }
        Ok(attached)
    }

    /// Run both reconciliation passes. Called once at start-up, after
    /// bootstrap and before first use; the core tolerates transient
    /// inconsistency between single-step operations and repairs it here.
    pub fn reconcile(&self) -> Result<ReconcileReport, NamespaceError> {
        let dangling_links_removed = self.cleanup_dangling_file_links()?;
        let orphan_files_attached = self.attach_orphan_files_to_root()?;
        if dangling_links_removed > 0 || orphan_files_attached > 0 {
            info!(
                dangling_links_removed,
                orphan_files_attached, "reconciliation repaired namespace"
            );
        }
        Ok(ReconcileReport {
            dangling_links_removed,
            orphan_files_attached,
        })
    }

    // ---------- Internals ----------

    /// Blob location for a new record: identifier-derived filename, unique
    /// by construction.
    fn blob_path(&self, file_id: &FileId, extension: &str) -> PathBuf {
        let file_name = if extension.is_empty() {
            file_id.to_string()
        } else {
            format!("{file_id}.{extension}")
        };
        self.blobs_root.join(file_name)
    }

    /// Reject a move whose destination sits inside the moved link's own
    /// subtree. Walks upward from the destination; bounded by the same
    /// cycle defense as path resolution.
    fn ensure_not_descendant(
        &self,
        link_id: LinkId,
        new_parent_id: LinkId,
    ) -> Result<(), NamespaceError> {
        let mut seen: HashSet<LinkId> = HashSet::new();
        let mut current = new_parent_id;
        loop {
            if current == link_id {
                return Err(NamespaceError::InvalidTarget(
                    "destination is a descendant of the moved link".to_string(),
                ));
            }
            if !seen.insert(current) {
                return Err(NamespaceError::BrokenChain {
                    link: new_parent_id,
                    missing: current,
                });
            }
            let node = self.links.find_by_id(&current)?.ok_or(
                NamespaceError::BrokenChain {
                    link: new_parent_id,
                    missing: current,
                },
            )?;
            match node.parent_id {
                Some(parent) => current = parent,
                None => return Ok(()),
            }
        }
    }
}
