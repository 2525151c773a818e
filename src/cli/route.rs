//! CLI route: run context and single route table. Dispatches to the
//! namespace service; logical-path addressing lives here, not in the core.

use crate::bootstrap::{ensure_root, ensure_trash};
use crate::cli::parse::Commands;
use crate::config::NovafsConfig;
use crate::entity::Link;
use crate::error::NamespaceError;
use crate::service::NamespaceService;
use crate::store::{JsonFileRecordStore, JsonLinkStore};
use crate::types::LinkId;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Runtime context for CLI execution: configuration plus the wired service.
pub struct RunContext {
    service: NamespaceService,
}

impl RunContext {
    /// Wire stores, bootstrap the singletons, run the start-up
    /// reconciliation pass, and construct the service.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, NamespaceError> {
        let config = NovafsConfig::load(config_path.as_deref())?;

        let links = Arc::new(JsonLinkStore::open(config.storage.links_path())?);
        let files = Arc::new(JsonFileRecordStore::open(config.storage.files_path())?);

        let root = ensure_root(links.as_ref())?;
        let trash = ensure_trash(links.as_ref(), root.id)?;

        let service = NamespaceService::new(
            links,
            files,
            config.storage.blobs_path(),
            root.id,
            trash.id,
        )?;
        let report = service.reconcile()?;
        info!(
            dangling = report.dangling_links_removed,
            orphans = report.orphan_files_attached,
            "start-up reconciliation complete"
        );

        Ok(Self { service })
    }

    /// Access the underlying namespace service.
    pub fn service(&self) -> &NamespaceService {
        &self.service
    }

    /// Execute a parsed command, returning the text to print.
    pub fn execute(&self, command: &Commands) -> Result<String, NamespaceError> {
        match command {
            Commands::Ls { path } => {
                let folder = self.resolve_path(path.as_deref().unwrap_or("/"))?;
                let mut children = self.service.children(folder.id)?;
                children.sort_by(|a, b| a.display_name.cmp(&b.display_name));

                let mut out = String::new();
                for child in &children {
                    let _ = writeln!(out, "{:6}  {}  {}", child.kind.to_string(), child.id, child.display_name);
                }
                if children.is_empty() {
                    out.push_str("(empty)\n");
                }
                Ok(out.trim_end().to_string())
            }
            Commands::Mkdir { path } => {
                let (parent, name) = self.resolve_parent(path)?;
                let folder = self.service.create_folder(parent.id, name)?;
                Ok(format!("created folder {} ({})", path, folder.id))
            }
            Commands::Touch { path } => {
                let (parent, name) = self.resolve_parent(path)?;
                let extension = name
                    .rsplit_once('.')
                    .map(|(_, ext)| ext.to_string())
                    .unwrap_or_default();
                let link = self.service.create_managed_file(parent.id, name, extension)?;
                Ok(format!("created file {} ({})", path, link.id))
            }
            Commands::Import { source, dest } => {
                let folder = self.resolve_path(dest)?;
                if source.is_dir() {
                    let report = self.service.import_directory_recursive(folder.id, source)?;
                    let mut out = format!(
                        "imported {} files in {} folders",
                        report.files_imported, report.folders_created
                    );
                    for (path, reason) in &report.failures {
                        let _ = write!(out, "\nskipped {}: {}", path.display(), reason);
                    }
                    Ok(out)
                } else {
                    let link = self.service.import_existing_file(folder.id, source)?;
                    Ok(format!("imported {} ({})", source.display(), link.id))
                }
            }
            Commands::Mv { path, dest } => {
                let link = self.resolve_path(path)?;
                let folder = self.resolve_path(dest)?;
                self.service.move_link(link.id, folder.id)?;
                Ok(format!("moved {} -> {}", path, dest))
            }
            Commands::Trash { path } => {
                let link = self.resolve_path(path)?;
                self.service.move_to_trash(link.id)?;
                Ok(format!("trashed {}", path))
            }
            Commands::Rm { path } => {
                let link = self.resolve_path(path)?;
                self.service.delete_file_permanently(link.id)?;
                Ok(format!("permanently deleted {}", path))
            }
            Commands::Rename { path, new_name } => {
                let link = self.resolve_path(path)?;
                self.service.rename_link(link.id, new_name.clone())?;
                Ok(format!("renamed {} -> {}", path, new_name))
            }
            Commands::Export { path, dest_dir } => {
                let link = self.resolve_path(path)?;
                let dest = self.service.export_file(link.id, dest_dir)?;
                Ok(format!("exported to {}", dest.display()))
            }
            Commands::Path { id } => {
                let link_id: LinkId = id.parse().map_err(|_| {
                    NamespaceError::InvalidTarget(format!("not a valid link id: {id}"))
                })?;
                self.service.resolve_logical_path(link_id)
            }
            Commands::Reconcile => {
                let report = self.service.reconcile()?;
                Ok(format!(
                    "removed {} dangling links, attached {} orphan files",
                    report.dangling_links_removed, report.orphan_files_attached
                ))
            }
        }
    }

    /// Walk a `/`-separated logical path down from the root by display name.
    fn resolve_path(&self, path: &str) -> Result<Link, NamespaceError> {
        let mut current = self.service.find_link(self.service.root_id())?;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let children = self.service.children(current.id)?;
            current = children
                .into_iter()
                .find(|c| c.display_name == segment)
                .ok_or_else(|| {
                    NamespaceError::InvalidTarget(format!("no such path: {path}"))
                })?;
        }
        Ok(current)
    }

    /// Split a path into its parent folder link and final segment name.
    fn resolve_parent(&self, path: &str) -> Result<(Link, String), NamespaceError> {
        let trimmed = path.trim_end_matches('/');
        let (parent_path, name) = match trimmed.rsplit_once('/') {
            Some((parent, name)) => (parent, name),
            None => ("", trimmed),
        };
        if name.is_empty() {
            return Err(NamespaceError::InvalidTarget(format!(
                "path has no final segment: {path}"
            )));
        }
        let parent = self.resolve_path(parent_path)?;
        if !parent.kind.is_container() {
            return Err(NamespaceError::WrongKind {
                expected: "container",
                actual: parent.kind,
            });
        }
        Ok((parent, name.to_string()))
    }
}
