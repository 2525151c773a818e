//! Shared test utilities for integration tests
//!
//! Builds a fully bootstrapped namespace inside a temp directory: JSON
//! stores, root/trash singletons, blob directory, and the wired service.

use novafs::bootstrap::{ensure_root, ensure_trash};
use novafs::service::NamespaceService;
use novafs::store::{FileRecordStore, JsonFileRecordStore, JsonLinkStore, LinkStore};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// One isolated namespace: temp dir, stores, and service.
pub struct TestNamespace {
    // Held so the directory outlives the service.
    #[allow(dead_code)]
    pub dir: TempDir,
    pub links: Arc<JsonLinkStore>,
    pub files: Arc<JsonFileRecordStore>,
    pub service: NamespaceService,
}

impl TestNamespace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let links = Arc::new(JsonLinkStore::open(dir.path().join("links.json")).unwrap());
        let files = Arc::new(JsonFileRecordStore::open(dir.path().join("files.json")).unwrap());

        let root = ensure_root(links.as_ref()).unwrap();
        let trash = ensure_trash(links.as_ref(), root.id).unwrap();

        let service = NamespaceService::new(
            Arc::clone(&links) as Arc<dyn LinkStore>,
            Arc::clone(&files) as Arc<dyn FileRecordStore>,
            dir.path().join("blobs"),
            root.id,
            trash.id,
        )
        .unwrap();

        TestNamespace {
            dir,
            links,
            files,
            service,
        }
    }

    /// Write a throwaway source file outside the namespace, for imports.
    pub fn external_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Sorted link-store snapshot for no-side-effect assertions.
    pub fn links_snapshot(&self) -> Vec<String> {
        let mut snapshot: Vec<String> = self
            .links
            .find_all()
            .unwrap()
            .into_iter()
            .map(|l| format!("{}:{:?}:{}", l.id, l.parent_id, l.display_name))
            .collect();
        snapshot.sort();
        snapshot
    }
}
