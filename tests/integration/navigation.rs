//! Tree navigation and logical path resolution.

use crate::integration::test_utils::TestNamespace;
use novafs::entity::Link;
use novafs::error::NamespaceError;
use novafs::store::LinkStore;
use novafs::types::LinkId;

#[test]
fn children_lists_only_direct_children() {
    let ns = TestNamespace::new();
    let root = ns.service.root_id();

    let a = ns.service.create_folder(root, "a").unwrap();
    ns.service.create_folder(root, "b").unwrap();
    ns.service.create_folder(a.id, "nested").unwrap();

    let mut names: Vec<String> = ns
        .service
        .children(root)
        .unwrap()
        .into_iter()
        .map(|l| l.display_name)
        .collect();
    names.sort();
    // Trash is a direct child of root
    assert_eq!(names, vec!["Trash", "a", "b"]);

    let nested: Vec<String> = ns
        .service
        .children(a.id)
        .unwrap()
        .into_iter()
        .map(|l| l.display_name)
        .collect();
    assert_eq!(nested, vec!["nested"]);
}

#[test]
fn resolve_path_excludes_root_name() {
    let ns = TestNamespace::new();
    let root = ns.service.root_id();

    let a = ns.service.create_folder(root, "A").unwrap();
    let doc = ns
        .service
        .create_managed_file(a.id, "doc.txt", "txt")
        .unwrap();

    assert_eq!(ns.service.resolve_logical_path(doc.id).unwrap(), "/A/doc.txt");
    assert_eq!(ns.service.resolve_logical_path(a.id).unwrap(), "/A");
}

#[test]
fn resolve_path_unknown_id_is_not_found() {
    let ns = TestNamespace::new();
    let missing = LinkId::generate();
    match ns.service.resolve_logical_path(missing) {
        Err(NamespaceError::LinkNotFound(id)) => assert_eq!(id, missing),
        other => panic!("expected LinkNotFound, got {other:?}"),
    }
}

#[test]
fn resolve_path_dangling_ancestor_is_broken_chain() {
    let ns = TestNamespace::new();

    // Forge a link whose parent never existed, bypassing the service.
    let ghost_parent = LinkId::generate();
    let stray = Link::folder("stray", ghost_parent);
    ns.links.save(&stray).unwrap();

    match ns.service.resolve_logical_path(stray.id) {
        Err(NamespaceError::BrokenChain { missing, .. }) => assert_eq!(missing, ghost_parent),
        other => panic!("expected BrokenChain, got {other:?}"),
    }
}

#[test]
fn resolve_path_parent_cycle_is_broken_chain() {
    let ns = TestNamespace::new();
    let root = ns.service.root_id();

    let a = ns.service.create_folder(root, "a").unwrap();
    let b = ns.service.create_folder(a.id, "b").unwrap();

    // Corrupt the store directly: a's parent becomes its own child.
    let mut corrupted = a.clone();
    corrupted.parent_id = Some(b.id);
    ns.links.save(&corrupted).unwrap();

    assert!(matches!(
        ns.service.resolve_logical_path(b.id),
        Err(NamespaceError::BrokenChain { .. })
    ));
}

#[test]
fn file_for_link_resolves_record() {
    let ns = TestNamespace::new();
    let root = ns.service.root_id();

    let link = ns
        .service
        .create_managed_file(root, "notes.md", "md")
        .unwrap();
    let link = ns.service.find_link(link.id).unwrap();

    let record = ns.service.file_for_link(&link).unwrap().unwrap();
    assert_eq!(record.display_name, "notes.md");
    assert_eq!(record.extension, "md");
    assert!(record.physical_path.exists());

    // Non-file links resolve to None
    let folder = ns.service.create_folder(root, "f").unwrap();
    assert!(ns.service.file_for_link(&folder).unwrap().is_none());
}
