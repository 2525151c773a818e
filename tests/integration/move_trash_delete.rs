//! The move / trash / permanent-delete state machine.

use crate::integration::test_utils::TestNamespace;
use novafs::error::NamespaceError;
use novafs::types::LinkId;
use std::fs;

#[test]
fn move_folder_between_folders() {
    let ns = TestNamespace::new();
    let root = ns.service.root_id();

    let a = ns.service.create_folder(root, "a").unwrap();
    let b = ns.service.create_folder(root, "b").unwrap();
    let inner = ns.service.create_folder(a.id, "inner").unwrap();

    ns.service.move_link(inner.id, b.id).unwrap();
    assert_eq!(
        ns.service.resolve_logical_path(inner.id).unwrap(),
        "/b/inner"
    );
    assert!(ns.service.children(a.id).unwrap().is_empty());
}

#[test]
fn move_into_own_descendant_is_rejected_and_tree_unchanged() {
    let ns = TestNamespace::new();
    let root = ns.service.root_id();

    let a = ns.service.create_folder(root, "a").unwrap();
    let b = ns.service.create_folder(a.id, "b").unwrap();
    let c = ns.service.create_folder(b.id, "c").unwrap();

    for dest in [a.id, b.id, c.id] {
        let result = ns.service.move_link(a.id, dest);
        assert!(
            matches!(result, Err(NamespaceError::InvalidTarget(_))),
            "moving a into {dest} should be rejected"
        );
    }

    // Tree unchanged
    assert_eq!(ns.service.resolve_logical_path(c.id).unwrap(), "/a/b/c");
    assert_eq!(
        ns.service.find_link(a.id).unwrap().parent_id,
        Some(root)
    );
}

#[test]
fn move_root_or_trash_is_rejected() {
    let ns = TestNamespace::new();
    let root = ns.service.root_id();
    let trash = ns.service.trash_id();
    let folder = ns.service.create_folder(root, "f").unwrap();

    assert!(matches!(
        ns.service.move_link(root, folder.id),
        Err(NamespaceError::WrongKind { .. })
    ));
    assert!(matches!(
        ns.service.move_link(trash, folder.id),
        Err(NamespaceError::WrongKind { .. })
    ));
}

#[test]
fn move_to_missing_destination_is_invalid_target() {
    let ns = TestNamespace::new();
    let root = ns.service.root_id();
    let folder = ns.service.create_folder(root, "f").unwrap();

    assert!(matches!(
        ns.service.move_link(folder.id, LinkId::generate()),
        Err(NamespaceError::InvalidTarget(_))
    ));
}

#[test]
fn move_under_file_link_is_rejected() {
    let ns = TestNamespace::new();
    let root = ns.service.root_id();
    let folder = ns.service.create_folder(root, "f").unwrap();
    let file = ns.service.create_managed_file(root, "x.txt", "txt").unwrap();

    assert!(matches!(
        ns.service.move_link(folder.id, file.id),
        Err(NamespaceError::WrongKind { .. })
    ));
}

#[test]
fn trash_round_trip_preserves_record_bytes_and_name() {
    let ns = TestNamespace::new();
    let root = ns.service.root_id();
    let source = ns.external_file("keep.txt", "keep these bytes");
    let link = ns.service.import_existing_file(root, &source).unwrap();
    let record_before = ns.service.file_for_link(&link).unwrap().unwrap();

    ns.service.move_to_trash(link.id).unwrap();
    let trashed = ns.service.find_link(link.id).unwrap();
    assert_eq!(trashed.parent_id, Some(ns.service.trash_id()));

    let folder = ns.service.create_folder(root, "restored").unwrap();
    ns.service.move_link(link.id, folder.id).unwrap();

    let after = ns.service.find_link(link.id).unwrap();
    let record_after = ns.service.file_for_link(&after).unwrap().unwrap();
    assert_eq!(after.display_name, "keep.txt");
    assert_eq!(record_after.id, record_before.id);
    assert_eq!(record_after.physical_path, record_before.physical_path);
    assert_eq!(
        fs::read_to_string(&record_after.physical_path).unwrap(),
        "keep these bytes"
    );
}

#[test]
fn move_to_trash_rejects_non_file_links() {
    let ns = TestNamespace::new();
    let root = ns.service.root_id();
    let folder = ns.service.create_folder(root, "f").unwrap();

    assert!(matches!(
        ns.service.move_to_trash(folder.id),
        Err(NamespaceError::WrongKind { .. })
    ));
}

#[test]
fn permanent_delete_removes_link_record_and_bytes() {
    let ns = TestNamespace::new();
    let root = ns.service.root_id();
    let source = ns.external_file("gone.txt", "bytes");
    let link = ns.service.import_existing_file(root, &source).unwrap();
    let record = ns.service.file_for_link(&link).unwrap().unwrap();

    ns.service.delete_file_permanently(link.id).unwrap();

    assert!(!record.physical_path.exists());
    assert!(matches!(
        ns.service.find_link(link.id),
        Err(NamespaceError::LinkNotFound(_))
    ));
    assert_eq!(ns.service.children(root).unwrap().len(), 1); // only Trash
}

#[test]
fn permanent_delete_twice_is_not_found_with_no_side_effect() {
    let ns = TestNamespace::new();
    let root = ns.service.root_id();
    let link = ns.service.create_managed_file(root, "x.txt", "txt").unwrap();

    ns.service.delete_file_permanently(link.id).unwrap();
    let links_after = ns.links_snapshot();

    assert!(matches!(
        ns.service.delete_file_permanently(link.id),
        Err(NamespaceError::LinkNotFound(_))
    ));
    assert_eq!(ns.links_snapshot(), links_after);
}

#[test]
fn permanent_delete_survives_missing_blob() {
    let ns = TestNamespace::new();
    let root = ns.service.root_id();
    let link = ns.service.create_managed_file(root, "x.txt", "txt").unwrap();
    let record = ns.service.file_for_link(&link).unwrap().unwrap();

    // Bytes vanish out-of-band; deletion still removes the logical records.
    fs::remove_file(&record.physical_path).unwrap();
    ns.service.delete_file_permanently(link.id).unwrap();

    assert!(matches!(
        ns.service.find_link(link.id),
        Err(NamespaceError::LinkNotFound(_))
    ));
}

#[test]
fn delete_rejects_folder_links() {
    let ns = TestNamespace::new();
    let root = ns.service.root_id();
    let folder = ns.service.create_folder(root, "f").unwrap();

    assert!(matches!(
        ns.service.delete_file_permanently(folder.id),
        Err(NamespaceError::WrongKind { .. })
    ));
    // Rejected before any write
    assert!(ns.service.find_link(folder.id).is_ok());
}

