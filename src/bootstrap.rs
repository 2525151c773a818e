//! Bootstrap
//!
//! Guarantees the Root and Trash singletons exist before the namespace
//! service is constructed. Both routines are safe to call on every start-up:
//! an existing singleton is returned as-is, never duplicated.

use crate::entity::{Link, LinkKind};
use crate::error::StorageError;
use crate::store::LinkStore;
use crate::types::LinkId;
use tracing::info;

/// Name given to the Root link when it is first created.
pub const ROOT_NAME: &str = "ROOT";

/// Name given to the Trash link when it is first created.
pub const TRASH_NAME: &str = "Trash";

/// Return the Root link, creating it if the store holds none.
pub fn ensure_root(links: &dyn LinkStore) -> Result<Link, StorageError> {
    if let Some(existing) = links
        .find_all()?
        .into_iter()
        .find(|l| l.kind == LinkKind::Root)
    {
        return Ok(existing);
    }

    let root = Link::root(ROOT_NAME);
    links.save(&root)?;
    info!(root_id = %root.id, "created namespace root");
    Ok(root)
}

/// Return the Trash link, creating it under the given root if absent.
pub fn ensure_trash(links: &dyn LinkStore, root_id: LinkId) -> Result<Link, StorageError> {
    if let Some(existing) = links
        .find_all()?
        .into_iter()
        .find(|l| l.kind == LinkKind::Trash)
    {
        return Ok(existing);
    }

    let trash = Link::trash(TRASH_NAME, root_id);
    links.save(&trash)?;
    info!(trash_id = %trash.id, "created namespace trash");
    Ok(trash)
}
