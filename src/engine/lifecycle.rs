//! Named output containers, rebuilt from scratch on every run.

use crate::document::{CompositeGroup, Document};
use crate::foundation::error::KaleidoResult;

/// Remove every group named `name`; returns how many were removed.
pub fn remove_group(doc: &mut Document, name: &str) -> usize {
    let removed = doc.remove_groups(name);
    if removed > 0 {
        tracing::debug!(group = name, removed, "removed stale group");
    }
    removed
}

/// Replace the group named `name` with the one `build` produces.
///
/// Any existing group with that exact name is removed first. When `build` returns `None` no
/// group is inserted; otherwise the new group goes directly above `anchor`. Returns the
/// number of layers in the new group.
pub fn replace_group<F>(
    doc: &mut Document,
    name: &str,
    anchor: &str,
    build: F,
) -> KaleidoResult<Option<usize>>
where
    F: FnOnce(&mut Document) -> KaleidoResult<Option<CompositeGroup>>,
{
    remove_group(doc, name);
    let Some(mut group) = build(doc)? else {
        return Ok(None);
    };
    group.name = name.to_string();
    let len = group.len();
    doc.insert_group_above(anchor, group);
    Ok(Some(len))
}

#[cfg(test)]
#[path = "../../tests/unit/engine/lifecycle.rs"]
mod tests;
