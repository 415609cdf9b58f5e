//! Conversion between flat item lists and two-level group trees.
//!
//! A tree is a list of groups, each carrying its child items in `children`.
//! Groups are exactly one level deep. Sibling order is ascending `weight`,
//! ties keep input order.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::item::Item;

/// What happens to children whose `pid` matches no group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Discard them
    #[default]
    Drop,
    /// Keep them at top level after the groups, `pid` untouched
    Append,
    /// Fail the build
    Reject,
}

impl std::str::FromStr for OrphanPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "append" => Ok(Self::Append),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown orphan policy '{other}' (expected drop, append or reject)"
            )),
        }
    }
}

/// Builds group trees from flat item lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemTreeBuilder {
    orphans: OrphanPolicy,
}

impl ItemTreeBuilder {
    pub fn new(orphans: OrphanPolicy) -> Self {
        Self { orphans }
    }

    /// Build a two-level tree from a flat list.
    ///
    /// Without any group in the list the result is the valid items sorted
    /// by weight. Otherwise every child is moved under the group named by its
    /// `pid` (which is cleared), and children without a group are handled
    /// according to the orphan policy.
    #[instrument(level = "debug", skip_all, fields(items = items.len(), orphans = ?self.orphans))]
    pub fn build(&self, items: &[Item]) -> DomainResult<Vec<Item>> {
        let valid: Vec<&Item> = items.iter().filter(|i| i.is_valid()).collect();
        let mut groups = get_groups(items);

        if groups.is_empty() {
            let mut flat: Vec<Item> = valid.into_iter().cloned().collect();
            sort_by_weight(&mut flat);
            return Ok(flat);
        }

        let mut orphans = Vec::new();
        for child in valid.into_iter().filter(|i| !i.is_group()) {
            match get_item_index_by_id(&groups, child.pid) {
                Some(idx) => {
                    let mut child = child.clone();
                    child.pid = None;
                    groups[idx].children.push(child);
                }
                None => match self.orphans {
                    OrphanPolicy::Drop => {
                        debug!("dropping orphan {} (pid {:?})", child.id, child.pid);
                    }
                    OrphanPolicy::Append => orphans.push(child.clone()),
                    OrphanPolicy::Reject => {
                        return Err(DomainError::OrphanedChild {
                            id: child.id,
                            pid: child.pid,
                        });
                    }
                },
            }
        }

        for group in groups.iter_mut() {
            sort_by_weight(&mut group.children);
        }

        sort_by_weight(&mut orphans);
        groups.extend(orphans);
        Ok(groups)
    }
}

/// Groups of a list, sorted by weight. Invalid items are ignored.
pub fn get_groups(items: &[Item]) -> Vec<Item> {
    let mut groups: Vec<Item> = items
        .iter()
        .filter(|i| i.is_valid() && i.is_group())
        .cloned()
        .collect();
    sort_by_weight(&mut groups);
    groups
}

/// First item with the given id.
pub fn get_item_by_id(items: &[Item], id: Option<i64>) -> Option<&Item> {
    get_item_index_by_id(items, id).map(|idx| &items[idx])
}

/// Position of the first item with the given id.
pub fn get_item_index_by_id(items: &[Item], id: Option<i64>) -> Option<usize> {
    let id = id?;
    items.iter().position(|item| item.id == id)
}

/// Non-group items belonging to `group_id`, sorted by weight.
pub fn get_children(items: &[Item], group_id: i64) -> Vec<Item> {
    let mut children: Vec<Item> = items
        .iter()
        .filter(|i| i.is_valid() && !i.is_group() && i.pid == Some(group_id))
        .cloned()
        .collect();
    sort_by_weight(&mut children);
    children
}

/// Build a tree, dropping orphaned children.
pub fn build_tree(items: &[Item]) -> Vec<Item> {
    // the drop policy cannot fail
    ItemTreeBuilder::new(OrphanPolicy::Drop)
        .build(items)
        .unwrap_or_default()
}

/// Flatten a tree back into a list.
///
/// Every emitted item gets `pid` set to its parent in the tree (`pid` for
/// top-level nodes) and loses its `children`. Children follow their parent,
/// sorted by weight; top-level order is kept as given.
pub fn build_flat_list(tree: &[Item], pid: Option<i64>) -> Vec<Item> {
    let mut flat = Vec::with_capacity(tree.len());
    for node in tree.iter().filter(|n| n.is_valid()) {
        let mut node = node.clone();
        let mut children = std::mem::take(&mut node.children);
        node.pid = pid;
        let id = node.id;
        flat.push(node);

        if !children.is_empty() {
            sort_by_weight(&mut children);
            flat.extend(build_flat_list(&children, Some(id)));
        }
    }
    flat
}

/// Stable sort by ascending weight.
fn sort_by_weight(items: &mut [Item]) {
    items.sort_by_key(|i| i.weight);
}
