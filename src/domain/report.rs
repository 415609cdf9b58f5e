//! Consistency report for flat item lists

use std::collections::HashSet;
use std::fmt;

use itertools::Itertools;

use crate::domain::item::Item;
use crate::domain::tree::get_item_by_id;

/// Problems found in a flat list. Nothing is changed, only reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeReport {
    /// Ids of items without an `item_type`
    pub invalid: Vec<i64>,
    /// Ids of children whose `pid` names no group
    pub orphans: Vec<i64>,
    /// Ids used by more than one item
    pub duplicate_ids: Vec<i64>,
    /// Ids of groups whose `pid` names another group
    pub nested_groups: Vec<i64>,
}

impl TreeReport {
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty()
            && self.orphans.is_empty()
            && self.duplicate_ids.is_empty()
            && self.nested_groups.is_empty()
    }
}

impl fmt::Display for TreeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "no problems found");
        }
        let sections = [
            ("invalid items", &self.invalid),
            ("orphaned children", &self.orphans),
            ("duplicate ids", &self.duplicate_ids),
            ("nested groups", &self.nested_groups),
        ];
        let lines = sections
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(label, ids)| format!("{}: {}", label, ids.iter().join(", ")));
        write!(f, "{}", lines.format("\n"))
    }
}

/// Inspect a flat list for data the tree conversion would lose or misplace.
pub fn audit(items: &[Item]) -> TreeReport {
    let invalid = items
        .iter()
        .filter(|i| !i.is_valid())
        .map(|i| i.id)
        .collect();

    let valid: Vec<Item> = items.iter().filter(|i| i.is_valid()).cloned().collect();
    let groups: Vec<Item> = valid.iter().filter(|i| i.is_group()).cloned().collect();

    // a list without groups is rendered flat, nothing is orphaned
    let orphans = if groups.is_empty() {
        Vec::new()
    } else {
        valid
            .iter()
            .filter(|i| !i.is_group() && get_item_by_id(&groups, i.pid).is_none())
            .map(|i| i.id)
            .collect()
    };

    let mut seen = HashSet::new();
    let duplicate_ids = valid
        .iter()
        .filter(|i| !seen.insert(i.id))
        .map(|i| i.id)
        .unique()
        .collect();

    let nested_groups = groups
        .iter()
        .filter(|g| get_item_by_id(&groups, g.pid).is_some())
        .map(|g| g.id)
        .collect();

    TreeReport {
        invalid,
        orphans,
        duplicate_ids,
        nested_groups,
    }
}
