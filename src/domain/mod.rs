//! Domain layer: items and tree conversion
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod item;
pub mod render;
pub mod report;
pub mod tree;

pub use error::{DomainError, DomainResult};
pub use item::{parse_items, Item, ItemParseError, ITEM_GROUP};
pub use render::{render, ItemTreeDisplay};
pub use report::{audit, TreeReport};
pub use tree::{
    build_flat_list, build_tree, get_children, get_groups, get_item_by_id, get_item_index_by_id,
    ItemTreeBuilder, OrphanPolicy,
};
