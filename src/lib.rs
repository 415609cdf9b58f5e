//! itemtree: configuration container item lists
//!
//! Converts between flat, weight-ordered item lists (as stored) and
//! two-level group trees (as edited).
//!
//! Architecture:
//! - `domain`: items and the tree conversions (pure, no I/O)
//! - `application`: services orchestrating domain logic over files
//! - `infrastructure`: I/O boundary and dependency wiring
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{build_flat_list, build_tree, get_groups, get_item_by_id, get_item_index_by_id, Item};
