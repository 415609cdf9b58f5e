//! Text rendering of item trees

use termtree::Tree;

use crate::domain::item::Item;

/// Label of the synthetic root holding all top-level items.
pub const ROOT_LABEL: &str = "items";

pub trait ItemTreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl ItemTreeDisplay for Item {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(label(self)).with_leaves(leaves)
    }
}

impl ItemTreeDisplay for [Item] {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.iter().map(|i| i.to_tree_string()).collect();
        Tree::new(ROOT_LABEL.to_string()).with_leaves(leaves)
    }
}

/// Render a built tree, one line per item.
pub fn render(tree: &[Item]) -> Tree<String> {
    tree.to_tree_string()
}

fn label(item: &Item) -> String {
    format!("{} [{}] w={}", item.id, item.item_type, item.weight)
}
