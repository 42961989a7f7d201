//! Terminal rendering of hierarchy snapshots

use generational_arena::Index;
use itertools::Itertools;
use termtree::Tree;

use crate::domain::{build_forest, Item, TreeArena, TreeStore};

/// Conversion into a printable termtree structure.
pub trait ToTermTree {
    /// Render the snapshot; with `sort_siblings`, children are ordered by
    /// label, then id (sibling order in the store itself is unspecified).
    fn to_termtree(&self, sort_siblings: bool) -> Tree<String>;
}

impl ToTermTree for TreeArena {
    fn to_termtree(&self, sort_siblings: bool) -> Tree<String> {
        match self.root() {
            Some(root_idx) => subtree(self, root_idx, sort_siblings),
            None => Tree::new("(empty)".to_string()),
        }
    }
}

fn subtree(arena: &TreeArena, idx: Index, sort_siblings: bool) -> Tree<String> {
    let node = match arena.get_node(idx) {
        Some(node) => node,
        None => return Tree::new(String::new()),
    };

    let child_indexes: Vec<Index> = if sort_siblings {
        node.children
            .iter()
            .copied()
            .sorted_by_key(|&child_idx| {
                arena
                    .get_node(child_idx)
                    .map(|child| (child.item.label.clone(), child.item.id.clone()))
            })
            .collect()
    } else {
        node.children.clone()
    };

    let leaves: Vec<Tree<String>> = child_indexes
        .into_iter()
        .map(|child_idx| subtree(arena, child_idx, sort_siblings))
        .collect();

    Tree::new(node_label(&node.item)).with_leaves(leaves)
}

/// Render every display root's subtree, roots in insertion order.
pub fn forest(store: &TreeStore, sort_siblings: bool) -> Vec<Tree<String>> {
    build_forest(store)
        .iter()
        .map(|arena| arena.to_termtree(sort_siblings))
        .collect()
}

/// Tree node display form: `label [id]`.
pub fn node_label(item: &Item) -> String {
    format!("{} [{}]", item.label, item.id)
}

/// One-line display form for a record: id, label, parent.
pub fn item_line(item: &Item) -> String {
    match &item.parent_id {
        Some(parent) => format!("{}  {}  (parent {})", item.id, item.label, parent),
        None => format!("{}  {}  (root)", item.id, item.label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemId;

    fn sample_store() -> TreeStore {
        TreeStore::new(vec![
            Item::new(1, None, "alpha"),
            Item::new("2", Some(ItemId::Int(1)), "charlie"),
            Item::new(3, Some(ItemId::Int(1)), "bravo"),
            Item::new(4, Some(ItemId::Text("2".to_string())), "delta"),
        ])
        .unwrap()
    }

    #[test]
    fn given_sorted_rendering_when_displayed_then_siblings_in_label_order() {
        let trees = forest(&sample_store(), true);
        assert_eq!(trees.len(), 1);

        let rendered = trees[0].to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "alpha [1]");
        assert!(lines[1].contains("bravo [3]"));
        assert!(lines[2].contains("charlie [\"2\"]"));
        assert!(lines[3].contains("delta [4]"));
    }

    #[test]
    fn given_text_and_int_ids_when_labelling_then_forms_distinguishable() {
        let int_item = Item::new(2, None, "x");
        let text_item = Item::new("2", None, "x");
        assert_ne!(node_label(&int_item), node_label(&text_item));
    }

    #[test]
    fn given_root_and_child_when_line_rendering_then_parent_shown() {
        let root = Item::new(1, None, "alpha");
        let child = Item::new(3, Some(ItemId::Int(1)), "bravo");

        assert_eq!(item_line(&root), "1  alpha  (root)");
        assert_eq!(item_line(&child), "3  bravo  (parent 1)");
    }
}
