//! Arena-backed snapshots of one display root and its subtree
//!
//! Built from a `TreeStore` for rendering and statistics; never the source
//! of truth. Arena slots are reused after removal, so snapshots are rebuilt
//! per command instead of kept alive across mutations.

use std::collections::HashSet;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::ident::ItemId;
use crate::domain::item::Item;
use crate::domain::store::TreeStore;

/// Tree node in the arena-based snapshot.
#[derive(Debug)]
pub struct TreeNode {
    /// Owned clone of the stored record
    pub item: Item,
    /// Index of the parent node, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes
    pub children: Vec<Index>,
}

/// Arena-based snapshot of a single root and its subtree.
///
/// Uses a generational arena for memory-safe node references and O(1)
/// lookups.
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty snapshots
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn insert_node(&mut self, item: Item, parent: Option<Index>) -> Index {
        let node = TreeNode {
            item,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    /// Pre-order iteration, left to right.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Longest root-to-leaf path in node count; 0 for an empty snapshot.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Index, usize)> = self.root.into_iter().map(|idx| (idx, 1)).collect();

        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.arena.get(idx) {
                for &child in &node.children {
                    stack.push((child, depth + 1));
                }
            }
        }
        max_depth
    }

    /// Records of all leaf nodes (nodes with no children).
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_items(&self) -> Vec<&Item> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| &node.item)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

/// Build one snapshot per display root, in insertion order.
///
/// Display roots are records without a parent plus records whose parent id
/// resolves to no stored record, so every record lands in exactly one
/// snapshot.
#[instrument(level = "debug", skip(store), fields(records = store.len()))]
pub fn build_forest(store: &TreeStore) -> Vec<TreeArena> {
    store
        .records()
        .filter(|record| match &record.parent_id {
            None => true,
            Some(parent_id) => !store.contains(parent_id),
        })
        .map(|root| build_tree(store, root))
        .collect()
}

/// Stack-driven construction of one root's snapshot.
fn build_tree(store: &TreeStore, root: &Item) -> TreeArena {
    let mut tree = TreeArena::new();
    let mut visited: HashSet<ItemId> = HashSet::new();
    let mut stack: Vec<(ItemId, Option<Index>)> = vec![(root.id.clone(), None)];

    while let Some((current_id, parent_idx)) = stack.pop() {
        // a repeated id here would mean a corrupted children index
        if !visited.insert(current_id.clone()) {
            continue;
        }
        if let Some(record) = store.get_item(&current_id) {
            let current_idx = tree.insert_node(record, parent_idx);
            if let Some(child_ids) = store.child_ids(&current_id) {
                for child_id in child_ids {
                    stack.push((child_id.clone(), Some(current_idx)));
                }
            }
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest_store() -> TreeStore {
        TreeStore::new(vec![
            Item::new(1, None, "root a"),
            Item::new(2, Some(ItemId::Int(1)), "mid"),
            Item::new(3, Some(ItemId::Int(2)), "leaf"),
            Item::new(4, Some(ItemId::Int(1)), "leaf"),
            Item::new("b", None, "root b"),
            Item::new(9, Some(ItemId::Int(404)), "orphan"),
        ])
        .unwrap()
    }

    #[test]
    fn given_store_with_roots_and_orphan_when_building_forest_then_one_snapshot_each() {
        let forest = build_forest(&forest_store());

        assert_eq!(forest.len(), 3);
        let sizes: Vec<usize> = forest.iter().map(|tree| tree.len()).collect();
        assert_eq!(sizes, vec![4, 1, 1]);
    }

    #[test]
    fn given_three_level_snapshot_when_measuring_then_depth_and_leaves_match() {
        let forest = build_forest(&forest_store());
        let first = &forest[0];

        assert_eq!(first.depth(), 3);
        let mut leaf_ids: Vec<ItemId> = first
            .leaf_items()
            .iter()
            .map(|item| item.id.clone())
            .collect();
        leaf_ids.sort();
        assert_eq!(leaf_ids, vec![ItemId::Int(3), ItemId::Int(4)]);
    }

    #[test]
    fn given_empty_snapshot_when_measuring_then_zero_depth_and_no_leaves() {
        let tree = TreeArena::new();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert!(tree.leaf_items().is_empty());
    }

    #[test]
    fn given_snapshot_when_iterating_then_preorder_starts_at_root() {
        let forest = build_forest(&forest_store());
        let first = &forest[0];

        let ids: Vec<ItemId> = first.iter().map(|(_, node)| node.item.id.clone()).collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(ids[0], ItemId::Int(1));
    }
}
