//! The in-memory hierarchical record store
//!
//! `TreeStore` indexes a flat list of parent-referencing records into two
//! structures kept consistent under mutation: an item index (id to record,
//! insertion-ordered) and a children index (parent id to set of child ids).
//! Construction and every parent-changing mutation keep the parent graph
//! acyclic. All traversals are stack-driven loops; record lists this deep
//! come from callers and must not bound the call stack.

use std::collections::{HashMap, HashSet};

use tracing::instrument;

use crate::domain::error::{StoreError, StoreResult};
use crate::domain::ident::ItemId;
use crate::domain::item::Item;

/// In-memory hierarchy over parent-referencing records.
///
/// Getters hand out owned clones; mutating a returned record never touches
/// store state. `get_all` preserves insertion order, sibling order within one
/// parent is unspecified.
#[derive(Debug, Clone, Default)]
pub struct TreeStore {
    /// id -> record
    items: HashMap<ItemId, Item>,
    /// Insertion order of live record ids
    order: Vec<ItemId>,
    /// parent id -> ids of direct children; entries exist only while non-empty.
    /// May be keyed by an id that is not itself a stored record.
    children: HashMap<ItemId, HashSet<ItemId>>,
}

impl TreeStore {
    /// Build a store from a record list.
    ///
    /// Rejects duplicate ids, then parent-link cycles. Parent references that
    /// resolve to no record in the list are accepted; such records act as
    /// roots of their own subtrees. An empty list yields an empty store.
    pub fn new(records: Vec<Item>) -> StoreResult<Self> {
        Self::validate_unique_ids(&records)?;
        Self::validate_no_cycles(&records)?;

        let mut store = Self::default();
        for record in records {
            store.insert_unchecked(record);
        }
        Ok(store)
    }

    fn validate_unique_ids(records: &[Item]) -> StoreResult<()> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in records {
            if !seen.insert(&record.id) {
                return Err(StoreError::DuplicateId(record.id.clone()));
            }
        }
        Ok(())
    }

    /// Walk every record's parent chain through a transient id-to-parent map.
    /// A repeated id before the chain terminates is a cycle; ids absent from
    /// the record list terminate the chain.
    fn validate_no_cycles(records: &[Item]) -> StoreResult<()> {
        let parent_of: HashMap<&ItemId, Option<&ItemId>> = records
            .iter()
            .map(|record| (&record.id, record.parent_id.as_ref()))
            .collect();

        for record in records {
            let mut visited = HashSet::new();
            let mut current = Some(&record.id);
            while let Some(id) = current {
                if !visited.insert(id) {
                    return Err(StoreError::CycleDetected(record.id.clone()));
                }
                current = parent_of.get(id).copied().flatten();
            }
        }
        Ok(())
    }

    /// Insert a record into both indexes without validation.
    fn insert_unchecked(&mut self, record: Item) {
        if let Some(parent_id) = record.parent_id.clone() {
            self.children
                .entry(parent_id)
                .or_default()
                .insert(record.id.clone());
        }
        self.order.push(record.id.clone());
        self.items.insert(record.id.clone(), record);
    }

    /// Drop `child` from `parent`'s children set, removing the whole entry
    /// when the set empties. The children index never holds empty sets.
    fn unlink_child(&mut self, parent: &ItemId, child: &ItemId) {
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.remove(child);
            if siblings.is_empty() {
                self.children.remove(parent);
            }
        }
    }

    /// All records as owned clones, in insertion order.
    pub fn get_all(&self) -> Vec<Item> {
        self.order
            .iter()
            .filter_map(|id| self.items.get(id))
            .cloned()
            .collect()
    }

    /// The record for `id`, if present. O(1).
    pub fn get_item(&self, id: &ItemId) -> Option<Item> {
        self.items.get(id).cloned()
    }

    /// Direct children of `id`; empty when the id is unknown or childless.
    pub fn get_children(&self, id: &ItemId) -> Vec<Item> {
        match self.children.get(id) {
            Some(child_ids) => child_ids
                .iter()
                .filter_map(|child_id| self.items.get(child_id))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Ids of all strict descendants of `id`, in discovery order.
    ///
    /// Explicit stack with a visited set seeded with `id` itself, so the
    /// start record is never collected and no id is collected twice even if
    /// the children index were corrupted.
    fn descendant_ids(&self, id: &ItemId) -> Vec<ItemId> {
        let mut result = Vec::new();
        let mut visited: HashSet<ItemId> = HashSet::from([id.clone()]);
        let mut stack = vec![id.clone()];

        while let Some(current) = stack.pop() {
            if let Some(child_ids) = self.children.get(&current) {
                for child_id in child_ids {
                    if visited.insert(child_id.clone()) {
                        result.push(child_id.clone());
                        stack.push(child_id.clone());
                    }
                }
            }
        }
        result
    }

    /// Every descendant of `id` at any depth, each exactly once.
    #[instrument(level = "trace", skip(self))]
    pub fn get_all_children(&self, id: &ItemId) -> Vec<Item> {
        self.descendant_ids(id)
            .iter()
            .filter_map(|child_id| self.items.get(child_id))
            .cloned()
            .collect()
    }

    /// The chain `[id, parent, grandparent, .., root]`.
    ///
    /// Empty when `id` is unknown; a root yields just its own record. The
    /// chain stops silently at a parent reference that resolves to no stored
    /// record.
    #[instrument(level = "trace", skip(self))]
    pub fn get_all_parents(&self, id: &ItemId) -> Vec<Item> {
        let mut chain = Vec::new();
        let mut current = Some(id.clone());

        while let Some(current_id) = current {
            match self.items.get(&current_id) {
                Some(record) => {
                    current = record.parent_id.clone();
                    chain.push(record.clone());
                }
                None => break,
            }
        }
        chain
    }

    /// Insert a new record into both indexes.
    ///
    /// A fresh record cannot close a cycle among existing records, so no full
    /// cycle walk runs here; the one cycle a lone insert can create, a record
    /// naming itself as parent, is rejected outright. A parent id that
    /// resolves to no stored record is accepted and indexed, so a later
    /// insert of the parent finds its children already linked.
    #[instrument(level = "debug", skip(self, item), fields(id = %item.id))]
    pub fn add_item(&mut self, item: Item) -> StoreResult<()> {
        if self.items.contains_key(&item.id) {
            return Err(StoreError::DuplicateId(item.id));
        }
        if item.parent_id.as_ref() == Some(&item.id) {
            return Err(StoreError::CycleDetected(item.id));
        }
        self.insert_unchecked(item);
        Ok(())
    }

    /// Replace the record for `item.id` wholesale.
    ///
    /// Unknown ids are an error; a lookup-then-update race that loses the
    /// record surfaces instead of vanishing. Re-parenting under the record
    /// itself or any of its descendants is rejected as a cycle, and the
    /// rejection is atomic: the store, including the record payload, is left
    /// exactly as it was.
    #[instrument(level = "debug", skip(self, item), fields(id = %item.id))]
    pub fn update_item(&mut self, item: Item) -> StoreResult<()> {
        let old_parent = match self.items.get(&item.id) {
            Some(existing) => existing.parent_id.clone(),
            None => return Err(StoreError::NotFound(item.id)),
        };
        let new_parent = item.parent_id.clone();

        if old_parent != new_parent {
            if let Some(parent_id) = &new_parent {
                if *parent_id == item.id || self.descendant_ids(&item.id).contains(parent_id) {
                    return Err(StoreError::CycleDetected(item.id));
                }
            }
            if let Some(old) = &old_parent {
                self.unlink_child(old, &item.id);
            }
            if let Some(new) = new_parent {
                self.children.entry(new).or_default().insert(item.id.clone());
            }
        }

        self.items.insert(item.id.clone(), item);
        Ok(())
    }

    /// Remove `id` and its entire subtree from every index.
    ///
    /// All-or-nothing: the target, all its descendants, their order entries
    /// and their children-index links go together.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_item(&mut self, id: &ItemId) -> StoreResult<()> {
        if !self.items.contains_key(id) {
            return Err(StoreError::NotFound(id.clone()));
        }

        let mut doomed = self.descendant_ids(id);
        doomed.push(id.clone());

        for target in &doomed {
            let parent = self
                .items
                .get(target)
                .and_then(|record| record.parent_id.clone());
            if let Some(parent_id) = parent {
                self.unlink_child(&parent_id, target);
            }
            self.items.remove(target);
            self.children.remove(target);
        }

        let gone: HashSet<&ItemId> = doomed.iter().collect();
        self.order.retain(|kept| !gone.contains(kept));
        Ok(())
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when a record with `id` exists.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// Iterate stored records in insertion order. Crate-internal; public
    /// callers receive clones.
    pub(crate) fn records(&self) -> impl Iterator<Item = &Item> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Direct child ids of `id`, if any. Crate-internal.
    pub(crate) fn child_ids(&self, id: &ItemId) -> Option<&HashSet<ItemId>> {
        self.children.get(id)
    }
}
