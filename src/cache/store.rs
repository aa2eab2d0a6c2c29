//! Positional store with possibly unfetched slots

use crate::types::{item_has_id, Item};

/// One position in a collection
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// The item at this position has been fetched
    Materialized(Item),
    /// Nothing is known about this position yet
    Unknown,
}

impl Slot {
    /// The item, if materialized
    pub fn item(&self) -> Option<&Item> {
        match self {
            Self::Materialized(item) => Some(item),
            Self::Unknown => None,
        }
    }

    /// Whether the item at this position has been fetched
    pub fn is_materialized(&self) -> bool {
        matches!(self, Self::Materialized(_))
    }
}

/// Sparse, ordered cache of one collection.
///
/// The length always equals the last observed total count of the collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseStore {
    slots: Vec<Slot>,
}

impl SparseStore {
    /// Build a store from a first fetch. Items land at `start`, the rest is unknown.
    pub fn from_fetch(items: Vec<Item>, total: usize, start: Option<usize>) -> Self {
        let mut store = Self::default();
        store.merge(items, total, start);
        store
    }

    /// Number of slots (the last observed total)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the collection was observed empty
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot at a position
    #[cfg(test)]
    pub(crate) fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Number of slots still unknown
    pub fn unknown_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_materialized()).count()
    }

    /// All materialized items, in position order
    pub fn materialized(&self) -> impl Iterator<Item = &Item> {
        self.slots.iter().filter_map(Slot::item)
    }

    /// Find a materialized item by its `id`
    pub fn find_by_id(&self, id: u64) -> Option<&Item> {
        self.materialized().find(|item| item_has_id(item, id))
    }

    /// Read a window. All-or-nothing: `None` if any slot in
    /// `[start, start + num)` is unknown, or if `start` is past the end.
    ///
    /// The window stops at the end of the store, so an absent or oversized
    /// `num` reads to the end.
    pub fn read(&self, start: Option<usize>, num: Option<usize>) -> Option<Vec<Item>> {
        let start = start.unwrap_or(0);
        if start > self.len() {
            return None;
        }
        let end = match num {
            Some(num) => start.saturating_add(num).min(self.len()),
            None => self.len(),
        };

        self.slots[start..end]
            .iter()
            .map(|slot| slot.item().cloned())
            .collect()
    }

    /// Merge fetched items written sequentially from `start`, then resize to `total`.
    ///
    /// Materialized slots outside the written range are kept unless they fall
    /// beyond the new total. A `start` at or past `total` is clamped to
    /// `total - 1`.
    pub fn merge(&mut self, items: Vec<Item>, total: usize, start: Option<usize>) {
        self.slots.resize(total, Slot::Unknown);
        if total == 0 {
            return;
        }

        let start = start.unwrap_or(0).min(total - 1);
        for (slot, item) in self.slots[start..].iter_mut().zip(items) {
            *slot = Slot::Materialized(item);
        }
    }
}
