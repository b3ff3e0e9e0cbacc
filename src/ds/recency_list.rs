//! Recency order for [`LruCore`](crate::policy::lru::LruCore).
//!
//! Entries sit in a [`SlotArena`] and carry `newer`/`older` links to their
//! neighbours. The list keeps both ends so that the entry to promote (by
//! handle) and the entry to evict (the oldest) are reachable without a scan.
//!
//! ```text
//!   newest                                        oldest
//!     │                                              │
//!     ▼                                              ▼
//!   [C] ──older──► [B] ──older──► [A]          (eviction side)
//!       ◄──newer──     ◄──newer──
//! ```
//!
//! Handles are stable for an entry's lifetime: promotion relinks the node in
//! place, so the key index never needs rewriting.

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug)]
struct Node<T> {
    value: T,
    newer: Option<SlotId>,
    older: Option<SlotId>,
}

/// Arena-linked list ordered from newest to oldest.
#[derive(Debug)]
pub struct RecencyList<T> {
    nodes: SlotArena<Node<T>>,
    newest: Option<SlotId>,
    oldest: Option<SlotId>,
}

impl<T> RecencyList<T> {
    /// Empty list with room for `capacity` entries before the arena grows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotArena::with_capacity(capacity),
            newest: None,
            oldest: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.nodes.contains(id)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.nodes.get(id).map(|node| &node.value)
    }

    pub fn newest(&self) -> Option<&T> {
        self.get(self.newest?)
    }

    pub fn oldest(&self) -> Option<&T> {
        self.get(self.oldest?)
    }

    /// Handle of the next eviction victim.
    pub fn oldest_id(&self) -> Option<SlotId> {
        self.oldest
    }

    /// Adds `value` as the newest entry.
    pub fn push_newest(&mut self, value: T) -> SlotId {
        let id = self.nodes.insert(Node {
            value,
            newer: None,
            older: None,
        });
        self.link_newest(id);
        id
    }

    /// Makes `id` the newest entry. `false` for a stale handle.
    pub fn promote(&mut self, id: SlotId) -> bool {
        if !self.nodes.contains(id) {
            return false;
        }
        if self.newest != Some(id) {
            self.unlink(id);
            self.link_newest(id);
        }
        true
    }

    /// Runs `f` on the entry, then promotes it. Used for in-place updates so
    /// the write and the reorder happen on one lookup.
    pub fn update_and_promote<R>(&mut self, id: SlotId, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let out = f(&mut self.nodes.get_mut(id)?.value);
        self.promote(id);
        Some(out)
    }

    /// Unlinks and frees the entry, returning its value.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        if !self.nodes.contains(id) {
            return None;
        }
        self.unlink(id);
        self.nodes.remove(id).map(|node| node.value)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.newest = None;
        self.oldest = None;
    }

    /// Walks from newest to oldest.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            cursor: self.newest,
        }
    }

    /// Walks the links from both ends and checks they agree with the arena.
    pub fn check_links(&self) -> Result<(), InvariantError> {
        let mut visited = 0usize;
        let mut expected_newer = None;
        let mut cursor = self.newest;
        while let Some(id) = cursor {
            let node = self
                .nodes
                .get(id)
                .ok_or_else(|| InvariantError::new("recency link points at a freed slot"))?;
            if node.newer != expected_newer {
                return Err(InvariantError::new("newer link does not mirror older link"));
            }
            visited += 1;
            if visited > self.len() {
                return Err(InvariantError::new("recency list contains a cycle"));
            }
            expected_newer = Some(id);
            cursor = node.older;
        }
        if expected_newer != self.oldest {
            return Err(InvariantError::new("oldest pointer is not the last node"));
        }
        if visited != self.len() {
            return Err(InvariantError::new(format!(
                "{visited} linked nodes but {} allocated",
                self.len()
            )));
        }
        Ok(())
    }

    fn unlink(&mut self, id: SlotId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let (newer, older) = (node.newer.take(), node.older.take());

        match newer.and_then(|n| self.nodes.get_mut(n)) {
            Some(neighbour) => neighbour.older = older,
            None => self.newest = older,
        }
        match older.and_then(|o| self.nodes.get_mut(o)) {
            Some(neighbour) => neighbour.newer = newer,
            None => self.oldest = newer,
        }
    }

    fn link_newest(&mut self, id: SlotId) {
        let previous = self.newest.replace(id);
        if let Some(node) = self.nodes.get_mut(id) {
            node.newer = None;
            node.older = previous;
        }
        match previous.and_then(|p| self.nodes.get_mut(p)) {
            Some(old_head) => old_head.newer = Some(id),
            None => self.oldest = Some(id),
        }
    }
}

/// Newest-to-oldest iterator yielding each handle with its value.
pub struct Iter<'a, T> {
    nodes: &'a SlotArena<Node<T>>,
    cursor: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let node = self.nodes.get(id)?;
        self.cursor = node.older;
        Some((id, &node.value))
    }
}
