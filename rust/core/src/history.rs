// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounded undo stack of full wall-set snapshots.

use std::collections::VecDeque;

use crate::types::Wall;

/// Identifies a pushed snapshot so an action can discard its own entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotHandle(u64);

/// Deep copy of the plan taken before a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub walls: Vec<Wall>,
    pub selected: Option<usize>,
}

#[derive(Debug)]
struct Entry {
    id: u64,
    snapshot: Snapshot,
}

/// Undo history with a fixed maximum depth; the oldest entries are evicted
#[derive(Debug)]
pub struct History {
    entries: VecDeque<Entry>,
    capacity: usize,
    next_id: u64,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            next_id: 0,
        }
    }

    /// Record the current plan
    pub fn push(&mut self, walls: &[Wall], selected: Option<usize>) -> SnapshotHandle {
        let id = self.next_id;
        self.next_id += 1;

        self.entries.push_back(Entry {
            id,
            snapshot: Snapshot {
                walls: walls.to_vec(),
                selected,
            },
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }

        SnapshotHandle(id)
    }

    /// Drop the snapshot behind `handle`, but only when it is still the most
    /// recent entry. Returns whether anything was removed.
    pub fn discard(&mut self, handle: SnapshotHandle) -> bool {
        match self.entries.back() {
            Some(entry) if entry.id == handle.0 => {
                self.entries.pop_back();
                true
            }
            _ => false,
        }
    }

    /// Pop the most recent snapshot
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop_back().map(|e| e.snapshot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(200)
    }
}
