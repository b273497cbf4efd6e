//! Frontier ordering policies.
//!
//! Every policy is an open set with `insert` / `extract_next`; the engine
//! never looks inside. `positions()` always lists entries in the order they
//! would be extracted.

use crate::grid::Position;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};

/// A candidate waiting in the open set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrontierEntry {
    pub position: Position,
    /// Cost so far
    pub g: f64,
    /// Heuristic estimate to the goal
    pub h: f64,
    /// Insertion counter, used for tie-breaking
    pub seq: u64,
}

impl FrontierEntry {
    pub fn f(&self) -> f64 {
        self.g + self.h
    }
}

pub trait Frontier {
    fn insert(&mut self, entry: FrontierEntry);
    fn extract_next(&mut self) -> Option<FrontierEntry>;
    fn len(&self) -> usize;
    fn positions(&self) -> Vec<Position>;
    fn clear(&mut self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Queue order: earliest insertion first (BFS)
#[derive(Debug, Default)]
pub struct Fifo {
    queue: VecDeque<FrontierEntry>,
}

impl Frontier for Fifo {
    fn insert(&mut self, entry: FrontierEntry) {
        self.queue.push_back(entry);
    }

    fn extract_next(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn positions(&self) -> Vec<Position> {
        self.queue.iter().map(|e| e.position).collect()
    }

    fn clear(&mut self) {
        self.queue.clear();
    }
}

/// Stack order: latest insertion first (DFS)
#[derive(Debug, Default)]
pub struct Lifo {
    stack: Vec<FrontierEntry>,
}

impl Frontier for Lifo {
    fn insert(&mut self, entry: FrontierEntry) {
        self.stack.push(entry);
    }

    fn extract_next(&mut self) -> Option<FrontierEntry> {
        self.stack.pop()
    }

    fn len(&self) -> usize {
        self.stack.len()
    }

    fn positions(&self) -> Vec<Position> {
        self.stack.iter().rev().map(|e| e.position).collect()
    }

    fn clear(&mut self) {
        self.stack.clear();
    }
}

/// What a priority frontier minimizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityKey {
    /// Minimum h, ties by insertion (Greedy Best-First)
    H,
    /// Minimum g + h, ties by h then insertion (A*)
    F,
}

#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    key: PriorityKey,
    entry: FrontierEntry,
}

impl HeapEntry {
    fn rank(&self, other: &Self) -> Ordering {
        let (a, b) = (&self.entry, &other.entry);
        let primary = match self.key {
            PriorityKey::H => a.h.partial_cmp(&b.h).unwrap_or(Ordering::Equal),
            PriorityKey::F => a
                .f()
                .partial_cmp(&b.f())
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.h.partial_cmp(&b.h).unwrap_or(Ordering::Equal)),
        };
        primary.then_with(|| a.seq.cmp(&b.seq))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.rank(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other.rank(self)
    }
}

/// Binary-heap frontier keyed on h or f.
///
/// Holds at most one live entry per position. Re-inserting a position
/// supersedes the old entry, which stays in the heap until popped and is
/// then skipped.
#[derive(Debug)]
pub struct Priority {
    key: PriorityKey,
    heap: BinaryHeap<HeapEntry>,
    live: HashMap<Position, u64>,
}

impl Priority {
    pub fn new(key: PriorityKey) -> Self {
        Priority {
            key,
            heap: BinaryHeap::new(),
            live: HashMap::new(),
        }
    }

    fn is_live(&self, entry: &FrontierEntry) -> bool {
        self.live.get(&entry.position) == Some(&entry.seq)
    }
}

impl Frontier for Priority {
    fn insert(&mut self, entry: FrontierEntry) {
        self.live.insert(entry.position, entry.seq);
        self.heap.push(HeapEntry { key: self.key, entry });
    }

    fn extract_next(&mut self) -> Option<FrontierEntry> {
        while let Some(top) = self.heap.pop() {
            if self.is_live(&top.entry) {
                self.live.remove(&top.entry.position);
                return Some(top.entry);
            }
        }
        None
    }

    fn len(&self) -> usize {
        self.live.len()
    }

    fn positions(&self) -> Vec<Position> {
        let mut entries: Vec<HeapEntry> = self
            .heap
            .iter()
            .filter(|e| self.is_live(&e.entry))
            .copied()
            .collect();
        entries.sort_by(|a, b| a.rank(b));
        entries.into_iter().map(|e| e.entry.position).collect()
    }

    fn clear(&mut self) {
        self.heap.clear();
        self.live.clear();
    }
}

/// Candidate set for hill climbing. Every neighbor is held and listed,
/// best h first, but only one strictly below the ceiling (the current
/// node's h) can be extracted.
#[derive(Debug)]
pub struct BestNeighbor {
    ceiling: f64,
    candidates: Vec<FrontierEntry>,
}

impl BestNeighbor {
    pub fn new(ceiling: f64) -> Self {
        BestNeighbor {
            ceiling,
            candidates: Vec::new(),
        }
    }

    fn ranked(&self) -> Vec<&FrontierEntry> {
        let mut ranked: Vec<&FrontierEntry> = self.candidates.iter().collect();
        ranked.sort_by(|a, b| {
            a.h.partial_cmp(&b.h)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.seq.cmp(&b.seq))
        });
        ranked
    }
}

impl Frontier for BestNeighbor {
    fn insert(&mut self, entry: FrontierEntry) {
        self.candidates.push(entry);
    }

    fn extract_next(&mut self) -> Option<FrontierEntry> {
        let best = self.ranked().first().filter(|e| e.h < self.ceiling).map(|e| e.seq)?;
        let idx = self.candidates.iter().position(|e| e.seq == best)?;
        Some(self.candidates.remove(idx))
    }

    fn len(&self) -> usize {
        self.candidates.len()
    }

    fn positions(&self) -> Vec<Position> {
        self.ranked().into_iter().map(|e| e.position).collect()
    }

    fn clear(&mut self) {
        self.candidates.clear();
    }
}
