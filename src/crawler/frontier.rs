//! Breadth-first crawl frontier
//!
//! This module handles:
//! - FIFO queue of URLs waiting to be fetched, tagged with their depth
//! - The visited set of canonical URLs already dequeued for fetching
//! - The hard cap on queued entries

use std::collections::{HashSet, VecDeque};

/// Maximum number of entries the frontier holds at once
pub const MAX_QUEUED: usize = 1000;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Canonical URL
    pub url: String,

    /// Link distance from the seed (seed = 0)
    pub depth: u32,
}

impl FrontierEntry {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// FIFO frontier plus visited set
///
/// The queue may hold the same URL more than once; the coordinator skips
/// entries already visited when it dequeues them.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to the back of the queue
    ///
    /// # Returns
    ///
    /// `false` when the queue is full or the URL was already visited
    pub fn push(&mut self, entry: FrontierEntry) -> bool {
        if self.is_full() || self.visited.contains(&entry.url) {
            return false;
        }
        self.queue.push_back(entry);
        true
    }

    /// Removes the oldest entry
    pub fn pop_front(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Records a URL as visited; returns `false` if it already was
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Number of queued entries
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.queue.len() >= MAX_QUEUED
    }

    /// Number of URLs dequeued for fetching so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
