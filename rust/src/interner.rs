//! Task name interning.
//!
//! Maps task names to dense integer indices so the dependency graph can keep
//! its adjacency lists and per-task values in plain vectors.

use rustc_hash::FxHashMap;

/// Dense task index (u32 for compact adjacency lists).
pub type TaskIdx = u32;

/// Bidirectional task name <-> index map, indices assigned in insertion order.
#[derive(Debug, Clone, Default)]
pub struct TaskNameInterner {
    to_idx: FxHashMap<String, TaskIdx>,
    names: Vec<String>,
}

impl TaskNameInterner {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_idx: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            names: Vec::with_capacity(capacity),
        }
    }

    /// Insert a name that must not already be present.
    ///
    /// Returns `None` if the name was interned before; the existing index is left untouched.
    pub fn insert_unique(&mut self, name: &str) -> Option<TaskIdx> {
        if self.to_idx.contains_key(name) {
            return None;
        }
        let idx = self.names.len() as TaskIdx;
        self.names.push(name.to_string());
        self.to_idx.insert(name.to_string(), idx);
        Some(idx)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<TaskIdx> {
        self.to_idx.get(name).copied()
    }

    /// Name for an index. Indices handed out by this interner always resolve.
    #[inline]
    pub fn resolve(&self, idx: TaskIdx) -> &str {
        &self.names[idx as usize]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
