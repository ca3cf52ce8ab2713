//! Cell-name interning.
//!
//! The graph and the value cache are indexed by dense [`CellId`]s; this table maps between
//! those ids and the user-facing cell names. Ids are handed out in first-seen order and are
//! never reused, except that the most recently interned names can be dropped again with
//! [`CellNames::truncate`] when the write that introduced them is rejected.

use std::collections::HashMap;

/// Dense index of a known cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u32);

impl CellId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Default)]
pub struct CellNames {
    ids: HashMap<String, CellId>,
    names: Vec<String>,
}

impl CellNames {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of known cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<CellId> {
        self.ids.get(name).copied()
    }

    /// Returns the id for `name`, registering it if it has not been seen before.
    pub fn intern(&mut self, name: &str) -> CellId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let raw = u32::try_from(self.names.len()).expect("cell id space exhausted");
        let id = CellId(raw);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    #[must_use]
    pub fn name(&self, id: CellId) -> &str {
        &self.names[id.index()]
    }

    /// Forgets every name interned after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        for name in self.names.drain(len.min(self.names.len())..) {
            self.ids.remove(&name);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellId, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(idx, name)| (CellId(idx as u32), name.as_str()))
    }
}
