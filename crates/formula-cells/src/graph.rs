//! Forward ("depends on") and reverse ("depended on by") edges between cells.
//!
//! Both directions are plain index-based tables keyed by [`CellId`], so the cycle validator and
//! the propagator walk ordinary data and a rejected write can be undone by writing the previous
//! operand list back.

use crate::names::CellId;
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphStats {
    /// Cells with at least one operand.
    pub formula_cells: usize,
    /// Distinct operand -> dependent edges.
    pub edges: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// `operands[c]`: the formula operands of `c` in formula order, duplicates included.
    operands: Vec<Vec<CellId>>,
    /// `dependents[c]`: every cell whose formula references `c`. Always the transpose of
    /// `operands` (ignoring multiplicity).
    dependents: Vec<HashSet<CellId>>,
}

impl DependencyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of node slots (known cells).
    #[must_use]
    pub fn len(&self) -> usize {
        self.operands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    /// Makes sure `cell` has a slot in both tables.
    pub fn ensure(&mut self, cell: CellId) {
        let idx = cell.index();
        if idx >= self.operands.len() {
            self.operands.resize_with(idx + 1, Vec::new);
            self.dependents.resize_with(idx + 1, HashSet::new);
        }
    }

    /// Replaces the operands of `cell` and updates the reverse index to match.
    ///
    /// Returns the previous operand list; passing it back in restores the graph exactly.
    pub fn set_operands(&mut self, cell: CellId, operands: Vec<CellId>) -> Vec<CellId> {
        self.ensure(cell);
        for &op in &operands {
            self.ensure(op);
        }

        let previous = std::mem::replace(&mut self.operands[cell.index()], operands);

        let old: HashSet<CellId> = previous.iter().copied().collect();
        let new: HashSet<CellId> = self.operands[cell.index()].iter().copied().collect();
        for op in old.difference(&new) {
            self.dependents[op.index()].remove(&cell);
        }
        for op in new.difference(&old) {
            self.dependents[op.index()].insert(cell);
        }

        previous
    }

    /// Direct operands of `cell` in formula order. Empty for literals and unknown cells.
    #[must_use]
    pub fn operands_of(&self, cell: CellId) -> &[CellId] {
        self.operands
            .get(cell.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Direct dependents of `cell`, in no particular order.
    pub fn dependents_of(&self, cell: CellId) -> impl Iterator<Item = CellId> + '_ {
        self.dependents
            .get(cell.index())
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    #[must_use]
    pub fn has_dependents(&self, cell: CellId) -> bool {
        self.dependents
            .get(cell.index())
            .is_some_and(|set| !set.is_empty())
    }

    /// Every cell reachable from `cell` through reverse edges, excluding `cell` itself
    /// (breadth-first order).
    #[must_use]
    pub fn dependents_transitive(&self, cell: CellId) -> Vec<CellId> {
        self.reachable(cell, |c| self.dependents_of(c).collect())
    }

    /// Every cell reachable from `cell` through forward edges, excluding `cell` itself
    /// (breadth-first order).
    #[must_use]
    pub fn precedents_transitive(&self, cell: CellId) -> Vec<CellId> {
        self.reachable(cell, |c| self.operands_of(c).to_vec())
    }

    fn reachable(&self, start: CellId, next: impl Fn(CellId) -> Vec<CellId>) -> Vec<CellId> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        let mut out = Vec::new();
        seen.insert(start);
        queue.push_back(start);
        while let Some(cur) = queue.pop_front() {
            for n in next(cur) {
                if seen.insert(n) {
                    out.push(n);
                    queue.push_back(n);
                }
            }
        }
        out
    }

    /// Drops every slot at index `len` and above.
    ///
    /// The dropped cells must no longer have any edges.
    pub fn truncate(&mut self, len: usize) {
        debug_assert!(
            self.operands.iter().skip(len).all(Vec::is_empty)
                && self.dependents.iter().skip(len).all(HashSet::is_empty),
            "truncated cells still have edges"
        );
        self.operands.truncate(len);
        self.dependents.truncate(len);
    }

    #[must_use]
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            formula_cells: self.operands.iter().filter(|ops| !ops.is_empty()).count(),
            edges: self.dependents.iter().map(HashSet::len).sum(),
        }
    }
}
