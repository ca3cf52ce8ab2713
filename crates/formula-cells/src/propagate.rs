//! Delta propagation through reverse edges.
//!
//! When a cell's value changes by `delta`, every transitive dependent changes by a multiple of
//! `delta`: one copy per dependency path (so `W = Y + Z` over `Y = X`, `Z = X` moves by `2 * delta`,
//! and `=A+A` counts `A` twice). Rather than pushing `delta` down every path, the propagator
//! collects the affected cells once, then visits them breadth-first in dependency order
//! (Kahn's algorithm restricted to the affected subgraph). Each cell is written exactly once,
//! with the sum of the deltas its operands received in this pass.

use crate::cache::ValueCache;
use crate::graph::DependencyGraph;
use crate::names::CellId;
use std::collections::{HashMap, HashSet, VecDeque};

/// Adds `delta` to `root` and the matching per-path change to every transitive dependent.
///
/// Returns the number of dependents that were updated (not counting `root`).
pub fn propagate(
    graph: &DependencyGraph,
    cache: &mut ValueCache,
    root: CellId,
    delta: i64,
) -> usize {
    cache.add(root, delta);
    if !graph.has_dependents(root) {
        return 0;
    }

    let affected = graph.dependents_transitive(root);
    let mut scope: HashSet<CellId> = affected.iter().copied().collect();
    scope.insert(root);

    // Distinct in-scope operands still waiting to be settled, per affected cell.
    let mut pending: HashMap<CellId, usize> = affected
        .iter()
        .map(|&cell| {
            let distinct: HashSet<CellId> = graph
                .operands_of(cell)
                .iter()
                .copied()
                .filter(|op| scope.contains(op))
                .collect();
            (cell, distinct.len())
        })
        .collect();

    let mut applied: HashMap<CellId, i64> = HashMap::with_capacity(affected.len() + 1);
    applied.insert(root, delta);

    let mut queue = VecDeque::new();
    queue.push_back(root);
    let mut updated = 0usize;

    while let Some(cur) = queue.pop_front() {
        for dep in graph.dependents_of(cur) {
            let Some(waiting) = pending.get_mut(&dep) else {
                continue;
            };
            *waiting -= 1;
            if *waiting > 0 {
                continue;
            }

            let dep_delta = graph
                .operands_of(dep)
                .iter()
                .filter_map(|op| applied.get(op))
                .fold(0i64, |acc, d| acc.wrapping_add(*d));
            cache.add(dep, dep_delta);
            applied.insert(dep, dep_delta);
            updated += 1;
            queue.push_back(dep);
        }
    }

    debug_assert_eq!(updated, affected.len(), "propagation left cells unsettled");
    log::trace!(
        "propagated delta {delta} from cell #{} to {updated} dependents",
        root.index()
    );
    updated
}
