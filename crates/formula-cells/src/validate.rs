//! Cycle validation for a tentatively rewired cell.
//!
//! [`aggregate`] walks forward edges depth-first from a cell, keeping the current DFS path in an
//! explicit on-stack set: a node is added when it is entered and removed once all of its operands
//! are done. Reaching a node that is still on the stack closes a loop. Finished nodes are memoized
//! with their value, so a cell reachable along several paths (a diamond) is expanded once but
//! still counted once per path into the sum.
//!
//! The walk uses an explicit frame stack; long dependency chains do not grow the call stack.

use crate::cache::ValueCache;
use crate::graph::DependencyGraph;
use crate::names::CellId;
use std::collections::{HashMap, HashSet};

/// A dependency loop, starting and ending at the same cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle(pub Vec<CellId>);

struct Frame {
    cell: CellId,
    next: usize,
    sum: i64,
}

/// Computes the value of `cell` from the literal leaves of its forward closure.
///
/// Leaves (cells without operands) contribute their cached value; formula cells contribute the sum
/// of their operands. Cached values of formula cells are never read, so on a graph that has just
/// been rewired this is the value `cell` would take if the new edges were committed.
///
/// Returns [`Cycle`] if `cell` can reach itself. If the graph was acyclic before `cell`'s
/// operands were replaced, the reported loop always starts at `cell`.
pub fn aggregate(graph: &DependencyGraph, cache: &ValueCache, cell: CellId) -> Result<i64, Cycle> {
    if graph.operands_of(cell).is_empty() {
        return Ok(cache.get(cell));
    }

    let mut on_stack: HashSet<CellId> = HashSet::new();
    let mut finished: HashMap<CellId, i64> = HashMap::new();
    let mut stack = vec![Frame {
        cell,
        next: 0,
        sum: 0,
    }];
    on_stack.insert(cell);

    while let Some(top) = stack.last_mut() {
        let operands = graph.operands_of(top.cell);

        if let Some(&op) = operands.get(top.next) {
            top.next += 1;

            if on_stack.contains(&op) {
                let start = stack.iter().position(|f| f.cell == op).unwrap_or(0);
                let mut path: Vec<CellId> = stack[start..].iter().map(|f| f.cell).collect();
                path.push(op);
                return Err(Cycle(path));
            }

            if graph.operands_of(op).is_empty() {
                top.sum = top.sum.wrapping_add(cache.get(op));
            } else if let Some(&value) = finished.get(&op) {
                top.sum = top.sum.wrapping_add(value);
            } else {
                on_stack.insert(op);
                stack.push(Frame {
                    cell: op,
                    next: 0,
                    sum: 0,
                });
            }
            continue;
        }

        // All operands done: pop and hand the value to the parent frame.
        let done = top.cell;
        let value = top.sum;
        stack.pop();
        on_stack.remove(&done);
        finished.insert(done, value);
        match stack.last_mut() {
            Some(parent) => parent.sum = parent.sum.wrapping_add(value),
            None => return Ok(value),
        }
    }

    unreachable!("the root frame always returns")
}
