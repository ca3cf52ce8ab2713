//! The shared cell store.
//!
//! All state (names, graph, cached values) lives behind one readers-writer lock. Reads take the
//! shared side and never block each other. A write holds the exclusive side for the whole
//! validate -> rewire -> propagate sequence, so readers observe either the state before a write
//! or the state after it, never a half-propagated one.

use crate::cache::ValueCache;
use crate::config::EngineConfig;
use crate::error::{CycleError, EngineError, EngineResult};
use crate::graph::DependencyGraph;
use crate::names::{CellId, CellNames};
use crate::parser::{is_valid_cell_name, parse_definition, CellKind};
use crate::propagate::propagate;
use crate::snapshot::{CellSnapshot, EngineSnapshot};
use crate::validate::{aggregate, Cycle};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Result of a committed [`CellEngine::set_cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellUpdate {
    /// Value the cell held before the write (`0` for a new cell).
    pub previous: i64,
    pub value: i64,
    /// Number of transitive dependents whose cached value was adjusted.
    pub dependents_updated: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineStats {
    /// Known cells, including ones that are only referenced.
    pub cells: usize,
    pub formula_cells: usize,
    /// Distinct operand -> dependent edges.
    pub edges: usize,
}

#[derive(Debug, Default)]
struct EngineState {
    names: CellNames,
    graph: DependencyGraph,
    cache: ValueCache,
    /// `defined[c]`: `c` has been the target of a successful write.
    defined: Vec<bool>,
}

impl EngineState {
    fn intern(&mut self, name: &str) -> CellId {
        let id = self.names.intern(name);
        self.graph.ensure(id);
        self.cache.ensure(id);
        if id.index() >= self.defined.len() {
            self.defined.resize(id.index() + 1, false);
        }
        id
    }

    /// Drops every cell registered after the first `len`.
    fn forget_since(&mut self, len: usize) {
        self.names.truncate(len);
        self.graph.truncate(len);
        self.cache.truncate(len);
        self.defined.truncate(len);
    }

    fn is_defined(&self, cell: CellId) -> bool {
        self.defined.get(cell.index()).copied().unwrap_or(false)
    }

    fn kind(&self, cell: CellId) -> Option<CellKind> {
        if !self.is_defined(cell) {
            return None;
        }
        let operands = self.graph.operands_of(cell);
        if operands.is_empty() {
            Some(CellKind::Literal(self.cache.get(cell)))
        } else {
            Some(CellKind::Formula(self.names_of(operands.iter().copied())))
        }
    }

    fn names_of(&self, cells: impl IntoIterator<Item = CellId>) -> Vec<String> {
        cells
            .into_iter()
            .map(|id| self.names.name(id).to_string())
            .collect()
    }

    fn sorted_names_of(&self, cells: impl IntoIterator<Item = CellId>) -> Vec<String> {
        let mut out = self.names_of(cells);
        out.sort();
        out
    }

    fn cycle_error(&self, cycle: Cycle) -> CycleError {
        CycleError {
            path: self.names_of(cycle.0),
        }
    }

    fn apply(
        &mut self,
        name: &str,
        kind: CellKind,
        config: &EngineConfig,
    ) -> EngineResult<CellUpdate> {
        let mark = self.names.len();
        let cell = self.intern(name);
        let previous = self.cache.get(cell);
        let was_defined = self.is_defined(cell);

        let (value, was_literal) = match kind {
            CellKind::Literal(value) => {
                let prior = self.graph.set_operands(cell, Vec::new());
                (value, was_defined && prior.is_empty())
            }
            CellKind::Formula(operands) => {
                let operands: Vec<CellId> = operands.iter().map(|op| self.intern(op)).collect();
                let prior = self.graph.set_operands(cell, operands);
                match aggregate(&self.graph, &self.cache, cell) {
                    Ok(value) => (value, false),
                    Err(cycle) => {
                        let err = self.cycle_error(cycle);
                        self.graph.set_operands(cell, prior);
                        self.forget_since(mark);
                        log::debug!("rejected write to {name}: {err}");
                        return Err(err.into());
                    }
                }
            }
        };

        self.defined[cell.index()] = true;

        let delta = value.wrapping_sub(previous);
        let dependents_updated = if delta == 0 && was_literal && config.skip_unchanged_literals {
            0
        } else {
            propagate(&self.graph, &mut self.cache, cell, delta)
        };
        debug_assert_eq!(self.cache.get(cell), value);

        log::debug!(
            "set {name}: {previous} -> {value} ({dependents_updated} dependents updated)"
        );
        Ok(CellUpdate {
            previous,
            value,
            dependents_updated,
        })
    }
}

/// A thread-safe store of literal and sum-formula cells.
///
/// `CellEngine` is a handle: clones share the same store, and the handle is `Send + Sync`, so it
/// can be passed to any number of reader and writer threads.
///
/// ```
/// use formula_cells::CellEngine;
///
/// let engine = CellEngine::new();
/// engine.set_cell("A1", "1").unwrap();
/// engine.set_cell("A2", "2").unwrap();
/// engine.set_cell("A3", "=A1+A2").unwrap();
/// assert_eq!(engine.get_cell("A3"), 3);
///
/// engine.set_cell("A2", "4").unwrap();
/// assert_eq!(engine.get_cell("A3"), 5);
///
/// assert!(engine.set_cell("A1", "=A3").unwrap_err().is_cyclic());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CellEngine {
    config: EngineConfig,
    state: Arc<RwLock<EngineState>>,
}

impl CellEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            state: Arc::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn read(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state.read().expect("cell engine lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state.write().expect("cell engine lock poisoned")
    }

    /// Defines `name` as a literal (`"42"`) or a sum formula (`"=A1+A2"`).
    ///
    /// Cells mentioned for the first time are created with value `0`. Every transitive dependent
    /// of `name` is brought up to date before the call returns.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidCellName`] if `name` is not a usable cell name.
    /// - [`EngineError::MalformedDefinition`] if `definition` does not parse.
    /// - [`EngineError::CyclicDependency`] if the formula would make `name` depend on itself.
    ///
    /// A failed call leaves the store exactly as it was, including the set of known cells.
    pub fn set_cell(&self, name: &str, definition: &str) -> EngineResult<CellUpdate> {
        if !is_valid_cell_name(name) {
            return Err(EngineError::InvalidCellName(name.to_string()));
        }
        let kind = parse_definition(definition, self.config.max_operands).map_err(|source| {
            EngineError::MalformedDefinition {
                cell: name.to_string(),
                source,
            }
        })?;
        self.write().apply(name, kind, &self.config)
    }

    /// Current value of `name`; `0` for a cell that has never been defined.
    #[must_use]
    pub fn get_cell(&self, name: &str) -> i64 {
        let state = self.read();
        state.names.get(name).map_or(0, |id| state.cache.get(id))
    }

    /// Recomputes `name` from the literal cells it transitively reads, ignoring cached formula
    /// values.
    ///
    /// Always agrees with [`get_cell`](Self::get_cell); useful for auditing the cache.
    ///
    /// # Errors
    ///
    /// [`EngineError::CyclicDependency`] if the graph contains a loop through `name`, which the
    /// write path never allows.
    pub fn evaluate(&self, name: &str) -> EngineResult<i64> {
        let state = self.read();
        let Some(id) = state.names.get(name) else {
            return Ok(0);
        };
        aggregate(&state.graph, &state.cache, id).map_err(|cycle| state.cycle_error(cycle).into())
    }

    /// The definition `name` was last set to, or `None` if it has never been set.
    #[must_use]
    pub fn definition(&self, name: &str) -> Option<CellKind> {
        let state = self.read();
        state.kind(state.names.get(name)?)
    }

    /// Direct operands of `name` in formula order (duplicates kept).
    #[must_use]
    pub fn operands_of(&self, name: &str) -> Vec<String> {
        let state = self.read();
        state.names.get(name).map_or_else(Vec::new, |id| {
            state.names_of(state.graph.operands_of(id).iter().copied())
        })
    }

    /// Cells whose formulas reference `name` directly, sorted by name.
    #[must_use]
    pub fn dependents_of(&self, name: &str) -> Vec<String> {
        let state = self.read();
        state.names.get(name).map_or_else(Vec::new, |id| {
            state.sorted_names_of(state.graph.dependents_of(id))
        })
    }

    /// Every cell whose value depends on `name`, sorted by name.
    #[must_use]
    pub fn dependents_transitive(&self, name: &str) -> Vec<String> {
        let state = self.read();
        state.names.get(name).map_or_else(Vec::new, |id| {
            state.sorted_names_of(state.graph.dependents_transitive(id))
        })
    }

    /// Every cell `name` transitively reads, sorted by name.
    #[must_use]
    pub fn precedents_transitive(&self, name: &str) -> Vec<String> {
        let state = self.read();
        state.names.get(name).map_or_else(Vec::new, |id| {
            state.sorted_names_of(state.graph.precedents_transitive(id))
        })
    }

    /// Number of known cells, including cells that are only referenced.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().names.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> EngineStats {
        let state = self.read();
        let graph = state.graph.stats();
        EngineStats {
            cells: state.names.len(),
            formula_cells: graph.formula_cells,
            edges: graph.edges,
        }
    }

    /// A consistent copy of every known cell, sorted by name.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        let state = self.read();
        let mut cells: Vec<CellSnapshot> = state
            .names
            .iter()
            .map(|(id, name)| CellSnapshot {
                name: name.to_string(),
                value: state.cache.get(id),
                definition: state.kind(id).map(|kind| kind.to_string()),
            })
            .collect();
        cells.sort_by(|a, b| a.name.cmp(&b.name));
        EngineSnapshot { cells }
    }
}
