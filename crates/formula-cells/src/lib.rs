#![forbid(unsafe_code)]
#![deny(unreachable_patterns)]

//! An in-memory store of named integer cells with incremental recalculation.
//!
//! A cell is either a literal (`"42"`) or a sum over other cells (`"=A1+A2+B7"`). Writing a cell
//! updates the cached value of every transitive dependent immediately, by pushing the change
//! (a delta) along reverse dependency edges rather than re-evaluating formulas, so reads are a
//! single lookup.
//!
//! Writes that would introduce a circular reference (including `=A1` written to `A1`) are
//! rejected before any value changes, and the dependency graph is restored to its previous
//! shape.
//!
//! [`CellEngine`] is a cloneable, thread-safe handle: any number of readers run concurrently,
//! writers are serialized, and a reader never sees a partially-propagated write.
//!
//! The crate logs through the [`log`] facade (`debug` for committed/rejected writes, `trace`
//! for propagation detail) and never installs a logger itself.

pub mod cache;
pub mod config;
mod engine;
pub mod error;
pub mod graph;
pub mod names;
pub mod parser;
pub mod propagate;
pub mod snapshot;
pub mod validate;

pub use cache::ValueCache;
pub use config::EngineConfig;
pub use engine::{CellEngine, CellUpdate, EngineStats};
pub use error::{CycleError, EngineError, EngineResult, ParseError};
pub use parser::{is_valid_cell_name, parse_definition, CellKind};
pub use snapshot::{CellSnapshot, EngineSnapshot};
