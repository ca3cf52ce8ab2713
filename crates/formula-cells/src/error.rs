use std::fmt;

pub type EngineResult<T> = Result<T, EngineError>;

/// Why a definition string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("definition is empty")]
    Empty,

    #[error("not an integer literal: {0:?}")]
    InvalidLiteral(String),

    #[error("formula has no operands")]
    EmptyFormula,

    #[error("invalid operand: {0:?}")]
    InvalidOperand(String),

    #[error("formula has {count} operands (limit is {max})")]
    TooManyOperands { count: usize, max: usize },
}

/// A write that would close a loop in the dependency graph.
///
/// `path` starts and ends at the cell being written, e.g. `A1 -> A2 -> A1`.
/// A direct self-reference is reported as `D1 -> D1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError {
    pub path: Vec<String>,
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "circular reference: ")?;
        for (idx, cell) in self.path.iter().enumerate() {
            if idx > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{cell}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CycleError {}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("malformed definition for {cell}: {source}")]
    MalformedDefinition {
        cell: String,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    CyclicDependency(#[from] CycleError),

    #[error("invalid cell name: {0:?}")]
    InvalidCellName(String),
}

impl EngineError {
    #[must_use]
    pub fn is_cyclic(&self) -> bool {
        matches!(self, Self::CyclicDependency(_))
    }

    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedDefinition { .. })
    }
}
