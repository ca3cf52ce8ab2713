use serde::{Deserialize, Serialize};

/// Classic spreadsheet limit on the number of arguments to a single function call.
pub const DEFAULT_MAX_OPERANDS: usize = 255;

/// Engine-wide settings.
///
/// Missing fields deserialize to their defaults, so hosts can persist only what they override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of operands in one formula (duplicates count).
    ///
    /// Longer formulas are rejected as malformed definitions.
    pub max_operands: usize,
    /// Skip propagation when a literal cell is rewritten with the value it already holds.
    ///
    /// Formula writes are always propagated, even when the value is unchanged.
    pub skip_unchanged_literals: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_operands: DEFAULT_MAX_OPERANDS,
            skip_unchanged_literals: true,
        }
    }
}
