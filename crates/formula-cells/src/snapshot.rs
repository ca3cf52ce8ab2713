use serde::{Deserialize, Serialize};

/// One cell in an [`EngineSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub name: String,
    pub value: i64,
    /// Definition text (`"42"`, `"=A1+A2"`), or `None` for a cell that is only referenced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

/// A consistent point-in-time view of every known cell, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub cells: Vec<CellSnapshot>,
}

impl EngineSnapshot {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CellSnapshot> {
        self.cells
            .binary_search_by(|cell| cell.name.as_str().cmp(name))
            .ok()
            .map(|idx| &self.cells[idx])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
