use crate::names::CellId;

/// Last computed value of every known cell, indexed by [`CellId`].
///
/// Cells that were only ever referenced as operands hold `0`. Arithmetic wraps on overflow.
#[derive(Debug, Clone, Default)]
pub struct ValueCache {
    values: Vec<i64>,
}

impl ValueCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, cell: CellId) -> i64 {
        self.values.get(cell.index()).copied().unwrap_or(0)
    }

    pub fn ensure(&mut self, cell: CellId) {
        let idx = cell.index();
        if idx >= self.values.len() {
            self.values.resize(idx + 1, 0);
        }
    }

    pub fn set(&mut self, cell: CellId, value: i64) {
        self.ensure(cell);
        self.values[cell.index()] = value;
    }

    pub fn add(&mut self, cell: CellId, delta: i64) {
        self.ensure(cell);
        let slot = &mut self.values[cell.index()];
        *slot = slot.wrapping_add(delta);
    }

    pub fn truncate(&mut self, len: usize) {
        self.values.truncate(len);
    }
}
