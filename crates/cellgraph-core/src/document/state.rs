use cellgraph_engine::engine::{Cell, CellId, DepGraph};
use std::collections::HashMap;

use crate::error::Result;

/// A store of named cells kept consistent with their dependency graph.
///
/// All operations run to completion before returning. There is no internal
/// locking: share a `Spreadsheet` across threads only behind a lock of the
/// host's choosing.
#[derive(Debug, Default, Clone)]
pub struct Spreadsheet {
    /// Cells that currently hold contents. Missing entries are empty cells.
    pub(crate) cells: HashMap<CellId, Cell>,
    /// Upstream/downstream links between identifiers
    pub(crate) graph: DepGraph,
}

impl Spreadsheet {
    /// Create an empty spreadsheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw (trimmed) contents of a cell, `""` if it is empty.
    pub fn contents(&self, id: &str) -> Result<String> {
        let id = CellId::parse(id)?;
        Ok(self
            .cells
            .get(&id)
            .map(|cell| cell.contents().to_string())
            .unwrap_or_default())
    }

    /// String shown for a cell's value, `""` if it is empty.
    pub fn display_string(&self, id: &str) -> Result<String> {
        let id = CellId::parse(id)?;
        Ok(self
            .cells
            .get(&id)
            .map(Cell::display_string)
            .unwrap_or_default())
    }

    /// Numeric value of a cell, if it has one.
    pub fn value(&self, id: &str) -> Result<Option<f64>> {
        let id = CellId::parse(id)?;
        Ok(self.cells.get(&id).and_then(Cell::number_value))
    }

    /// The cell stored under `id`, if it is non-empty.
    pub fn cell(&self, id: &str) -> Result<Option<&Cell>> {
        let id = CellId::parse(id)?;
        Ok(self.cells.get(&id))
    }

    pub fn graph(&self) -> &DepGraph {
        &self.graph
    }

    /// Identifiers of every non-empty cell, in column-then-row order.
    pub fn ids(&self) -> Vec<&CellId> {
        let mut ids: Vec<&CellId> = self.cells.keys().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
