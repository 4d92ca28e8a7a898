use cellgraph_engine::engine::{Cell, CellId};
use tracing::{debug, trace};

use super::Spreadsheet;
use crate::error::{CellgraphError, Result};

impl Spreadsheet {
    /// Set a cell from user input and settle everything that depends on it.
    ///
    /// Empty or whitespace-only input clears the cell. A malformed identifier,
    /// unparsable formula or dependency cycle rejects the edit and leaves the
    /// sheet exactly as it was.
    pub fn set_cell(&mut self, id: &str, input: &str) -> Result<()> {
        let id = CellId::parse(id)?;
        if input.trim().is_empty() {
            self.clear(&id);
            return Ok(());
        }

        let mut cell = Cell::from_input(input).map_err(|source| CellgraphError::InvalidCell {
            id: id.clone(),
            source,
        })?;
        cell.update_value(&self.cells);

        self.graph.set_upstream(&id, cell.references())?;

        debug!(cell = %id, contents = cell.contents(), "set cell");
        self.cells.insert(id.clone(), cell);
        self.propagate_from(&id);
        Ok(())
    }

    /// Clear a cell. Cells that reference it stay linked and fall into error.
    /// Deleting an empty cell does nothing.
    pub fn delete_cell(&mut self, id: &str) -> Result<()> {
        let id = CellId::parse(id)?;
        self.clear(&id);
        Ok(())
    }

    fn clear(&mut self, id: &CellId) {
        let removed = self.cells.remove(id);
        self.graph.remove(id);
        if removed.is_some() {
            debug!(cell = %id, "deleted cell");
        }
        self.propagate_from(id);
    }

    /// Re-evaluate every cell downstream of `id`, each exactly once and only
    /// after its own inputs. Returns how many cells were recalculated.
    pub fn propagate_from(&mut self, id: &CellId) -> usize {
        let order = self.graph.recalc_order(id);

        for dependent in &order {
            let Some(result) = self
                .cells
                .get(dependent)
                .and_then(|cell| cell.evaluate(&self.cells))
            else {
                continue;
            };
            if let Some(cell) = self.cells.get_mut(dependent) {
                trace!(cell = %dependent, ?result, "recalculated");
                cell.apply(result);
            }
        }

        if !order.is_empty() {
            debug!(cell = %id, recalculated = order.len(), "propagated change");
        }
        order.len()
    }
}
