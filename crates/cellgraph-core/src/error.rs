//! Error types for the cellgraph spreadsheet.

use thiserror::Error;

use cellgraph_engine::engine::CellId;
use cellgraph_engine::{CellError, CycleError, IdError};

/// Errors that reject a spreadsheet edit. The sheet is untouched when one is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CellgraphError {
    #[error(transparent)]
    MalformedIdentifier(#[from] IdError),

    #[error("Invalid contents for {id}: {source}")]
    InvalidCell {
        id: CellId,
        #[source]
        source: CellError,
    },

    #[error(transparent)]
    Cycle(#[from] CycleError),
}

pub type Result<T> = std::result::Result<T, CellgraphError>;
