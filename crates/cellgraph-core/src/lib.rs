//! cellgraph-core - spreadsheet model built on the cell engine.

pub mod document;
pub mod error;

pub use document::Spreadsheet;
pub use error::{CellgraphError, Result};

pub use cellgraph_engine::engine::CellId;
