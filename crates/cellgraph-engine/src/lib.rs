//! cellgraph_engine - cells, formulas and the dependency graph behind them.

pub mod engine;
pub mod error;

pub use error::{CellError, CycleError, EvalError, IdError, ParseError};
