//! Error types for the cell engine.

use thiserror::Error;

use crate::engine::{CellId, format_id_list};

/// A string that does not follow the `A1` identifier grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("Malformed cell identifier: '{0}'")]
    Malformed(String),
}

/// Errors produced while turning formula text into an expression tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty formula")]
    Empty,

    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("Invalid number '{text}' at position {pos}")]
    InvalidNumber { text: String, pos: usize },

    #[error("Invalid cell reference '{name}' at position {pos}")]
    InvalidReference { name: String, pos: usize },

    #[error("Formula nests deeper than {max} levels at position {pos}")]
    TooDeep { max: usize, pos: usize },

    #[error("Expected {expected} at position {pos}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        pos: usize,
    },
}

/// Errors raised when building a cell from raw text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CellError {
    #[error("Cell contents must not be empty")]
    InvalidInput,

    #[error("Formula parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Why a formula cell has no value.
///
/// These never abort a spreadsheet operation: they are stored on the cell
/// and shown as the error marker until a later re-evaluation succeeds.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Formula has not been evaluated")]
    NotEvaluated,

    #[error("Reference to empty cell {0}")]
    UnresolvedReference(CellId),

    #[error("Cell {0} has no numeric value")]
    NonNumericReference(CellId),

    /// The expression tree broke the parser's contract.
    #[error("Internal evaluator error: {0}")]
    Internal(String),
}

/// Rejected dependency edit. `path` starts and ends at the edited cell.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Circular dependency detected: {}", format_id_list(.path, " -> "))]
pub struct CycleError {
    pub path: Vec<CellId>,
}
