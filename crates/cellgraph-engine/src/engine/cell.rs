//! Cell data structures.
//!
//! - [`CellType`] - What a cell holds: text, a number, or a parsed formula
//! - [`Cell`] - Raw contents plus the result of the cell's last evaluation
//! - [`CellLookup`] - Read-only view of a cell store, used by the evaluator

use std::collections::HashMap;
use std::collections::HashSet;

use tracing::error;

use super::cell_id::CellId;
use super::eval::evaluate;
use super::expr::Expr;
use super::format::format_number;
use super::parser::parse_formula;
use crate::error::{CellError, EvalError};

/// Character that marks cell contents as a formula.
pub const FORMULA_MARKER: char = '=';

/// Shown instead of a value for formula cells in error.
pub const ERROR_MARKER: &str = "ERROR";

/// The type of content stored in a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellType {
    Text,
    Number(f64),
    Formula(Expr),
}

/// A single cell: trimmed contents, classification and cached value.
///
/// `value` is present exactly when the cell is a number, or a formula whose
/// last evaluation succeeded. `error` is only ever set on formula cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    contents: String,
    kind: CellType,
    value: Option<f64>,
    error: Option<EvalError>,
}

/// Read-only access to the cells a formula may reference.
pub trait CellLookup {
    fn lookup(&self, id: &CellId) -> Option<&Cell>;
}

impl CellLookup for HashMap<CellId, Cell> {
    fn lookup(&self, id: &CellId) -> Option<&Cell> {
        self.get(id)
    }
}

impl Cell {
    pub fn new_text(text: &str) -> Cell {
        Cell {
            contents: text.trim().to_string(),
            kind: CellType::Text,
            value: None,
            error: None,
        }
    }

    pub fn new_number(contents: &str, n: f64) -> Cell {
        Cell {
            contents: contents.trim().to_string(),
            kind: CellType::Number(n),
            value: Some(n),
            error: None,
        }
    }

    /// Create a formula cell from an already-built expression tree.
    /// The cell stays in error until it is first evaluated.
    pub fn new_formula(contents: &str, expr: Expr) -> Cell {
        Cell {
            contents: contents.trim().to_string(),
            kind: CellType::Formula(expr),
            value: None,
            error: Some(EvalError::NotEvaluated),
        }
    }

    /// Classify user input and build the matching cell.
    /// - Empty string or whitespace -> `InvalidInput`
    /// - Contains `=` -> Formula (parsed, not yet evaluated)
    /// - Valid number -> Number
    /// - Otherwise -> Text
    pub fn from_input(input: &str) -> Result<Cell, CellError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CellError::InvalidInput);
        }

        if trimmed.contains(FORMULA_MARKER) {
            let expr = parse_formula(trimmed)?;
            return Ok(Cell::new_formula(trimmed, expr));
        }

        if let Some(n) = parse_number(trimmed) {
            return Ok(Cell::new_number(trimmed, n));
        }

        Ok(Cell::new_text(trimmed))
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn kind(&self) -> &CellType {
        &self.kind
    }

    pub fn is_formula(&self) -> bool {
        matches!(self.kind, CellType::Formula(_))
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&EvalError> {
        self.error.as_ref()
    }

    /// Numeric value, if the cell has one. Text and errored formulas have none.
    pub fn number_value(&self) -> Option<f64> {
        self.value
    }

    /// Cells this cell's formula reads. Empty for text and number cells.
    pub fn references(&self) -> HashSet<CellId> {
        match &self.kind {
            CellType::Formula(expr) => expr.references(),
            _ => HashSet::new(),
        }
    }

    /// Evaluate the formula against `cells` without touching this cell.
    /// Returns `None` for text and number cells, which have nothing to compute.
    pub fn evaluate<L: CellLookup + ?Sized>(&self, cells: &L) -> Option<Result<f64, EvalError>> {
        match &self.kind {
            CellType::Formula(expr) => Some(evaluate(expr, cells)),
            _ => None,
        }
    }

    /// Store an evaluation result: a value clears the error, an error clears the value.
    pub fn apply(&mut self, result: Result<f64, EvalError>) {
        match result {
            Ok(n) => {
                self.value = Some(n);
                self.error = None;
            }
            Err(e) => {
                if let EvalError::Internal(_) = e {
                    error!(contents = %self.contents, "{}", e);
                }
                self.value = None;
                self.error = Some(e);
            }
        }
    }

    /// Re-evaluate a formula cell in place. No-op for text and number cells.
    pub fn update_value<L: CellLookup + ?Sized>(&mut self, cells: &L) {
        if let Some(result) = self.evaluate(cells) {
            self.apply(result);
        }
    }

    /// Produce the string shown for this cell's value.
    pub fn display_string(&self) -> String {
        match (&self.kind, self.value) {
            (CellType::Text, _) => self.contents.clone(),
            (_, Some(n)) if self.error.is_none() => format_number(n),
            _ => ERROR_MARKER.to_string(),
        }
    }
}

/// Numbers are finite decimal text; words such as `inf` or `NaN` stay text.
fn parse_number(text: &str) -> Option<f64> {
    if text
        .chars()
        .any(|c| c.is_alphabetic() && !matches!(c, 'e' | 'E'))
    {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}
