//! Formula evaluation.
//!
//! Walks an [`Expr`] bottom-up against a read-only [`CellLookup`]. The first
//! failing reference stops the whole evaluation: a missing or non-numeric
//! operand is never treated as zero.

use super::cell::CellLookup;
use super::expr::Expr;
use crate::error::EvalError;

/// Evaluate an expression tree to a number.
pub fn evaluate<L: CellLookup + ?Sized>(expr: &Expr, cells: &L) -> Result<f64, EvalError> {
    match expr {
        Expr::Number(n) if n.is_nan() => Err(EvalError::Internal(
            "NaN literal in formula tree".to_string(),
        )),
        Expr::Number(n) => Ok(*n),
        Expr::Reference(id) => {
            let cell = cells
                .lookup(id)
                .ok_or_else(|| EvalError::UnresolvedReference(id.clone()))?;
            cell.number_value()
                .ok_or_else(|| EvalError::NonNumericReference(id.clone()))
        }
        Expr::Negate(operand) => Ok(-evaluate(operand, cells)?),
        Expr::Binary { op, left, right } => {
            let left = evaluate(left, cells)?;
            let right = evaluate(right, cells)?;
            Ok(op.apply(left, right))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Cell, CellId, parse_formula};
    use std::collections::HashMap;

    fn id(name: &str) -> CellId {
        CellId::parse(name).unwrap()
    }

    fn sheet(entries: &[(&str, &str)]) -> HashMap<CellId, Cell> {
        let mut cells = HashMap::new();
        for (name, input) in entries {
            let mut cell = Cell::from_input(input).unwrap();
            cell.update_value(&cells);
            cells.insert(id(name), cell);
        }
        cells
    }

    fn eval(formula: &str, cells: &HashMap<CellId, Cell>) -> Result<f64, EvalError> {
        evaluate(&parse_formula(formula).unwrap(), cells)
    }

    #[test]
    fn test_arithmetic() {
        let cells = HashMap::new();
        assert_eq!(eval("=1 + 2 * 3", &cells), Ok(7.0));
        assert_eq!(eval("=(1 + 2) * 3", &cells), Ok(9.0));
        assert_eq!(eval("=10 / 4 - 1", &cells), Ok(1.5));
        assert_eq!(eval("=-(2 - 5)", &cells), Ok(3.0));
    }

    #[test]
    fn test_division_by_zero_follows_float_semantics() {
        let cells = HashMap::new();
        assert_eq!(eval("=1 / 0", &cells), Ok(f64::INFINITY));
        assert_eq!(eval("=-1 / 0", &cells), Ok(f64::NEG_INFINITY));
        assert!(eval("=0 / 0", &cells).unwrap().is_nan());
    }

    #[test]
    fn test_references() {
        let cells = sheet(&[("A1", "5"), ("B1", "=A1 + 1")]);
        assert_eq!(eval("=A1 * B1", &cells), Ok(30.0));
    }

    #[test]
    fn test_unresolved_reference() {
        let cells = sheet(&[("A1", "5")]);
        assert_eq!(
            eval("=A1 + Z9", &cells),
            Err(EvalError::UnresolvedReference(id("Z9")))
        );
    }

    #[test]
    fn test_non_numeric_reference() {
        let cells = sheet(&[("A1", "hello"), ("B1", "=C1")]);
        assert_eq!(
            eval("=A1 + 1", &cells),
            Err(EvalError::NonNumericReference(id("A1")))
        );
        // B1 is a formula stuck in error, so it has no value either.
        assert_eq!(
            eval("=B1 * 0", &cells),
            Err(EvalError::NonNumericReference(id("B1")))
        );
    }

    #[test]
    fn test_first_error_stops_evaluation() {
        let cells = sheet(&[("A1", "hello")]);
        // The left operand fails first; the right one is never looked at.
        assert_eq!(
            eval("=A1 + Q7", &cells),
            Err(EvalError::NonNumericReference(id("A1")))
        );
    }

    #[test]
    fn test_nan_literal_is_internal_error() {
        let cells: HashMap<CellId, Cell> = HashMap::new();
        let expr = Expr::negate(Expr::Number(f64::NAN));
        assert!(matches!(
            evaluate(&expr, &cells),
            Err(EvalError::Internal(_))
        ));
    }
}
