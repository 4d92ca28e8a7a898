//! Formula expression tree.

use std::collections::HashSet;

use super::CellId;

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    /// Combine two operands with IEEE-754 semantics (`1 / 0` is `inf`).
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOp::Add => left + right,
            BinaryOp::Subtract => left - right,
            BinaryOp::Multiply => left * right,
            BinaryOp::Divide => left / right,
        }
    }
}

/// Formula expression tree, owned by the formula cell it was parsed for.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Number(f64),
    /// Reference to another cell's value
    Reference(CellId),
    /// Unary minus
    Negate(Box<Expr>),
    /// Binary arithmetic
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn negate(operand: Expr) -> Expr {
        Expr::Negate(Box::new(operand))
    }

    /// Every cell this expression reads, duplicates collapsed.
    pub fn references(&self) -> HashSet<CellId> {
        let mut refs = HashSet::new();
        self.collect_references(&mut refs);
        refs
    }

    fn collect_references(&self, refs: &mut HashSet<CellId>) {
        match self {
            Expr::Number(_) => {}
            Expr::Reference(id) => {
                refs.insert(id.clone());
            }
            Expr::Negate(operand) => operand.collect_references(refs),
            Expr::Binary { left, right, .. } => {
                left.collect_references(refs);
                right.collect_references(refs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(name: &str) -> Expr {
        Expr::Reference(CellId::parse(name).unwrap())
    }

    #[test]
    fn test_apply_uses_float_division() {
        assert_eq!(BinaryOp::Divide.apply(1.0, 0.0), f64::INFINITY);
        assert_eq!(BinaryOp::Divide.apply(-1.0, 0.0), f64::NEG_INFINITY);
        assert!(BinaryOp::Divide.apply(0.0, 0.0).is_nan());
        assert_eq!(BinaryOp::Subtract.apply(2.0, 5.0), -3.0);
    }

    #[test]
    fn test_references_collapse_duplicates() {
        // (A1 + B2) * -A1
        let expr = Expr::binary(
            BinaryOp::Multiply,
            Expr::binary(BinaryOp::Add, reference("A1"), reference("B2")),
            Expr::negate(reference("A1")),
        );
        let refs = expr.references();
        assert_eq!(refs.len(), 2);
        assert!(refs.contains(&CellId::parse("A1").unwrap()));
        assert!(refs.contains(&CellId::parse("B2").unwrap()));
    }

    #[test]
    fn test_references_finds_deeply_nested_refs() {
        // The left-hand reference sits two levels below a binary node.
        let expr = Expr::binary(
            BinaryOp::Add,
            Expr::negate(Expr::negate(reference("C3"))),
            Expr::Number(1.0),
        );
        assert_eq!(
            expr.references(),
            HashSet::from([CellId::parse("C3").unwrap()])
        );
    }

    #[test]
    fn test_literal_has_no_references() {
        assert!(Expr::Number(4.0).references().is_empty());
    }
}
