//! Reactive cell engine API.
//!
//! This module provides the building blocks of the spreadsheet:
//!
//! - [`CellId`] - Identifier parsing and ordering (`A1`, `AB42`)
//! - [`Expr`], [`BinaryOp`] - Formula expression tree
//! - [`parse_formula`] - Turn formula text into an [`Expr`]
//! - [`Cell`], [`CellType`], [`CellLookup`] - Cell contents and cached values
//! - [`evaluate`] - Evaluate an expression against a read-only cell store
//! - [`DepGraph`] - Upstream/downstream links with transactional cycle checks
//! - [`format_number`] - Format values for display

mod cell;
mod cell_id;
mod cycle;
mod eval;
mod expr;
mod format;
mod graph;
mod parser;

pub use cell::{Cell, CellLookup, CellType, ERROR_MARKER, FORMULA_MARKER};
pub use cell_id::CellId;
pub use eval::evaluate;
pub use expr::{BinaryOp, Expr};
pub use format::{format_id_list, format_number};
pub use graph::DepGraph;
pub use parser::{MAX_DEPTH, parse_formula};
