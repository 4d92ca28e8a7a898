//! Spreadsheet state and logic.

mod ops;
mod render;
mod state;

pub use state::Spreadsheet;
