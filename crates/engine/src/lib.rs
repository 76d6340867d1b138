//! Spreadsheet recalculation core.
//!
//! A sparse grid of cells (text, numbers, formulas) with a live dependency
//! graph: edits that would close a reference cycle are rejected before
//! anything mutates, and formula results are memoized and invalidated
//! along the dependents chain when upstream cells change.

pub mod cell;
pub mod dep_graph;
pub mod error;
pub mod sheet;

pub use cellgrid_core::{FormulaError, Position, Size, Value};
pub use error::SheetError;
pub use sheet::{CellRef, Sheet};
