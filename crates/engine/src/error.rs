//! Errors raised by the sheet's mutating entry points.
//!
//! These are the *structural* failures: they abort the call with no partial
//! effect. Formula evaluation failures are not errors in this sense; they
//! are carried as [`Value::Error`](cellgrid_core::Value) cell values.

use cellgrid_core::Position;
use cellgrid_formula::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum SheetError {
    /// Coordinate outside the sheet bounds. Raised by sheet entry points,
    /// never by graph internals.
    InvalidPosition(Position),
    /// The edit would close a reference cycle; nothing was committed.
    CircularDependency,
    /// Malformed formula text; nothing was committed.
    FormulaParse(ParseError),
}

impl std::fmt::Display for SheetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetError::InvalidPosition(pos) => {
                write!(f, "invalid position ({}, {})", pos.row, pos.col)
            }
            SheetError::CircularDependency => write!(f, "circular dependency"),
            SheetError::FormulaParse(e) => write!(f, "formula parse error: {e}"),
        }
    }
}

impl std::error::Error for SheetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SheetError::FormulaParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for SheetError {
    fn from(e: ParseError) -> Self {
        SheetError::FormulaParse(e)
    }
}
