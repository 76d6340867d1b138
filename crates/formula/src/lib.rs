//! Formula language component consumed by the spreadsheet engine.
//!
//! Turns formula text (the part after the leading `=`) into an evaluable
//! [`Formula`]: arithmetic over numeric literals and A1-style cell
//! references. The engine drives it through three seams: canonical text,
//! the raw referenced-position list, and evaluation against a
//! [`CellValueResolver`].

pub mod eval;
pub mod parser;

use cellgrid_core::{FormulaError, Position};

pub use eval::CellValueResolver;
use parser::Expr;

/// Formula text that failed to parse.
///
/// Rejecting the edit is the caller's job; the sheet stays untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

/// A parsed, evaluable formula expression.
#[derive(Debug, Clone)]
pub struct Formula {
    ast: Expr,
    refs: Vec<Position>,
}

/// Parse formula text (without the leading `=`) into a [`Formula`].
pub fn parse(text: &str) -> Result<Formula, ParseError> {
    let ast = parser::parse(text)?;
    let mut refs = Vec::new();
    collect_refs(&ast, &mut refs);
    Ok(Formula { ast, refs })
}

impl Formula {
    /// Canonical printed form: normalized whitespace, minimal parentheses.
    /// May differ from the originally typed text.
    pub fn expression(&self) -> String {
        let mut out = String::new();
        self.ast.write_canonical(&mut out);
        out
    }

    /// Every cell reference in the expression, in source order.
    ///
    /// May contain duplicates and invalid positions; filtering,
    /// deduplication and ordering are the consumer's responsibility.
    pub fn referenced_cells(&self) -> &[Position] {
        &self.refs
    }

    /// Evaluate against a cell-lookup capability.
    ///
    /// Resolver failures and arithmetic failures surface as the same
    /// [`FormulaError`] channel.
    pub fn evaluate(&self, cells: &dyn CellValueResolver) -> Result<f64, FormulaError> {
        self.ast.eval(cells)
    }
}

fn collect_refs(expr: &Expr, refs: &mut Vec<Position>) {
    match expr {
        Expr::Number(_) => {}
        Expr::CellRef(pos) => refs.push(*pos),
        Expr::Unary { operand, .. } => collect_refs(operand, refs),
        Expr::Binary { left, right, .. } => {
            collect_refs(left, refs);
            collect_refs(right, refs);
        }
    }
}
