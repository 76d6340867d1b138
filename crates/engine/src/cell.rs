//! Cell content and memoized formula results.
//!
//! Content is a tagged variant with exactly three behaviors (value, text,
//! references, cache validity, invalidation). Cells hold no references to
//! the sheet or to each other; anything that needs other cells receives
//! the [`Sheet`] explicitly.

use std::cell::RefCell;

use cellgrid_core::{FormulaError, Position, Value};
use cellgrid_formula::{Formula, ParseError};

use crate::sheet::Sheet;

/// First character marking formula input.
pub const FORMULA_MARKER: char = '=';

/// Leading character stripped from a text cell's *value* but kept verbatim
/// in its text.
pub const ESCAPE_MARKER: char = '\'';

type EvalResult = Result<f64, FormulaError>;

/// One grid slot's content: empty, literal text, or a formula.
#[derive(Debug)]
enum CellContent {
    Empty,
    Text(String),
    Formula {
        formula: Formula,
        /// Deduplicated, validity-filtered reference list in ascending
        /// position order. Computed once at construction.
        refs: Vec<Position>,
        /// Memoized evaluation result. `None` means "not computed since
        /// the last invalidation".
        cache: RefCell<Option<EvalResult>>,
    },
}

/// A cell owned by the sheet's store.
#[derive(Debug)]
pub struct Cell {
    content: CellContent,
}

impl Cell {
    pub(crate) fn empty() -> Self {
        Cell {
            content: CellContent::Empty,
        }
    }

    /// Classify raw input and build the content.
    ///
    /// Empty input is an empty cell; `=` followed by anything parses the
    /// remainder as a formula (a lone `=` stays text); everything else is
    /// literal text. A parse failure rejects the whole edit.
    pub(crate) fn from_input(text: &str) -> Result<Self, ParseError> {
        let content = if text.is_empty() {
            CellContent::Empty
        } else if text.starts_with(FORMULA_MARKER) && text.len() > 1 {
            let formula = cellgrid_formula::parse(&text[1..])?;
            let mut refs: Vec<Position> = formula
                .referenced_cells()
                .iter()
                .copied()
                .filter(|p| p.is_valid())
                .collect();
            refs.sort();
            refs.dedup();
            CellContent::Formula {
                formula,
                refs,
                cache: RefCell::new(None),
            }
        } else {
            CellContent::Text(text.to_string())
        };
        Ok(Cell { content })
    }

    /// The stored text: empty for empty cells, verbatim for text cells,
    /// `=` plus the canonical expression for formula cells.
    pub fn text(&self) -> String {
        match &self.content {
            CellContent::Empty => String::new(),
            CellContent::Text(s) => s.clone(),
            CellContent::Formula { formula, .. } => {
                format!("{}{}", FORMULA_MARKER, formula.expression())
            }
        }
    }

    /// The computed value. For formulas this evaluates on first call after
    /// an invalidation and memoizes the result, error or not; it never
    /// fails outward.
    pub(crate) fn value(&self, sheet: &Sheet) -> Value {
        match &self.content {
            CellContent::Empty => Value::Text(String::new()),
            CellContent::Text(s) => match s.strip_prefix(ESCAPE_MARKER) {
                Some(rest) => Value::Text(rest.to_string()),
                None => Value::Text(s.clone()),
            },
            CellContent::Formula { formula, cache, .. } => {
                // Copy the cached state out before evaluating: evaluation
                // recurses through the sheet and must not run while this
                // cell's cache is borrowed.
                let cached: Option<EvalResult> = *cache.borrow();
                let result = match cached {
                    Some(res) => res,
                    None => {
                        let res = formula.evaluate(&|pos: Position| sheet.operand(pos));
                        *cache.borrow_mut() = Some(res);
                        res
                    }
                };
                match result {
                    Ok(n) => Value::Number(n),
                    Err(e) => Value::Error(e),
                }
            }
        }
    }

    /// Positions this cell's content reads from: ascending, deduplicated,
    /// valid positions only. Empty for non-formula content.
    pub fn referenced_cells(&self) -> &[Position] {
        match &self.content {
            CellContent::Formula { refs, .. } => refs,
            _ => &[],
        }
    }

    /// Whether the memoized result is current. Empty and text content has
    /// nothing to recompute and always reports true.
    pub(crate) fn is_cache_valid(&self) -> bool {
        match &self.content {
            CellContent::Formula { cache, .. } => cache.borrow().is_some(),
            _ => true,
        }
    }

    /// Drop the memoized result. No-op for non-formula content.
    pub(crate) fn invalidate(&self) {
        if let CellContent::Formula { cache, .. } = &self.content {
            cache.borrow_mut().take();
        }
    }
}
