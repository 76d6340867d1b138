//! Computed cell values and formula evaluation errors.

use serde::{Deserialize, Serialize};

/// Category of formula evaluation failure.
///
/// Carried as a *value*, not an exception: an errored formula cell holds an
/// `Error` value, and formulas referencing it propagate the same category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormulaError {
    /// A reference points outside the sheet bounds.
    Ref,
    /// A referenced cell's text could not be coerced to a number.
    Value,
    /// Arithmetic failure, e.g. division by zero.
    Arithmetic,
}

impl FormulaError {
    /// Short display token rendered in place of a number.
    pub fn as_token(&self) -> &'static str {
        match self {
            FormulaError::Ref => "#REF!",
            FormulaError::Value => "#VALUE!",
            FormulaError::Arithmetic => "#ARITHM!",
        }
    }
}

impl std::fmt::Display for FormulaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_token())
    }
}

impl std::error::Error for FormulaError {}

/// The computed value of a cell.
///
/// Empty and text cells hold `Text`; formula cells hold `Number` or, when
/// evaluation failed, `Error`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    Number(f64),
    Error(FormulaError),
}

impl Default for Value {
    fn default() -> Self {
        Value::Text(String::new())
    }
}

impl Value {
    /// Format a number the way it is printed in a grid: integral values
    /// without a fractional part, everything else in shortest form.
    pub fn format_number(n: f64) -> String {
        if n.fract() == 0.0 && n.abs() < 1e15 {
            format!("{}", n as i64)
        } else {
            format!("{}", n)
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => f.write_str(&Value::format_number(*n)),
            Value::Error(e) => f.write_str(e.as_token()),
        }
    }
}
