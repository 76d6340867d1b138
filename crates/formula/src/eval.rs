// Formula evaluator - computes a numeric result for a parsed expression,
// resolving cell references through a caller-supplied lookup.

use cellgrid_core::{FormulaError, Position};

use crate::parser::{BinaryOp, Expr, UnaryOp};

/// Cell-lookup capability handed to [`Formula::evaluate`](crate::Formula::evaluate).
///
/// The resolver owns the coercion rules (absent cell, text-to-number,
/// error propagation); the evaluator only asks for a numeric operand.
pub trait CellValueResolver {
    fn cell_value(&self, pos: Position) -> Result<f64, FormulaError>;
}

impl<F> CellValueResolver for F
where
    F: Fn(Position) -> Result<f64, FormulaError>,
{
    fn cell_value(&self, pos: Position) -> Result<f64, FormulaError> {
        self(pos)
    }
}

impl Expr {
    pub(crate) fn eval(&self, cells: &dyn CellValueResolver) -> Result<f64, FormulaError> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::CellRef(pos) => cells.cell_value(*pos),
            Expr::Unary { op, operand } => {
                let v = operand.eval(cells)?;
                Ok(match op {
                    UnaryOp::Plus => v,
                    UnaryOp::Minus => -v,
                })
            }
            Expr::Binary { op, left, right } => {
                let l = left.eval(cells)?;
                let r = right.eval(cells)?;
                match op {
                    BinaryOp::Add => Ok(l + r),
                    BinaryOp::Sub => Ok(l - r),
                    BinaryOp::Mul => Ok(l * r),
                    BinaryOp::Div => {
                        let v = l / r;
                        if v.is_finite() {
                            Ok(v)
                        } else {
                            Err(FormulaError::Arithmetic)
                        }
                    }
                }
            }
        }
    }
}
