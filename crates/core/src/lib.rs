pub mod position;
pub mod value;

pub use position::{Position, Size, MAX_COLS, MAX_ROWS};
pub use value::{FormulaError, Value};
