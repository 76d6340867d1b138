//! Cell coordinates and printable-area sizes.
//!
//! `Position` is the grid coordinate used everywhere in the engine: as the
//! sparse cell-store key, as the dependency-graph node handle, and in the
//! A1-style text form users type inside formulas.

use serde::{Deserialize, Serialize};

/// Exclusive upper bound on row indices.
pub const MAX_ROWS: i32 = 16_384;

/// Exclusive upper bound on column indices.
pub const MAX_COLS: i32 = 16_384;

const LETTERS: i64 = 26;

/// Zero-based cell coordinate.
///
/// `Position::NONE` (`{-1, -1}`) is the sentinel for "no position": it is
/// what malformed A1 text parses to, and what an unresolvable reference
/// carries through the formula AST.
///
/// Ordering is row-major (row first, then column), which is the order
/// reference lists are reported in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Row index (0-based)
    pub row: i32,
    /// Column index (0-based)
    pub col: i32,
}

impl Position {
    /// Sentinel for absence or malformed input.
    pub const NONE: Position = Position { row: -1, col: -1 };

    /// Create a position from 0-based row/column indices.
    #[inline]
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns true if this position lies inside the sheet bounds.
    pub fn is_valid(&self) -> bool {
        (0..MAX_ROWS).contains(&self.row) && (0..MAX_COLS).contains(&self.col)
    }

    /// Render as A1-style text: bijective base-26 column letters followed by
    /// the 1-based row number (`A1`, `B12`, `AA100`).
    ///
    /// Returns an empty string for invalid positions. Never panics.
    pub fn to_a1(&self) -> String {
        if !self.is_valid() {
            return String::new();
        }

        let mut result = String::new();
        let mut n = self.col;
        loop {
            result.insert(0, (b'A' + (n % LETTERS as i32) as u8) as char);
            if n < LETTERS as i32 {
                break;
            }
            n = n / LETTERS as i32 - 1;
        }
        result.push_str(&(self.row + 1).to_string());
        result
    }

    /// Parse A1-style text back into a position.
    ///
    /// Total inverse of [`to_a1`](Self::to_a1) for all valid positions.
    /// Returns [`Position::NONE`] on any malformed input: empty letter run,
    /// lowercase or non-alphabetic letters, empty or non-digit row part,
    /// a row of zero, or numeric overflow. A well-formed string whose
    /// coordinates exceed the sheet bounds parses to the out-of-range
    /// (invalid) position rather than the sentinel.
    pub fn from_a1(s: &str) -> Position {
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(s.len());
        let (letters, digits) = s.split_at(split);

        if letters.is_empty() || digits.is_empty() {
            return Position::NONE;
        }

        let mut col: i64 = 0;
        for c in letters.chars() {
            if !c.is_ascii_uppercase() {
                return Position::NONE;
            }
            col = col * LETTERS + (c as i64 - 'A' as i64 + 1);
            if col > i32::MAX as i64 {
                return Position::NONE;
            }
        }

        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Position::NONE;
        }
        let row: i64 = match digits.parse() {
            Ok(n) => n,
            Err(_) => return Position::NONE,
        };
        if row < 1 || row > i32::MAX as i64 {
            return Position::NONE;
        }

        Position {
            row: (row - 1) as i32,
            col: (col - 1) as i32,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

/// Exclusive-upper-bound bounding box of the printable area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub rows: i32,
    pub cols: i32,
}

impl Size {
    /// Create a size from row/column counts.
    #[inline]
    pub fn new(rows: i32, cols: i32) -> Self {
        Self { rows, cols }
    }
}
