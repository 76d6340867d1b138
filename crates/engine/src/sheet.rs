//! The sheet: sparse cell store plus the content-replacement protocol.
//!
//! The sheet owns every cell and is the only mutator of the dependency
//! graph. A write runs: classify/parse, cycle check against the current
//! graph, edge swap, placeholder materialization, commit, invalidation
//! cascade. Structural failures (bad position, bad syntax, cycle) abort
//! with the sheet byte-for-byte unchanged.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use cellgrid_core::{FormulaError, Position, Size, Value};

use crate::cell::Cell;
use crate::dep_graph::DepGraph;
use crate::error::SheetError;

/// Sparse map from position to cell, created lazily on first write.
///
/// No entry means a logically empty cell with no identity: it cannot be a
/// dependency target until a formula referencing it materializes it.
#[derive(Default, Debug)]
pub struct Sheet {
    cells: FxHashMap<Position, Cell>,
    deps: DepGraph,
}

/// Read-only view of one cell plus the sheet context needed to evaluate it.
pub struct CellRef<'a> {
    sheet: &'a Sheet,
    pos: Position,
    cell: &'a Cell,
}

impl<'a> CellRef<'a> {
    pub fn position(&self) -> Position {
        self.pos
    }

    /// The computed value. Never fails: formula evaluation errors come back
    /// as [`Value::Error`].
    pub fn value(&self) -> Value {
        self.cell.value(self.sheet)
    }

    /// The stored text (canonical form for formulas, verbatim otherwise).
    pub fn text(&self) -> String {
        self.cell.text()
    }

    /// Positions this cell reads from: ascending, deduplicated, valid only.
    pub fn referenced_cells(&self) -> &'a [Position] {
        self.cell.referenced_cells()
    }

    /// True iff some other cell currently references this one. Used to
    /// decide whether a clear has side effects on others.
    pub fn is_referenced(&self) -> bool {
        self.sheet.deps.is_referenced(self.pos)
    }
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content at `pos` with classified `text`.
    ///
    /// The sole entry point that can introduce graph edges. Order matters:
    ///
    /// 1. parse the candidate content (`FormulaParse` aborts, nothing
    ///    touched);
    /// 2. cycle check against the *existing* graph (`CircularDependency`
    ///    aborts, nothing touched);
    /// 3. swap edges atomically, materialize newly referenced positions as
    ///    empty cells, commit the content;
    /// 4. invalidate this cell and cascade over its dependents.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<(), SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition(pos));
        }

        let cell = Cell::from_input(text)?;

        let new_refs: FxHashSet<Position> =
            cell.referenced_cells().iter().copied().collect();
        if self.deps.would_create_cycle(pos, &new_refs) {
            return Err(SheetError::CircularDependency);
        }

        self.deps.replace_edges(pos, new_refs);
        for &target in cell.referenced_cells() {
            self.cells.entry(target).or_insert_with(Cell::empty);
        }
        self.cells.insert(pos, cell);

        self.invalidate_from(pos);
        Ok(())
    }

    /// Remove the cell at `pos`. No-op if it was never materialized.
    ///
    /// Unlinks the cell's forward edges; back edges pointing at `pos` stay
    /// in the graph, and the holders' lookups resolve to "no cell"
    /// (operand 0) from now on — which is why the invalidation cascade
    /// still runs over the dependents.
    pub fn clear_cell(&mut self, pos: Position) -> Result<(), SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition(pos));
        }
        if self.cells.remove(&pos).is_some() {
            self.deps.remove_cell(pos);
            self.invalidate_from(pos);
        }
        Ok(())
    }

    /// Look up the cell at `pos`. `Ok(None)` for an unmaterialized cell.
    pub fn cell(&self, pos: Position) -> Result<Option<CellRef<'_>>, SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition(pos));
        }
        Ok(self
            .cells
            .get(&pos)
            .map(|cell| CellRef { sheet: self, pos, cell }))
    }

    /// Smallest bounding box over cells with non-empty *text*;
    /// `{0, 0}` when there are none.
    pub fn printable_size(&self) -> Size {
        let mut size = Size::default();
        for (pos, cell) in &self.cells {
            if !cell.text().is_empty() {
                size.rows = size.rows.max(pos.row + 1);
                size.cols = size.cols.max(pos.col + 1);
            }
        }
        size
    }

    /// Render computed values over the printable area, row-major,
    /// tab-separated. Absent cells render as empty fields; evaluation
    /// errors render as their token.
    pub fn print_values(&self, out: &mut impl fmt::Write) -> fmt::Result {
        self.print_with(out, |cell| cell.value(self).to_string())
    }

    /// Render stored texts over the printable area, row-major,
    /// tab-separated.
    pub fn print_texts(&self, out: &mut impl fmt::Write) -> fmt::Result {
        self.print_with(out, Cell::text)
    }

    fn print_with(
        &self,
        out: &mut impl fmt::Write,
        render: impl Fn(&Cell) -> String,
    ) -> fmt::Result {
        let size = self.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    out.write_char('\t')?;
                }
                if let Some(cell) = self.cells.get(&Position::new(row, col)) {
                    out.write_str(&render(cell))?;
                }
            }
            out.write_char('\n')?;
        }
        Ok(())
    }

    /// Numeric operand for a position referenced inside a formula:
    ///
    /// - invalid position → `#REF!`;
    /// - no cell → 0;
    /// - numeric value → as is;
    /// - text value → strict full-string parse, empty string → 0,
    ///   otherwise `#VALUE!`;
    /// - errored value → that same error.
    pub(crate) fn operand(&self, pos: Position) -> Result<f64, FormulaError> {
        if !pos.is_valid() {
            return Err(FormulaError::Ref);
        }
        let Some(cell) = self.cells.get(&pos) else {
            return Ok(0.0);
        };
        match cell.value(self) {
            Value::Number(n) => Ok(n),
            Value::Text(s) if s.is_empty() => Ok(0.0),
            Value::Text(s) => s.parse().map_err(|_| FormulaError::Value),
            Value::Error(e) => Err(e),
        }
    }

    /// Invalidation cascade, run after a content change at `pos` or a clear.
    ///
    /// The changed cell's own cache is dropped unconditionally (new formula
    /// content starts uncomputed, so its validity says nothing about the
    /// dependents). Each dependent is then handled with the early stop: a
    /// valid cache is cleared and its own dependents enqueued; an invalid
    /// cache ends that branch, because the cascade that first cleared it
    /// already covered its entire downstream set. In a diamond a shared
    /// dependent is thus expanded at most once.
    fn invalidate_from(&self, pos: Position) {
        if let Some(cell) = self.cells.get(&pos) {
            cell.invalidate();
        }
        let mut to_visit: Vec<Position> = self.deps.dependents(pos).collect();
        while let Some(current) = to_visit.pop() {
            let Some(cell) = self.cells.get(&current) else {
                continue;
            };
            if !cell.is_cache_valid() {
                continue;
            }
            cell.invalidate();
            to_visit.extend(self.deps.dependents(current));
        }
    }
}
