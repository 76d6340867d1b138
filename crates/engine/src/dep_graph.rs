//! Dependency graph between cells.
//!
//! Tracks references (positions a formula reads from) and dependents
//! (cells that read from a given position) for cycle checks and cache
//! invalidation.
//!
//! # Edge Direction
//!
//! ```text
//! A → B  means  "B depends on A"  (A is referenced by B)
//! ```
//!
//! Nodes are `Position` handles into the sheet's cell store, never
//! references to cells: a cleared cell leaves no dangling edge, only a
//! position that resolves to "no cell" on the next lookup.

use rustc_hash::{FxHashMap, FxHashSet};

use cellgrid_core::Position;

/// Bidirectional adjacency over formula references.
///
/// # Invariants
///
/// 1. **Bidirectional consistency:** if A ∈ preds[B] then B ∈ succs[A],
///    and vice versa.
/// 2. **No dangling entries:** empty sets are removed, not stored.
/// 3. **No duplicate edges:** set semantics enforced by `FxHashSet`.
/// 4. **Atomic updates:** `replace_edges` is the only mutator that touches
///    both maps.
#[derive(Default, Debug, Clone)]
pub struct DepGraph {
    /// For each formula cell B, the positions it reads from. B -> {A1, A2, ...}
    preds: FxHashMap<Position, FxHashSet<Position>>,

    /// For each referenced position A, the cells that read it. A -> {B1, B2, ...}
    succs: FxHashMap<Position, FxHashSet<Position>>,
}

impl DepGraph {
    /// Create an empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions this cell currently reads from (forward edges).
    pub fn references(&self, cell: Position) -> impl Iterator<Item = Position> + '_ {
        self.preds
            .get(&cell)
            .into_iter()
            .flat_map(|s| s.iter().copied())
    }

    /// Cells that currently read from this position (back edges).
    pub fn dependents(&self, cell: Position) -> impl Iterator<Item = Position> + '_ {
        self.succs
            .get(&cell)
            .into_iter()
            .flat_map(|s| s.iter().copied())
    }

    /// True iff at least one cell references this position.
    pub fn is_referenced(&self, cell: Position) -> bool {
        self.succs.contains_key(&cell)
    }

    /// Replace all forward edges for a cell atomically.
    ///
    /// Removes the cell from all its old targets' dependent sets, then
    /// installs the new reference set. Pass an empty set to unlink the cell
    /// entirely (content cleared or replaced by a non-formula).
    pub fn replace_edges(&mut self, cell: Position, new_refs: FxHashSet<Position>) {
        if let Some(old_refs) = self.preds.remove(&cell) {
            for target in old_refs {
                if let Some(deps) = self.succs.get_mut(&target) {
                    deps.remove(&cell);
                    if deps.is_empty() {
                        self.succs.remove(&target);
                    }
                }
            }
        }

        if new_refs.is_empty() {
            return;
        }

        for target in &new_refs {
            self.succs.entry(*target).or_default().insert(cell);
        }
        self.preds.insert(cell, new_refs);
    }

    /// Unlink a cell's forward edges (cell cleared).
    ///
    /// Back edges pointing *at* the position are kept: the cells holding
    /// them still reference it, and their lookups resolve to "no cell".
    pub fn remove_cell(&mut self, cell: Position) {
        self.replace_edges(cell, FxHashSet::default());
    }

    /// Would giving `cell` the reference set `candidate_refs` close a cycle?
    ///
    /// Walks dependents edges outward from `cell` (the cell itself
    /// included), visiting each node at most once. If any visited cell is
    /// one of the candidate references, committing the edit would let the
    /// cell (transitively) read from something that reads from it.
    ///
    /// Pure query against the *current* graph; runs before any mutation.
    pub fn would_create_cycle(
        &self,
        cell: Position,
        candidate_refs: &FxHashSet<Position>,
    ) -> bool {
        if candidate_refs.is_empty() {
            return false;
        }

        let mut visited: FxHashSet<Position> = FxHashSet::default();
        let mut to_visit = vec![cell];

        while let Some(current) = to_visit.pop() {
            if !visited.insert(current) {
                continue;
            }
            if candidate_refs.contains(&current) {
                return true;
            }
            for dependent in self.dependents(current) {
                if !visited.contains(&dependent) {
                    to_visit.push(dependent);
                }
            }
        }

        false
    }
}
