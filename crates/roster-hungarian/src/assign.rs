// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Extraction of the final assignment from a fully covered table.
//!
//! Once the minimum cover of the zeros needs as many lines as there are
//! rows, a complete assignment along zero cells exists. `JobAssigner`
//! builds it in passes. A pass visits the unassigned rows in order and
//! gives each one the zero column, among the columns not yet taken, with
//! the lowest original cost (the first column on equal cost). Rows without
//! a free zero column wait for the next pass.
//!
//! A pass that places no row cannot be followed by a more successful one,
//! so the first waiting row is then placed by an augmenting path over the
//! zero edges, which may move rows placed earlier to other zero columns.
//! Every pass or repair places at least one row, so the loop ends after at
//! most `2 * rows` steps.
//!
//! On a table with more columns than rows, some columns had their costs
//! lowered while the covering loop ran. The result is only optimal if each
//! of them is assigned, so the assigner finally walks an alternating path
//! from every such column left free to a column that may stay free, and
//! shifts the rows along it.

use crate::{
    graph::ZeroEdges,
    matching::{AugmentFrame, Matching, augment_from_row, reset_bits},
    table::CostTable,
};
use fixedbitset::FixedBitSet;
use roster_core::num::cost::CostNumeric;
use std::collections::VecDeque;

/// The rows placed by a single greedy pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssignmentPass {
    /// The `(row, col)` pairs placed in this pass, in row order.
    pub picks: Vec<(usize, usize)>,
}

impl AssignmentPass {
    /// Returns the number of rows placed in this pass.
    #[inline]
    pub fn assigned(&self) -> usize {
        self.picks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }
}

/// Runs one greedy pass.
///
/// `assigned_cols` holds the columns already taken; it is read and
/// extended. Rows already matched in `matching` are skipped, and every pick
/// is recorded in both `matching` and `assigned_cols`.
pub fn assign_pass<T>(
    table: &CostTable<T>,
    original: &CostTable<T>,
    matching: &mut Matching,
    assigned_cols: &mut FixedBitSet,
) -> AssignmentPass
where
    T: CostNumeric,
{
    debug_assert_eq!(
        (table.num_rows(), table.num_cols()),
        (original.num_rows(), original.num_cols()),
        "called `assign_pass` with tables of different dimensions"
    );

    let mut pass = AssignmentPass::default();
    for row in 0..table.num_rows() {
        if matching.is_row_matched(row) {
            continue;
        }

        let mut best: Option<(usize, T)> = None;
        for (col, value) in table.allowed_in_row(row) {
            if value != T::zero() || assigned_cols.contains(col) {
                continue;
            }
            let cost = original.get(row, col);
            match best {
                Some((_, best_cost)) if best_cost <= cost => {}
                _ => best = Some((col, cost)),
            }
        }

        if let Some((col, _)) = best {
            assigned_cols.insert(col);
            matching.insert(row, col);
            pass.picks.push((row, col));
        }
    }
    pass
}

/// The outcome of `JobAssigner::assign`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobAssignment {
    /// The column assigned to every row.
    pub row_to_col: Vec<usize>,
    /// Number of greedy passes run.
    pub passes: u64,
    /// Number of rows placed by augmenting-path repair.
    pub augmentations: u64,
    /// Number of alternating paths run to place required columns.
    pub rebalances: u64,
}

/// Why the assigner could not complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stalled {
    /// No augmenting path could place this row.
    Row(usize),
    /// No alternating path could place this required column.
    Column(usize),
}

/// Repeats greedy passes, with augmenting-path repair, until every row is
/// assigned.
#[derive(Clone, Debug, Default)]
pub struct JobAssigner {
    matching: Matching,
    assigned_cols: FixedBitSet,
    visited_cols: FixedBitSet,
    stack: Vec<AugmentFrame>,
    /// Per column, the row that reached it and the column that row came from.
    via: Vec<Option<(usize, usize)>>,
    queue: VecDeque<usize>,
}

impl JobAssigner {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns every row of `table` to a distinct zero column, such that
    /// every column in `required` is taken.
    ///
    /// `edges` must be the zero edges of `table`. `on_pass` is called after
    /// every greedy pass with the number of rows placed and the number of
    /// rows still waiting.
    pub fn assign<T, F>(
        &mut self,
        table: &CostTable<T>,
        original: &CostTable<T>,
        edges: &ZeroEdges,
        required: &FixedBitSet,
        mut on_pass: F,
    ) -> Result<JobAssignment, Stalled>
    where
        T: CostNumeric,
        F: FnMut(usize, usize),
    {
        let num_rows = table.num_rows();
        let num_cols = table.num_cols();
        self.matching.reset(num_rows, num_cols);
        reset_bits(&mut self.assigned_cols, num_cols);

        let mut passes = 0u64;
        let mut augmentations = 0u64;

        while self.matching.len() < num_rows {
            let pass = assign_pass(table, original, &mut self.matching, &mut self.assigned_cols);
            passes = passes.saturating_add(1);
            on_pass(pass.assigned(), num_rows - self.matching.len());

            if !pass.is_empty() {
                continue;
            }

            let Some(row) = self.matching.first_free_row() else {
                break;
            };
            reset_bits(&mut self.visited_cols, num_cols);
            let (grew, _) = augment_from_row(
                row,
                edges,
                &mut self.matching,
                &mut self.visited_cols,
                &mut self.stack,
            );
            if !grew {
                return Err(Stalled::Row(row));
            }
            augmentations = augmentations.saturating_add(1);

            // The path may have moved rows to other columns.
            reset_bits(&mut self.assigned_cols, num_cols);
            for (_, col) in self.matching.pairs() {
                self.assigned_cols.insert(col);
            }
            log::trace!("job assigner: row {} placed by augmenting path", row);
        }

        let mut rebalances = 0u64;
        for col in required.ones().take_while(|&c| c < num_cols) {
            if self.matching.is_col_matched(col) {
                continue;
            }
            if !self.place_column(col, edges, required) {
                return Err(Stalled::Column(col));
            }
            rebalances = rebalances.saturating_add(1);
            log::trace!("job assigner: column {} placed by alternating path", col);
        }

        let mut row_to_col = Vec::with_capacity(num_rows);
        for row in 0..num_rows {
            match self.matching.mate_of_row(row) {
                Some(col) => row_to_col.push(col),
                None => return Err(Stalled::Row(row)),
            }
        }

        Ok(JobAssignment {
            row_to_col,
            passes,
            augmentations,
            rebalances,
        })
    }

    /// Moves rows along an alternating path from the free column `start` to
    /// a matched column outside `required`, which is released. Returns
    /// `false` if no such path exists.
    fn place_column(&mut self, start: usize, edges: &ZeroEdges, required: &FixedBitSet) -> bool {
        let num_cols = edges.num_cols();
        reset_bits(&mut self.visited_cols, num_cols);
        self.via.clear();
        self.via.resize(num_cols, None);
        self.queue.clear();

        self.visited_cols.insert(start);
        self.queue.push_back(start);

        while let Some(col) = self.queue.pop_front() {
            for &row in edges.col_neighbors(col) {
                let Some(mate) = self.matching.mate_of_row(row) else {
                    continue;
                };
                if mate == col || self.visited_cols.put(mate) {
                    continue;
                }
                self.via[mate] = Some((row, col));
                if required.contains(mate) {
                    self.queue.push_back(mate);
                    continue;
                }

                let mut path = Vec::new();
                let mut cur = mate;
                while let Some((row, prev)) = self.via[cur] {
                    path.push((row, prev));
                    cur = prev;
                }
                self.matching.shift(path, mate);
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[Vec<i64>]) -> CostTable<i64> {
        CostTable::from_rows(rows)
    }

    #[test]
    fn test_pass_prefers_lowest_original_cost() {
        let reduced = table(&[vec![0, 0, 0]]);
        let original = table(&[vec![5, 2, 2]]);
        let mut m = Matching::new(1, 3);
        let mut taken = FixedBitSet::with_capacity(3);
        let pass = assign_pass(&reduced, &original, &mut m, &mut taken);
        // Column 1 and 2 tie on cost 2; the first one wins.
        assert_eq!(pass.picks, vec![(0, 1)]);
        assert!(taken.contains(1));
    }

    #[test]
    fn test_pass_skips_taken_columns_and_assigned_rows() {
        let reduced = table(&[vec![0, 0], vec![0, 3], vec![0, 0]]);
        let original = reduced.clone();
        let mut m = Matching::new(3, 2);
        let mut taken = FixedBitSet::with_capacity(2);
        taken.insert(1);
        m.insert(0, 1);

        let pass = assign_pass(&reduced, &original, &mut m, &mut taken);
        assert_eq!(pass.picks, vec![(1, 0)]);
        assert_eq!(pass.assigned(), 1);
        // Row 2 has no free zero column left.
        assert!(!m.is_row_matched(2));
    }

    #[test]
    fn test_assign_all_zero_square_is_diagonal() {
        let reduced = table(&[vec![0, 0, 0], vec![0, 0, 0], vec![0, 0, 0]]);
        let original = table(&[vec![7, 7, 7], vec![7, 7, 7], vec![7, 7, 7]]);
        let edges = ZeroEdges::from_table(&reduced);
        let result = JobAssigner::new()
            .assign(&reduced, &original, &edges, &FixedBitSet::new(), |_, _| {})
            .unwrap();
        assert_eq!(result.row_to_col, vec![0, 1, 2]);
        assert_eq!(result.passes, 1);
        assert_eq!(result.augmentations, 0);
    }

    #[test]
    fn test_assign_repairs_greedy_dead_end() {
        // Row 0 prefers column 0 by original cost, which blocks row 1.
        let reduced = table(&[vec![0, 0], vec![0, 4]]);
        let original = table(&[vec![1, 9], vec![3, 8]]);
        let edges = ZeroEdges::from_table(&reduced);

        let mut calls = Vec::new();
        let result = JobAssigner::new()
            .assign(&reduced, &original, &edges, &FixedBitSet::new(), |placed, waiting| {
                calls.push((placed, waiting))
            })
            .unwrap();
        assert_eq!(result.row_to_col, vec![1, 0]);
        assert_eq!(result.augmentations, 1);
        assert_eq!(calls, vec![(1, 1), (0, 1)]);
    }

    #[test]
    fn test_assign_reports_stalled_row() {
        // Not fully coverable: both rows only have a zero in column 0.
        let reduced = table(&[vec![0, 1], vec![0, 2]]);
        let edges = ZeroEdges::from_table(&reduced);
        let res = JobAssigner::new().assign(&reduced, &reduced, &edges, &FixedBitSet::new(), |_, _| {});
        assert_eq!(res, Err(Stalled::Row(1)));
    }

    #[test]
    fn test_assign_skips_forbidden_zero() {
        let mut reduced = table(&[vec![0, 0]]);
        reduced.forbid(0, 0);
        let edges = ZeroEdges::from_table(&reduced);
        let result = JobAssigner::new()
            .assign(&reduced, &reduced, &edges, &FixedBitSet::new(), |_, _| {})
            .unwrap();
        assert_eq!(result.row_to_col, vec![1]);
    }

    #[test]
    fn test_assign_moves_rows_onto_required_columns() {
        // Greedy takes column 0 for row 0 and column 2 for row 1, leaving
        // the required column 1 free.
        let reduced = table(&[vec![0, 0, 4], vec![3, 0, 0]]);
        let original = table(&[vec![1, 5, 9], vec![9, 5, 1]]);
        let edges = ZeroEdges::from_table(&reduced);
        let mut required = FixedBitSet::with_capacity(3);
        required.insert(0);
        required.insert(1);

        let result = JobAssigner::new()
            .assign(&reduced, &original, &edges, &required, |_, _| {})
            .unwrap();
        assert_eq!(result.row_to_col, vec![0, 1]);
        assert_eq!(result.rebalances, 1);
        assert_eq!(result.augmentations, 0);
    }

    #[test]
    fn test_assign_follows_long_alternating_path() {
        // Column 2 can only be reached through row 1, whose column 1 is
        // required too, so row 0 has to give up column 0.
        let reduced = table(&[vec![0, 0, 5], vec![5, 0, 0]]);
        let original = table(&[vec![1, 2, 9], vec![9, 1, 2]]);
        let edges = ZeroEdges::from_table(&reduced);
        let mut required = FixedBitSet::with_capacity(3);
        required.insert(1);
        required.insert(2);

        let result = JobAssigner::new()
            .assign(&reduced, &original, &edges, &required, |_, _| {})
            .unwrap();
        // Greedy gave 0 -> 0 and 1 -> 1.
        assert_eq!(result.row_to_col, vec![1, 2]);
        assert_eq!(result.rebalances, 1);
    }

    #[test]
    fn test_assign_reports_unplaceable_required_column() {
        let reduced = table(&[vec![0, 3]]);
        let edges = ZeroEdges::from_table(&reduced);
        let mut required = FixedBitSet::with_capacity(2);
        required.insert(1);
        let res = JobAssigner::new().assign(&reduced, &reduced, &edges, &required, |_, _| {});
        assert_eq!(res, Err(Stalled::Column(1)));
    }
}
