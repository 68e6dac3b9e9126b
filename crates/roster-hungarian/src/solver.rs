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

//! # Hungarian Solver
//!
//! `HungarianSolver` finds a minimum-cost assignment of workers (rows) to
//! tasks (columns). Each call to `solve` runs:
//!
//! 1. **Feasibility gate**: more workers than tasks is infeasible, unless
//!    task padding is enabled, in which case zero-cost dummy tasks are
//!    appended and filtered out of the result. Fewer workers than tasks are
//!    solved on the rectangular table as is; only the exhaustive matcher
//!    pads such tables with dummy workers, within its size limit.
//! 2. **Reduction**: row minima are subtracted, then column minima unless
//!    the table is wider than tall.
//! 3. **Covering loop**: a maximum matching over the zero cells yields a
//!    minimum line cover. While it needs fewer lines than there are rows,
//!    the smallest uncovered value is subtracted from the uncovered cells
//!    and added to the doubly covered ones.
//! 4. **Extraction**: `JobAssigner` places every row on a distinct zero
//!    cell, preferring low original costs, and makes sure every column whose
//!    costs were lowered in step 3 is taken.
//!
//! Forbidden pairs behave as infinitely expensive cells. When the covering
//! lines hold every allowed cell but there are still fewer lines than rows,
//! no assignment avoids the forbidden pairs and the result is infeasible.
//! Costs that no longer fit the cost type while adjusting or summing the
//! total are reported as `SolveError::CostOverflow`.
//!
//! ## Usage
//!
//! ```rust
//! use roster_hungarian::solver::HungarianSolverBuilder;
//! use roster_model::matrix::CostMatrix;
//!
//! let matrix = CostMatrix::from_rows(&[vec![4i64, 1, 3], vec![2, 0, 5], vec![3, 2, 2]]).unwrap();
//! let mut solver = HungarianSolverBuilder::new().build();
//! let outcome = solver.solve(&matrix).unwrap();
//! let assignment = outcome.result().assignment().unwrap();
//! assert_eq!(assignment.total_cost(), 5);
//! ```

use crate::{
    assign::{JobAssigner, Stalled},
    cover::CoverFinder,
    error::SolveError,
    matching::MatchingStrategy,
    monitor::{
        no_op::NoOperationMonitor,
        solve_monitor::{SearchCommand, SolveMonitor},
    },
    reduce::{AdjustOverflow, adjust_costs, reduce},
    result::{SolverOutcome, SolverResult},
    stats::HungarianStatistics,
    table::CostTable,
};
use fixedbitset::FixedBitSet;
use roster_core::num::cost::CostNumeric;
use roster_model::{
    assignment::Assignment,
    index::{TaskIndex, WorkerIndex},
    matrix::CostMatrix,
};
use std::{borrow::Cow, cmp::Ordering, marker::PhantomData, time::Instant};

/// Default number of rows up to which `MatchingStrategy::Auto` backtracks.
pub const DEFAULT_BACKTRACKING_LIMIT: usize = 8;

/// How a run ended before the outcome is assembled.
enum RunEnd {
    Assigned(Vec<usize>),
    Infeasible,
    Aborted(String),
}

/// The Hungarian (Kuhn-Munkres) assignment solver.
#[derive(Debug)]
pub struct HungarianSolver<T> {
    iteration_limit: Option<usize>,
    backtracking_limit: usize,
    task_padding: bool,
    cover_finder: CoverFinder,
    assigner: JobAssigner,
    /// Columns covered during a cost adjustment of the current solve.
    lowered_cols: FixedBitSet,
    _marker: PhantomData<T>,
}

impl<T> Default for HungarianSolver<T>
where
    T: CostNumeric,
{
    fn default() -> Self {
        HungarianSolverBuilder::new().build()
    }
}

impl<T> HungarianSolver<T>
where
    T: CostNumeric,
{
    /// Creates a solver with the default configuration.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The strategy used to pick a matcher for the cover step.
    #[inline]
    pub fn matching_strategy(&self) -> MatchingStrategy {
        self.cover_finder.strategy()
    }

    /// The configured iteration limit, or `None` for the size-based default.
    #[inline]
    pub fn iteration_limit(&self) -> Option<usize> {
        self.iteration_limit
    }

    /// The largest table, in rows, the exhaustive matcher is used for.
    #[inline]
    pub fn backtracking_limit(&self) -> usize {
        self.backtracking_limit
    }

    /// Whether matrices with more workers than tasks get dummy tasks.
    #[inline]
    pub fn task_padding(&self) -> bool {
        self.task_padding
    }

    /// Solves the assignment problem for `matrix`.
    #[inline]
    pub fn solve(&mut self, matrix: &CostMatrix<T>) -> Result<SolverOutcome<T>, SolveError> {
        self.solve_with_monitor(matrix, &mut NoOperationMonitor::new())
    }

    /// Solves the assignment problem for `matrix`, reporting progress to
    /// `monitor` and stopping when it asks to.
    pub fn solve_with_monitor<M>(
        &mut self,
        matrix: &CostMatrix<T>,
        monitor: &mut M,
    ) -> Result<SolverOutcome<T>, SolveError>
    where
        M: SolveMonitor<T> + ?Sized,
    {
        let start_time = Instant::now();
        let mut statistics = HungarianStatistics::default();

        monitor.on_enter_solve(matrix, &statistics);
        let end = self.run(matrix, monitor, &mut statistics);
        statistics.set_total_time(start_time.elapsed());
        monitor.on_exit_solve(&statistics);

        let outcome = match end? {
            RunEnd::Infeasible => SolverOutcome::infeasible(statistics),
            RunEnd::Aborted(reason) => SolverOutcome::aborted(reason, statistics),
            RunEnd::Assigned(row_to_col) => {
                SolverOutcome::optimal(Self::build_assignment(matrix, &row_to_col)?, statistics)
            }
        };
        Ok(outcome)
    }

    fn run<M>(
        &mut self,
        matrix: &CostMatrix<T>,
        monitor: &mut M,
        statistics: &mut HungarianStatistics,
    ) -> Result<RunEnd, SolveError>
    where
        M: SolveMonitor<T> + ?Sized,
    {
        if matrix.num_workers() > matrix.num_tasks() && !self.task_padding {
            log::debug!(
                "{} workers but only {} tasks: infeasible",
                matrix.num_workers(),
                matrix.num_tasks()
            );
            return Ok(RunEnd::Infeasible);
        }

        let working = match matrix.num_workers().cmp(&matrix.num_tasks()) {
            Ordering::Greater => {
                Cow::Owned(matrix.with_dummy_tasks(matrix.num_workers() - matrix.num_tasks()))
            }
            Ordering::Less
                if self
                    .cover_finder
                    .uses_backtracking(matrix.num_workers(), matrix.num_tasks()) =>
            {
                Cow::Owned(matrix.with_dummy_workers(matrix.num_tasks() - matrix.num_workers()))
            }
            _ => Cow::Borrowed(matrix),
        };
        let n = working.num_workers();
        let num_cols = working.num_tasks();
        statistics.set_working_size(n, num_cols);

        if self.matching_strategy() == MatchingStrategy::Backtracking
            && n > self.backtracking_limit
        {
            return Err(SolveError::MatchingTooLarge {
                size: n,
                limit: self.backtracking_limit,
            });
        }

        let original = CostTable::from(working.as_ref());
        let mut table = original.clone();
        reduce(&mut table);
        monitor.on_reduced(&table, statistics);

        self.cover_finder.reset();
        self.lowered_cols.clear();
        self.lowered_cols.grow(num_cols);

        let limit = self
            .iteration_limit
            .unwrap_or_else(|| n.saturating_add(1).saturating_mul(n.saturating_add(1)));
        let mut iterations = 0usize;

        loop {
            if let SearchCommand::Terminate(reason) = monitor.search_command(statistics) {
                return Ok(RunEnd::Aborted(reason));
            }

            let report = self.cover_finder.find(&table);
            iterations += 1;
            statistics.on_cover_iteration(report.matcher_nodes);
            monitor.on_cover_found(self.cover_finder.cover(), n, statistics);

            if report.matching_size >= n {
                break;
            }

            let non_convergence = SolveError::NonConvergence {
                iterations,
                covering_lines: report.matching_size,
                required: n,
            };
            if iterations >= limit {
                return Err(non_convergence);
            }

            let cover = self.cover_finder.cover();
            match adjust_costs(&mut table, cover) {
                Ok(Some(delta)) if delta > T::zero() => {
                    self.lowered_cols.extend(cover.covered_cols());
                    statistics.on_cost_adjustment();
                    monitor.on_costs_adjusted(delta, statistics);
                }
                Ok(Some(_)) => return Err(non_convergence),
                Ok(None) => {
                    log::debug!(
                        "{} lines hold every allowed cell but {} rows need a task: infeasible",
                        report.matching_size,
                        n
                    );
                    return Ok(RunEnd::Infeasible);
                }
                Err(AdjustOverflow { row, col }) => {
                    return Err(SolveError::CostOverflow {
                        worker: WorkerIndex::new(row),
                        task: TaskIndex::new(col),
                    });
                }
            }
        }

        let job = self
            .assigner
            .assign(
                &table,
                &original,
                self.cover_finder.edges(),
                &self.lowered_cols,
                |assigned, remaining| {
                    statistics.on_assignment_pass();
                    monitor.on_assignment_pass(assigned, remaining, statistics);
                },
            )
            .map_err(|stalled| match stalled {
                Stalled::Row(row) => SolveError::AssignmentStalled {
                    worker: WorkerIndex::new(row),
                },
                Stalled::Column(col) => SolveError::TaskStalled {
                    task: TaskIndex::new(col),
                },
            })?;
        statistics.on_augmentations(job.augmentations);
        statistics.on_rebalances(job.rebalances);

        Ok(RunEnd::Assigned(job.row_to_col))
    }

    /// Maps the working-table assignment back onto `matrix`, dropping dummy
    /// workers and dummy tasks, and prices it.
    fn build_assignment(
        matrix: &CostMatrix<T>,
        row_to_col: &[usize],
    ) -> Result<Assignment<T>, SolveError> {
        let num_tasks = matrix.num_tasks();
        let tasks = row_to_col
            .iter()
            .take(matrix.num_workers())
            .map(|&col| {
                if col < num_tasks {
                    vec![TaskIndex::new(col)]
                } else {
                    Vec::new()
                }
            })
            .collect();

        Ok(Assignment::from_tasks(matrix, tasks)?)
    }
}

/// Builder for `HungarianSolver`.
#[derive(Debug, Clone)]
pub struct HungarianSolverBuilder<T> {
    strategy: MatchingStrategy,
    iteration_limit: Option<usize>,
    backtracking_limit: usize,
    task_padding: bool,
    _marker: PhantomData<T>,
}

impl<T> Default for HungarianSolverBuilder<T>
where
    T: CostNumeric,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HungarianSolverBuilder<T>
where
    T: CostNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            strategy: MatchingStrategy::Auto,
            iteration_limit: None,
            backtracking_limit: DEFAULT_BACKTRACKING_LIMIT,
            task_padding: false,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn with_matching_strategy(mut self, strategy: MatchingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Caps the number of cover computations. Defaults to `(n + 1) * (n + 1)`
    /// for a working table with `n` rows.
    #[inline]
    pub fn with_iteration_limit(mut self, limit: usize) -> Self {
        self.iteration_limit = Some(limit);
        self
    }

    /// Largest table (in rows) the backtracking matcher is used for.
    #[inline]
    pub fn with_backtracking_limit(mut self, limit: usize) -> Self {
        self.backtracking_limit = limit;
        self
    }

    /// Solve matrices with more workers than tasks by padding dummy tasks;
    /// workers matched to one end up with no task.
    #[inline]
    pub fn with_task_padding(mut self, enabled: bool) -> Self {
        self.task_padding = enabled;
        self
    }

    #[inline]
    pub fn build(self) -> HungarianSolver<T> {
        HungarianSolver {
            iteration_limit: self.iteration_limit,
            backtracking_limit: self.backtracking_limit,
            task_padding: self.task_padding,
            cover_finder: CoverFinder::new(self.strategy, self.backtracking_limit),
            assigner: JobAssigner::new(),
            lowered_cols: FixedBitSet::new(),
            _marker: PhantomData,
        }
    }
}

/// Solves the assignment problem for nested rows with the default solver.
///
/// Returns `SolverResult::Infeasible` when there are more rows than columns.
///
/// ```rust
/// use roster_hungarian::solver::solve;
///
/// let result = solve(&[vec![5u32]]).unwrap();
/// assert_eq!(result.assignment().unwrap().to_nested(), vec![vec![0]]);
///
/// let result = solve(&[vec![1u32, 2], vec![3, 4], vec![5, 6]]).unwrap();
/// assert!(result.is_infeasible());
/// ```
pub fn solve<T, R>(rows: &[R]) -> Result<SolverResult<T>, SolveError>
where
    T: CostNumeric,
    R: AsRef<[T]>,
{
    let matrix = CostMatrix::from_rows(rows)?;
    let outcome = HungarianSolver::new().solve(&matrix)?;
    Ok(outcome.into_result())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cover::CoveringSet,
        monitor::{composite::CompositeMonitor, log::LogMonitor, time_limit::TimeLimitMonitor},
        result::TerminationReason,
    };
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use roster_model::matrix::CostMatrixError;
    use std::time::Duration;

    /// Minimum total cost over all injective row-to-column maps.
    fn brute_force<T: CostNumeric>(rows: &[Vec<T>]) -> T {
        fn go<T: CostNumeric>(row: usize, rows: &[Vec<T>], used: &mut [bool], acc: T, best: &mut Option<T>) {
            if row == rows.len() {
                if best.is_none_or(|b| acc < b) {
                    *best = Some(acc);
                }
                return;
            }
            for c in 0..used.len() {
                if !used[c] {
                    used[c] = true;
                    go(row + 1, rows, used, acc + rows[row][c], best);
                    used[c] = false;
                }
            }
        }
        let mut best = None;
        go(0, rows, &mut vec![false; rows[0].len()], T::zero(), &mut best);
        best.unwrap()
    }

    fn assert_valid(assignment: &Assignment<impl CostNumeric>, num_workers: usize, num_tasks: usize) {
        assert_eq!(assignment.num_workers(), num_workers);
        let mut used = vec![false; num_tasks];
        for (_, t) in assignment.pairs() {
            assert!(!used[t.get()], "task {} assigned twice", t.get());
            used[t.get()] = true;
        }
    }

    fn solve_rows<T: CostNumeric>(rows: &[Vec<T>]) -> SolverOutcome<T> {
        let matrix = CostMatrix::from_rows(rows).unwrap();
        HungarianSolver::new().solve(&matrix).unwrap()
    }

    #[derive(Default)]
    struct CountingMonitor {
        entered: usize,
        reduced: usize,
        covers: usize,
        adjustments: usize,
        passes: usize,
        exited: usize,
    }

    impl SolveMonitor<i64> for CountingMonitor {
        fn name(&self) -> &str {
            "CountingMonitor"
        }
        fn on_enter_solve(&mut self, _m: &CostMatrix<i64>, _s: &HungarianStatistics) {
            self.entered += 1;
        }
        fn on_reduced(&mut self, _t: &CostTable<i64>, _s: &HungarianStatistics) {
            self.reduced += 1;
        }
        fn on_cover_found(&mut self, _c: &CoveringSet, _r: usize, _s: &HungarianStatistics) {
            self.covers += 1;
        }
        fn on_costs_adjusted(&mut self, delta: i64, _s: &HungarianStatistics) {
            assert!(delta > 0);
            self.adjustments += 1;
        }
        fn on_assignment_pass(&mut self, _a: usize, _r: usize, _s: &HungarianStatistics) {
            self.passes += 1;
        }
        fn on_exit_solve(&mut self, _s: &HungarianStatistics) {
            self.exited += 1;
        }
    }

    #[test]
    fn test_single_cell() {
        let outcome = solve_rows(&[vec![5i64]]);
        let assignment = outcome.result().assignment().unwrap();
        assert_eq!(assignment.to_nested(), vec![vec![0]]);
        assert_eq!(assignment.total_cost(), 5);
        assert_eq!(outcome.termination_reason(), &TerminationReason::OptimalityProven);
    }

    #[test]
    fn test_more_workers_than_tasks_is_infeasible() {
        let outcome = solve_rows(&[vec![1i64, 2], vec![3, 4], vec![5, 6]]);
        assert!(outcome.is_infeasible());
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::InfeasibilityProven
        );
        assert_eq!(outcome.statistics().cover_iterations, 0);
    }

    #[test]
    fn test_task_padding_solves_tall_matrix() {
        let matrix = CostMatrix::from_rows(&[vec![1i64], vec![2], vec![0]]).unwrap();
        let mut solver = HungarianSolverBuilder::new().with_task_padding(true).build();
        let outcome = solver.solve(&matrix).unwrap();
        let assignment = outcome.result().assignment().unwrap();
        assert_eq!(assignment.to_nested(), vec![vec![], vec![], vec![0]]);
        assert_eq!(assignment.total_cost(), 0);
    }

    #[test]
    fn test_uniform_costs_pick_diagonal() {
        let outcome = solve_rows(&[vec![7i64, 7, 7], vec![7, 7, 7], vec![7, 7, 7]]);
        let assignment = outcome.result().assignment().unwrap();
        assert_eq!(assignment.total_cost(), 21);
        assert_eq!(assignment.to_nested(), vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_reduced_matrix_converges_without_adjustment() {
        let outcome = solve_rows(&[vec![0i64, 0, 5], vec![3, 0, 2], vec![4, 5, 0]]);
        let assignment = outcome.result().assignment().unwrap();
        assert_eq!(assignment.total_cost(), 0);
        assert_eq!(assignment.to_nested(), vec![vec![0], vec![1], vec![2]]);
        assert_eq!(outcome.statistics().cost_adjustments, 0);
        assert_eq!(outcome.statistics().cover_iterations, 1);
    }

    #[test]
    fn test_wide_matrix_solved_without_padding() {
        let rows = vec![
            vec![2i64, 8, 5, 1, 9],
            vec![7, 3, 6, 4, 0],
            vec![1, 5, 9, 2, 7],
            vec![6, 0, 3, 8, 4],
        ];
        let outcome = solve_rows(&rows);
        assert_eq!(outcome.statistics().working_size, 4);
        assert_eq!(outcome.statistics().working_cols, 5);

        let assignment = outcome.result().assignment().unwrap();
        assert_valid(assignment, 4, 5);
        assert!(assignment.is_complete());
        assert_eq!(assignment.total_cost(), brute_force(&rows));
        assert_eq!(assignment.total_cost(), 2);
        assert_eq!(assignment.to_nested(), vec![vec![3], vec![4], vec![0], vec![1]]);
    }

    #[test]
    fn test_very_wide_matrix_keeps_its_row_count() {
        // Each worker has one cheap task far to the right.
        let num_tasks = 2000;
        let rows: Vec<Vec<i64>> = (0..3)
            .map(|w| {
                (0..num_tasks)
                    .map(|t| if t == 1000 + w { w as i64 } else { 100 + (t % 7) as i64 })
                    .collect()
            })
            .collect();

        let outcome = solve_rows(&rows);
        let stats = outcome.statistics();
        assert_eq!(stats.working_size, 3);
        assert_eq!(stats.working_cols, num_tasks);

        let assignment = outcome.result().assignment().unwrap();
        assert_eq!(assignment.to_nested(), vec![vec![1000], vec![1001], vec![1002]]);
        assert_eq!(assignment.total_cost(), 3);
    }

    #[test]
    fn test_wide_matrix_keeps_optimum() {
        let rows = vec![vec![0i64, 3, 1], vec![0, 9, 3]];
        let assignment = solve_rows(&rows).into_result().into_assignment().unwrap();
        assert_eq!(assignment.total_cost(), brute_force(&rows));
        assert_eq!(assignment.total_cost(), 1);
        assert_eq!(assignment.to_nested(), vec![vec![2], vec![0]]);
    }

    #[test]
    fn test_explicit_backtracking_pads_wide_matrix() {
        let rows = vec![vec![0i64, 3, 1], vec![0, 9, 3]];
        let matrix = CostMatrix::from_rows(&rows).unwrap();
        let mut solver = HungarianSolverBuilder::new()
            .with_matching_strategy(MatchingStrategy::Backtracking)
            .build();
        let outcome = solver.solve(&matrix).unwrap();
        assert_eq!(outcome.statistics().working_size, 3);
        assert_eq!(outcome.result().assignment().unwrap().total_cost(), 1);
    }

    #[test]
    fn test_random_wide_matrices_with_ties_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(314);
        let mut augmenting = HungarianSolverBuilder::new()
            .with_matching_strategy(MatchingStrategy::AugmentingPath)
            .build();
        for _ in 0..300 {
            let num_workers = rng.gen_range(1..=4);
            let num_tasks = rng.gen_range(num_workers + 1..=9);
            let max_cost = if rng.gen_bool(0.5) { 2 } else { 20 };
            let rows: Vec<Vec<u32>> = (0..num_workers)
                .map(|_| (0..num_tasks).map(|_| rng.gen_range(0..=max_cost)).collect())
                .collect();
            let matrix = CostMatrix::from_rows(&rows).unwrap();

            let outcome = augmenting.solve(&matrix).unwrap();
            assert_eq!(outcome.statistics().working_size, num_workers);
            let assignment = outcome.result().assignment().unwrap();
            assert_valid(assignment, num_workers, num_tasks);
            assert!(assignment.is_complete());
            assert_eq!(assignment.total_cost(), brute_force(&rows), "rows: {:?}", rows);
        }
    }

    #[test]
    fn test_large_finite_costs_are_assignable() {
        let outcome = solve_rows(&[vec![10_000_000i32]]);
        assert_eq!(outcome.result().assignment().unwrap().total_cost(), 10_000_000);

        let outcome = solve_rows(&[vec![2.0e6f32, 3.0e6], vec![3.0e6, 2.0e6]]);
        let assignment = outcome.result().assignment().unwrap();
        assert_eq!(assignment.to_nested(), vec![vec![0], vec![1]]);
        assert_eq!(assignment.total_cost(), 4.0e6);

        let outcome = solve_rows(&[vec![2.0e12f64]]);
        assert_eq!(outcome.result().assignment().unwrap().total_cost(), 2.0e12);

        let outcome = solve_rows(&[vec![u64::MAX - 1, u64::MAX], vec![u64::MAX, 1]]);
        assert_eq!(
            outcome.result().assignment().unwrap().total_cost(),
            u64::MAX
        );
    }

    #[test]
    fn test_total_cost_overflow_is_reported() {
        assert_eq!(
            solve(&vec![vec![8_000_000i32; 300]; 300]),
            Err(SolveError::CostOverflow {
                worker: WorkerIndex::new(268),
                task: TaskIndex::new(268)
            })
        );
    }

    #[test]
    fn test_adjustment_overflow_is_reported() {
        // The adjustment adds 8 to the doubly covered (2, 0).
        let max = i32::MAX;
        assert_eq!(
            solve(&[vec![0i32, 9, max], vec![0, 9, max], vec![max, 1, 0]]),
            Err(SolveError::CostOverflow {
                worker: WorkerIndex::new(2),
                task: TaskIndex::new(0)
            })
        );
    }

    #[test]
    fn test_adjustment_required() {
        let rows = vec![vec![1i64, 2, 3], vec![2, 4, 6], vec![3, 6, 9]];
        let mut monitor = CountingMonitor::default();
        let matrix = CostMatrix::from_rows(&rows).unwrap();
        let outcome = HungarianSolver::new()
            .solve_with_monitor(&matrix, &mut monitor)
            .unwrap();

        let assignment = outcome.result().assignment().unwrap();
        assert_eq!(assignment.total_cost(), 10);
        let stats = outcome.statistics();
        assert!(stats.cost_adjustments >= 1);
        assert_eq!(stats.cover_iterations, stats.cost_adjustments + 1);

        assert_eq!(monitor.entered, 1);
        assert_eq!(monitor.reduced, 1);
        assert_eq!(monitor.covers as u64, stats.cover_iterations);
        assert_eq!(monitor.adjustments as u64, stats.cost_adjustments);
        assert_eq!(monitor.passes as u64, stats.assignment_passes);
        assert_eq!(monitor.exited, 1);
    }

    #[test]
    fn test_iteration_limit_reports_non_convergence() {
        let matrix =
            CostMatrix::from_rows(&[vec![1i64, 2, 3], vec![2, 4, 6], vec![3, 6, 9]]).unwrap();
        let mut solver = HungarianSolverBuilder::new().with_iteration_limit(1).build();
        assert_eq!(solver.iteration_limit(), Some(1));
        assert_eq!(
            solver.solve(&matrix),
            Err(SolveError::NonConvergence {
                iterations: 1,
                covering_lines: 2,
                required: 3
            })
        );
    }

    #[test]
    fn test_explicit_backtracking_above_limit_is_rejected() {
        let matrix = CostMatrix::from_rows(&[vec![1i64, 2, 3], vec![3, 1, 2], vec![2, 3, 1]]).unwrap();
        let mut solver = HungarianSolverBuilder::new()
            .with_matching_strategy(MatchingStrategy::Backtracking)
            .with_backtracking_limit(2)
            .build();
        assert_eq!(
            solver.solve(&matrix),
            Err(SolveError::MatchingTooLarge { size: 3, limit: 2 })
        );
    }

    #[test]
    fn test_zero_time_limit_aborts() {
        let matrix = CostMatrix::from_rows(&[vec![1i64, 2], vec![2, 1]]).unwrap();
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO);
        let outcome = HungarianSolver::new()
            .solve_with_monitor(&matrix, &mut monitor)
            .unwrap();
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert!(matches!(
            outcome.termination_reason(),
            TerminationReason::Aborted(_)
        ));
    }

    #[test]
    fn test_composite_with_log_monitor_solves() {
        let _ = env_logger::builder().is_test(true).try_init();

        let matrix = CostMatrix::from_rows(&[vec![4i64, 1, 3], vec![2, 0, 5], vec![3, 2, 2]]).unwrap();
        let mut monitor = CompositeMonitor::<i64>::new();
        monitor.add_monitor(TimeLimitMonitor::new(Duration::from_secs(60)));
        monitor.add_monitor(LogMonitor::default());

        let outcome = HungarianSolver::new()
            .solve_with_monitor(&matrix, &mut monitor)
            .unwrap();
        assert_eq!(outcome.result().assignment().unwrap().total_cost(), 5);
    }

    #[test]
    fn test_forbidden_pairs_are_avoided() {
        let inf = f64::INFINITY;
        let outcome = solve_rows(&[vec![inf, 1.0], vec![1.0, inf]]);
        let assignment = outcome.result().assignment().unwrap();
        assert_eq!(assignment.to_nested(), vec![vec![1], vec![0]]);
        assert_eq!(assignment.total_cost(), 2.0);
    }

    #[test]
    fn test_unavoidable_forbidden_pair_is_infeasible() {
        let inf = f64::INFINITY;
        let outcome = solve_rows(&[vec![inf, inf], vec![1.0, 2.0]]);
        assert!(outcome.is_infeasible());
        assert_eq!(outcome.statistics().cost_adjustments, 0);
    }

    #[test]
    fn test_forbidden_pairs_next_to_large_costs() {
        let inf = f64::INFINITY;
        let outcome = solve_rows(&[vec![inf, 2.0e12, 5.0e12], vec![1.0e12, inf, 4.0e12]]);
        let assignment = outcome.result().assignment().unwrap();
        assert_eq!(assignment.to_nested(), vec![vec![1], vec![0]]);
        assert_eq!(assignment.total_cost(), 3.0e12);
    }

    #[test]
    fn test_builder_forbidden_pairs_decide_feasibility() {
        use roster_model::matrix::CostMatrixBuilder;

        let w = WorkerIndex::new;
        let t = TaskIndex::new;

        // Workers 0 and 1 may only take task 0.
        let mut b = CostMatrixBuilder::<u32>::new(3, 3);
        b.set_cost(w(0), t(0), 1)
            .set_cost(w(1), t(0), 2)
            .set_worker_costs(w(2), &[3, 4, 5]);
        let outcome = HungarianSolver::new().solve(&b.build().unwrap()).unwrap();
        assert!(outcome.is_infeasible());

        let mut b = CostMatrixBuilder::<u32>::new(2, 3);
        b.set_cost(w(0), t(2), u32::MAX - 10)
            .set_worker_costs(w(1), &[7, 1, 9])
            .forbid(w(1), t(1));
        let assignment = HungarianSolver::new()
            .solve(&b.build().unwrap())
            .unwrap()
            .into_result()
            .into_assignment()
            .unwrap();
        assert_eq!(assignment.to_nested(), vec![vec![2], vec![0]]);
        assert_eq!(assignment.total_cost(), u32::MAX - 3);
    }

    #[test]
    fn test_solve_function_validates_input() {
        assert_eq!(
            solve(&[vec![1i64, 2], vec![3]]),
            Err(SolveError::Matrix(CostMatrixError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            }))
        );
        assert_eq!(
            solve::<i64, Vec<i64>>(&[]),
            Err(SolveError::Matrix(CostMatrixError::Empty))
        );
        assert!(matches!(
            solve(&[vec![1.0, f64::NAN]]),
            Err(SolveError::Matrix(CostMatrixError::InvalidCost { .. }))
        ));
    }

    #[test]
    fn test_random_integer_matrices_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..300 {
            let num_workers = rng.gen_range(1..=6);
            let num_tasks = rng.gen_range(num_workers..=7);
            let max_cost = if rng.gen_bool(0.3) { 3 } else { 50 };
            let rows: Vec<Vec<i64>> = (0..num_workers)
                .map(|_| (0..num_tasks).map(|_| rng.gen_range(0..=max_cost)).collect())
                .collect();

            let outcome = solve_rows(&rows);
            let assignment = outcome.result().assignment().unwrap();
            assert_valid(assignment, num_workers, num_tasks);
            assert!(assignment.is_complete());
            assert_eq!(assignment.total_cost(), brute_force(&rows), "rows: {:?}", rows);
        }
    }

    #[test]
    fn test_random_float_matrices_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let n = rng.gen_range(1..=6);
            let rows: Vec<Vec<f64>> = (0..n)
                .map(|_| (0..n).map(|_| rng.gen_range(0.0..10.0)).collect())
                .collect();

            let assignment = solve_rows(&rows).into_result().into_assignment().unwrap();
            assert_valid(&assignment, n, n);
            assert!((assignment.total_cost() - brute_force(&rows)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_strategies_agree_on_random_matrices() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut backtracking = HungarianSolverBuilder::new()
            .with_matching_strategy(MatchingStrategy::Backtracking)
            .build();
        let mut augmenting = HungarianSolverBuilder::new()
            .with_matching_strategy(MatchingStrategy::AugmentingPath)
            .build();

        for _ in 0..150 {
            let n = rng.gen_range(1..=7);
            let rows: Vec<Vec<u32>> = (0..n)
                .map(|_| (0..n).map(|_| rng.gen_range(0..10)).collect())
                .collect();
            let matrix = CostMatrix::from_rows(&rows).unwrap();

            let a = backtracking.solve(&matrix).unwrap().into_result().into_assignment().unwrap();
            let b = augmenting.solve(&matrix).unwrap().into_result().into_assignment().unwrap();
            assert_eq!(a.total_cost(), b.total_cost());
            assert_eq!(a.total_cost(), brute_force(&rows));
        }
    }

    #[test]
    fn test_larger_matrix_uses_augmenting_paths() {
        let mut rng = StdRng::seed_from_u64(77);
        let n = 40;
        let rows: Vec<Vec<i64>> = (0..n)
            .map(|_| (0..n).map(|_| rng.gen_range(0..1000)).collect())
            .collect();
        let matrix = CostMatrix::from_rows(&rows).unwrap();
        let mut solver = HungarianSolver::new();
        assert_eq!(solver.matching_strategy(), MatchingStrategy::Auto);
        assert_eq!(solver.backtracking_limit(), DEFAULT_BACKTRACKING_LIMIT);

        let outcome = solver.solve(&matrix).unwrap();
        let assignment = outcome.result().assignment().unwrap();
        assert_valid(assignment, n, n);
        assert!(assignment.is_complete());

        // The solver instance can be reused.
        let again = solver.solve(&matrix).unwrap();
        assert_eq!(again.result(), outcome.result());
    }
}
