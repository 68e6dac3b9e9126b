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

//! Progress reporting through the `log` facade.
//!
//! Lifecycle events (start, reduction, finish) are logged at `info`, every
//! covering-loop event at `debug`. The monitor never installs a logger.

use crate::{
    cover::CoveringSet, monitor::solve_monitor::SolveMonitor, stats::HungarianStatistics,
    table::CostTable,
};
use ::log::{debug, info};
use roster_core::num::cost::CostNumeric;
use roster_model::matrix::CostMatrix;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct LogMonitor {
    target: &'static str,
    start_time: Option<Instant>,
}

impl LogMonitor {
    /// Creates a monitor that logs under the given target.
    pub fn new(target: &'static str) -> Self {
        Self {
            target,
            start_time: None,
        }
    }

    #[inline]
    pub fn target(&self) -> &'static str {
        self.target
    }

    #[inline]
    fn elapsed_secs(&self) -> f32 {
        self.start_time
            .map_or(0.0, |start| start.elapsed().as_secs_f32())
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new("roster_hungarian")
    }
}

impl std::fmt::Display for LogMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogMonitor(target: {})", self.target)
    }
}

impl<T> SolveMonitor<T> for LogMonitor
where
    T: CostNumeric,
{
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_solve(&mut self, matrix: &CostMatrix<T>, _statistics: &HungarianStatistics) {
        self.start_time = Some(Instant::now());
        info!(
            target: self.target,
            "solve started: {} workers x {} tasks",
            matrix.num_workers(),
            matrix.num_tasks()
        );
    }

    fn on_reduced(&mut self, table: &CostTable<T>, _statistics: &HungarianStatistics) {
        info!(
            target: self.target,
            "reduced {}x{} table: {} zeros",
            table.num_rows(),
            table.num_cols(),
            table.count_zeros()
        );
    }

    fn on_cover_found(
        &mut self,
        cover: &CoveringSet,
        required: usize,
        statistics: &HungarianStatistics,
    ) {
        debug!(
            target: self.target,
            "[{:.3}s] iteration {}: {} covering lines ({} rows, {} cols), {} required",
            self.elapsed_secs(),
            statistics.cover_iterations,
            cover.len(),
            cover.num_covered_rows(),
            cover.num_covered_cols(),
            required
        );
    }

    fn on_costs_adjusted(&mut self, delta: T, statistics: &HungarianStatistics) {
        debug!(
            target: self.target,
            "[{:.3}s] adjustment {}: shifted uncovered costs by {}",
            self.elapsed_secs(),
            statistics.cost_adjustments,
            delta
        );
    }

    fn on_assignment_pass(
        &mut self,
        assigned: usize,
        remaining: usize,
        statistics: &HungarianStatistics,
    ) {
        debug!(
            target: self.target,
            "assignment pass {}: {} rows placed, {} waiting",
            statistics.assignment_passes,
            assigned,
            remaining
        );
    }

    fn on_exit_solve(&mut self, statistics: &HungarianStatistics) {
        info!(
            target: self.target,
            "solve finished in {:.2?}: {} cover iterations, {} adjustments, {} matcher nodes",
            statistics.time_total,
            statistics.cover_iterations,
            statistics.cost_adjustments,
            statistics.matcher_nodes
        );
        self.start_time = None;
    }
}
