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

use std::time::Duration;

/// Statistics collected during a Hungarian solve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HungarianStatistics {
    /// Number of rows of the working table.
    pub working_size: usize,
    /// Number of columns of the working table.
    pub working_cols: usize,
    /// Cover computations run by the covering loop.
    pub cover_iterations: u64,
    /// Cost adjustments applied.
    pub cost_adjustments: u64,
    /// Search nodes expanded by the matchers, summed over all cover steps.
    pub matcher_nodes: u64,
    /// Greedy passes run by the job assigner.
    pub assignment_passes: u64,
    /// Rows placed by augmenting-path repair.
    pub augmentations: u64,
    /// Alternating paths run to place columns whose cost was lowered.
    pub rebalances: u64,
    /// Total time spent in the solver.
    pub time_total: Duration,
}

impl HungarianStatistics {
    #[inline]
    pub fn set_working_size(&mut self, rows: usize, cols: usize) {
        self.working_size = rows;
        self.working_cols = cols;
    }

    #[inline]
    pub fn on_cover_iteration(&mut self, matcher_nodes: u64) {
        self.cover_iterations = self.cover_iterations.saturating_add(1);
        self.matcher_nodes = self.matcher_nodes.saturating_add(matcher_nodes);
    }

    #[inline]
    pub fn on_cost_adjustment(&mut self) {
        self.cost_adjustments = self.cost_adjustments.saturating_add(1);
    }

    #[inline]
    pub fn on_assignment_pass(&mut self) {
        self.assignment_passes = self.assignment_passes.saturating_add(1);
    }

    #[inline]
    pub fn on_augmentations(&mut self, count: u64) {
        self.augmentations = self.augmentations.saturating_add(count);
    }

    #[inline]
    pub fn on_rebalances(&mut self, count: u64) {
        self.rebalances = self.rebalances.saturating_add(count);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for HungarianStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Hungarian Solver Statistics:")?;
        writeln!(
            f,
            "  Working size:         {} x {}",
            self.working_size, self.working_cols
        )?;
        writeln!(f, "  Cover iterations:     {}", self.cover_iterations)?;
        writeln!(f, "  Cost adjustments:     {}", self.cost_adjustments)?;
        writeln!(f, "  Matcher nodes:        {}", self.matcher_nodes)?;
        writeln!(f, "  Assignment passes:    {}", self.assignment_passes)?;
        writeln!(f, "  Augmentations:        {}", self.augmentations)?;
        writeln!(f, "  Rebalances:           {}", self.rebalances)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}
