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

//! Monitoring combinators for the Hungarian solver
//!
//! Provides `CompositeMonitor`, a fan-out monitor that forwards every event
//! to its children, so logging and early stopping can be mixed without
//! coupling them to the solver.
//!
//! Behavior
//! - Events are dispatched to child monitors in insertion order.
//! - `search_command` short-circuits on the first non-`Continue` response;
//!   put stricter stop conditions first.
//! - Other callbacks always fan out to all children.

use crate::{
    cover::CoveringSet,
    monitor::solve_monitor::{SearchCommand, SolveMonitor},
    stats::HungarianStatistics,
    table::CostTable,
};
use roster_core::num::cost::CostNumeric;
use roster_model::matrix::CostMatrix;

/// A solve monitor that aggregates multiple monitors and forwards events to all of them.
pub struct CompositeMonitor<'a, T>
where
    T: CostNumeric,
{
    monitors: Vec<Box<dyn SolveMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeMonitor<'a, T>
where
    T: CostNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeMonitor<'a, T>
where
    T: CostNumeric,
{
    /// Creates a new empty `CompositeMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a new monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: SolveMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn SolveMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline(always)]
    pub fn monitors(&self) -> &[Box<dyn SolveMonitor<T> + 'a>] {
        &self.monitors
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> FromIterator<Box<dyn SolveMonitor<T> + 'a>> for CompositeMonitor<'a, T>
where
    T: CostNumeric,
{
    #[inline(always)]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn SolveMonitor<T> + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> SolveMonitor<T> for CompositeMonitor<'a, T>
where
    T: CostNumeric,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    fn on_enter_solve(&mut self, matrix: &CostMatrix<T>, statistics: &HungarianStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_enter_solve(matrix, statistics);
        }
    }

    fn on_reduced(&mut self, table: &CostTable<T>, statistics: &HungarianStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_reduced(table, statistics);
        }
    }

    fn on_cover_found(
        &mut self,
        cover: &CoveringSet,
        required: usize,
        statistics: &HungarianStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_cover_found(cover, required, statistics);
        }
    }

    fn on_costs_adjusted(&mut self, delta: T, statistics: &HungarianStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_costs_adjusted(delta, statistics);
        }
    }

    fn on_assignment_pass(
        &mut self,
        assigned: usize,
        remaining: usize,
        statistics: &HungarianStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_assignment_pass(assigned, remaining, statistics);
        }
    }

    fn on_exit_solve(&mut self, statistics: &HungarianStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_solve(statistics);
        }
    }

    fn search_command(&mut self, statistics: &HungarianStatistics) -> SearchCommand {
        for monitor in &mut self.monitors {
            let cmd = monitor.search_command(statistics);
            if !matches!(cmd, SearchCommand::Continue) {
                return cmd;
            }
        }
        SearchCommand::Continue
    }
}
