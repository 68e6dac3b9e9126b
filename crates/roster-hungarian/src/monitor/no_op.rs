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

use crate::{
    cover::CoveringSet,
    monitor::solve_monitor::{SearchCommand, SolveMonitor},
    stats::HungarianStatistics,
};
use roster_core::num::cost::CostNumeric;
use roster_model::matrix::CostMatrix;

/// A no-operation monitor that implements the `SolveMonitor` trait
/// but does nothing on any of the events, always returning `Continue` for the
/// search command.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct NoOperationMonitor;

impl NoOperationMonitor {
    /// Creates a new `NoOperationMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self
    }
}

impl<T> SolveMonitor<T> for NoOperationMonitor
where
    T: CostNumeric,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOperationMonitor"
    }

    #[inline(always)]
    fn on_enter_solve(&mut self, _matrix: &CostMatrix<T>, _statistics: &HungarianStatistics) {}

    #[inline(always)]
    fn on_cover_found(
        &mut self,
        _cover: &CoveringSet,
        _required: usize,
        _statistics: &HungarianStatistics,
    ) {
    }

    #[inline(always)]
    fn on_costs_adjusted(&mut self, _delta: T, _statistics: &HungarianStatistics) {}

    #[inline(always)]
    fn on_exit_solve(&mut self, _statistics: &HungarianStatistics) {}

    #[inline(always)]
    fn search_command(&mut self, _statistics: &HungarianStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
}
