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

use crate::{cover::CoveringSet, stats::HungarianStatistics, table::CostTable};
use roster_core::num::cost::CostNumeric;
use roster_model::matrix::CostMatrix;

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum SearchCommand {
    #[default]
    Continue,
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// Trait for monitoring and controlling a Hungarian solve.
pub trait SolveMonitor<T>
where
    T: CostNumeric,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called when the solve starts, with the caller's matrix.
    fn on_enter_solve(&mut self, matrix: &CostMatrix<T>, statistics: &HungarianStatistics);
    /// Called once the working table has been row- and column-reduced.
    fn on_reduced(&mut self, _table: &CostTable<T>, _statistics: &HungarianStatistics) {}
    /// Called after every cover computation. `required` is the number of
    /// lines a complete assignment needs.
    fn on_cover_found(
        &mut self,
        cover: &CoveringSet,
        required: usize,
        statistics: &HungarianStatistics,
    );
    /// Called after the uncovered costs were shifted by `delta`.
    fn on_costs_adjusted(&mut self, delta: T, statistics: &HungarianStatistics);
    /// Called after every greedy pass of the job assigner.
    fn on_assignment_pass(
        &mut self,
        _assigned: usize,
        _remaining: usize,
        _statistics: &HungarianStatistics,
    ) {
    }
    /// Called when the solve ends, whatever the outcome.
    fn on_exit_solve(&mut self, statistics: &HungarianStatistics);
    /// Called once per covering-loop iteration to decide whether to go on.
    fn search_command(&mut self, _statistics: &HungarianStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
}

impl<T> std::fmt::Debug for dyn SolveMonitor<T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SolveMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn SolveMonitor<T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SolveMonitor({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_command_display_and_default() {
        assert_eq!(SearchCommand::default(), SearchCommand::Continue);
        assert_eq!(
            SearchCommand::Terminate("limit".to_string()).to_string(),
            "Terminate: limit"
        );
    }
}
