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
use std::time::{Duration, Instant};

/// A monitor that terminates the solve after a specified duration.
///
/// The clock is read once per covering-loop iteration.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor {
    time_limit: Duration,
    start_time: Option<Instant>,
}

impl TimeLimitMonitor {
    /// Creates a new `TimeLimitMonitor` with the specified duration.
    pub fn new(duration: Duration) -> Self {
        Self {
            time_limit: duration,
            start_time: None,
        }
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl<T> SolveMonitor<T> for TimeLimitMonitor
where
    T: CostNumeric,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_solve(&mut self, _matrix: &CostMatrix<T>, _statistics: &HungarianStatistics) {
        self.start_time = Some(Instant::now());
    }

    fn on_cover_found(
        &mut self,
        _cover: &CoveringSet,
        _required: usize,
        _statistics: &HungarianStatistics,
    ) {
    }

    fn on_costs_adjusted(&mut self, _delta: T, _statistics: &HungarianStatistics) {}

    fn on_exit_solve(&mut self, _statistics: &HungarianStatistics) {
        self.start_time = None;
    }

    fn search_command(&mut self, _statistics: &HungarianStatistics) -> SearchCommand {
        if let Some(start) = self.start_time
            && start.elapsed() >= self.time_limit
        {
            return SearchCommand::Terminate(format!(
                "Time limit of {:.2?} exceeded",
                self.time_limit
            ));
        }

        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limit_terminates_once_started() {
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO);
        let stats = HungarianStatistics::default();
        let matrix = CostMatrix::from_rows(&[vec![1i64]]).unwrap();

        // Not started yet.
        assert_eq!(
            SolveMonitor::<i64>::search_command(&mut monitor, &stats),
            SearchCommand::Continue
        );

        SolveMonitor::<i64>::on_enter_solve(&mut monitor, &matrix, &stats);
        assert!(matches!(
            SolveMonitor::<i64>::search_command(&mut monitor, &stats),
            SearchCommand::Terminate(_)
        ));

        SolveMonitor::<i64>::on_exit_solve(&mut monitor, &stats);
        assert_eq!(
            SolveMonitor::<i64>::search_command(&mut monitor, &stats),
            SearchCommand::Continue
        );
    }

    #[test]
    fn test_generous_limit_continues() {
        let mut monitor = TimeLimitMonitor::new(Duration::from_secs(3600));
        let stats = HungarianStatistics::default();
        let matrix = CostMatrix::from_rows(&[vec![1.0f64]]).unwrap();
        monitor.on_enter_solve(&matrix, &stats);
        assert_eq!(
            SolveMonitor::<f64>::search_command(&mut monitor, &stats),
            SearchCommand::Continue
        );
        assert_eq!(monitor.time_limit(), Duration::from_secs(3600));
    }
}
