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

use roster_model::{
    assignment::AssignmentCostError,
    index::{TaskIndex, WorkerIndex},
    matrix::CostMatrixError,
};

/// The error type for the Hungarian solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The input rows did not form a valid cost matrix.
    Matrix(CostMatrixError),
    /// The covering loop hit its iteration limit, or a cost adjustment made
    /// no progress, before the zeros needed `required` covering lines.
    NonConvergence {
        iterations: usize,
        covering_lines: usize,
        required: usize,
    },
    /// The backtracking matcher was requested explicitly for a table larger
    /// than the configured backtracking limit.
    MatchingTooLarge { size: usize, limit: usize },
    /// No zero column could be found for a worker while extracting the
    /// assignment.
    AssignmentStalled { worker: WorkerIndex },
    /// A task whose costs were lowered by the covering loop could not be
    /// assigned while extracting the assignment.
    TaskStalled { task: TaskIndex },
    /// A cost no longer fits the cost type: either an adjusted cost of the
    /// working table or the running total of the assignment, at the given
    /// pair.
    CostOverflow { worker: WorkerIndex, task: TaskIndex },
    /// The extracted assignment contains a forbidden pair.
    ForbiddenPair { worker: WorkerIndex, task: TaskIndex },
}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matrix(e) => write!(f, "Invalid cost matrix: {}", e),
            Self::NonConvergence {
                iterations,
                covering_lines,
                required,
            } => write!(
                f,
                "Covering loop did not converge after {} iterations: {} covering lines, {} required",
                iterations, covering_lines, required
            ),
            Self::MatchingTooLarge { size, limit } => write!(
                f,
                "Backtracking matcher requested for {} rows, but the limit is {}",
                size, limit
            ),
            Self::AssignmentStalled { worker } => write!(
                f,
                "No zero-cost task left for worker {} while extracting the assignment",
                worker.get()
            ),
            Self::TaskStalled { task } => write!(
                f,
                "Task {} must be assigned but no worker could take it",
                task.get()
            ),
            Self::CostOverflow { worker, task } => write!(
                f,
                "Cost overflow at worker {} and task {}",
                worker.get(),
                task.get()
            ),
            Self::ForbiddenPair { worker, task } => write!(
                f,
                "Worker {} was assigned forbidden task {}",
                worker.get(),
                task.get()
            ),
        }
    }
}

impl std::error::Error for SolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Matrix(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CostMatrixError> for SolveError {
    fn from(e: CostMatrixError) -> Self {
        Self::Matrix(e)
    }
}

impl From<AssignmentCostError> for SolveError {
    fn from(e: AssignmentCostError) -> Self {
        match e {
            AssignmentCostError::Forbidden { worker, task } => Self::ForbiddenPair { worker, task },
            AssignmentCostError::Overflow { worker, task } => Self::CostOverflow { worker, task },
        }
    }
}
