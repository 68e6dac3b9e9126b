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
    index::{TaskIndex, WorkerIndex},
    matrix::CostMatrix,
};
use roster_core::num::cost::CostNumeric;

/// The error type for pricing an assignment against a cost matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentCostError {
    /// The pair is forbidden in the matrix.
    Forbidden {
        /// The worker of the offending pair.
        worker: WorkerIndex,
        /// The task of the offending pair.
        task: TaskIndex,
    },
    /// Adding the cost of the pair overflowed the cost type.
    Overflow {
        /// The worker of the pair whose cost no longer fit.
        worker: WorkerIndex,
        /// The task of the pair whose cost no longer fit.
        task: TaskIndex,
    },
}

impl std::fmt::Display for AssignmentCostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forbidden { worker, task } => write!(
                f,
                "Worker {} must not be assigned task {}",
                worker.get(),
                task.get()
            ),
            Self::Overflow { worker, task } => write!(
                f,
                "Total cost overflowed when adding worker {} and task {}",
                worker.get(),
                task.get()
            ),
        }
    }
}

impl std::error::Error for AssignmentCostError {}

/// The final assignment of tasks to workers.
///
/// Indexed directly by `WorkerIndex`: `tasks[w]` lists the tasks assigned to
/// worker `w`. The list is ordinarily a single task. It is empty when the
/// worker was matched to a padding task that has since been filtered out.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment<T> {
    /// The total original cost of all assigned pairs.
    total_cost: T,

    /// The assigned tasks per worker.
    tasks: Vec<Vec<TaskIndex>>,
}

impl<T> Assignment<T>
where
    T: CostNumeric,
{
    /// Constructs a new `Assignment` from precomputed parts.
    pub fn new(total_cost: T, tasks: Vec<Vec<TaskIndex>>) -> Self {
        Self { total_cost, tasks }
    }

    /// Constructs an assignment from per-worker task lists, pricing every
    /// pair with the costs of `matrix`.
    ///
    /// # Errors
    ///
    /// Returns `AssignmentCostError::Forbidden` if a listed pair is forbidden
    /// in `matrix`, and `AssignmentCostError::Overflow` if the running total
    /// no longer fits the cost type.
    ///
    /// # Panics
    ///
    /// Panics if `tasks.len()` differs from the number of workers of `matrix`.
    pub fn from_tasks(
        matrix: &CostMatrix<T>,
        tasks: Vec<Vec<TaskIndex>>,
    ) -> Result<Self, AssignmentCostError> {
        assert_eq!(
            tasks.len(),
            matrix.num_workers(),
            "called `Assignment::from_tasks` with inconsistent lengths: tasks.len() = {}, num_workers = {}",
            tasks.len(),
            matrix.num_workers()
        );

        let mut total_cost = T::zero();
        for (w, list) in tasks.iter().enumerate() {
            let worker = WorkerIndex::new(w);
            for &task in list {
                let cost = matrix
                    .cost(worker, task)
                    .ok_or(AssignmentCostError::Forbidden { worker, task })?;
                total_cost = total_cost
                    .checked_add_cost(cost)
                    .ok_or(AssignmentCostError::Overflow { worker, task })?;
            }
        }

        Ok(Self { total_cost, tasks })
    }

    /// Returns the total original cost of this assignment.
    #[inline]
    pub fn total_cost(&self) -> T {
        self.total_cost
    }

    /// Returns the number of workers in this assignment.
    #[inline]
    pub fn num_workers(&self) -> usize {
        self.tasks.len()
    }

    /// Returns the tasks assigned to a specific worker.
    ///
    /// # Panics
    ///
    /// Panics if `worker_index` is out of bounds.
    #[inline]
    pub fn tasks_for_worker(&self, worker_index: WorkerIndex) -> &[TaskIndex] {
        debug_assert!(
            worker_index.get() < self.num_workers(),
            "called `Assignment::tasks_for_worker` with worker index out of bounds: the len is {} but the index is {}",
            self.num_workers(),
            worker_index.get()
        );

        &self.tasks[worker_index.get()]
    }

    /// Returns the worker a task was assigned to, if any.
    pub fn worker_for_task(&self, task_index: TaskIndex) -> Option<WorkerIndex> {
        self.pairs()
            .find_map(|(w, t)| (t == task_index).then_some(w))
    }

    /// Returns the per-worker task lists.
    #[inline]
    pub fn tasks(&self) -> &[Vec<TaskIndex>] {
        &self.tasks
    }

    /// Returns an iterator over all `(worker, task)` pairs in worker order.
    pub fn pairs(&self) -> impl Iterator<Item = (WorkerIndex, TaskIndex)> + '_ {
        self.tasks
            .iter()
            .enumerate()
            .flat_map(|(w, list)| list.iter().map(move |&t| (WorkerIndex::new(w), t)))
    }

    /// Returns the number of assigned pairs.
    #[inline]
    pub fn num_pairs(&self) -> usize {
        self.tasks.iter().map(Vec::len).sum()
    }

    /// Returns `true` if every worker has at least one task.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.tasks.iter().all(|list| !list.is_empty())
    }

    /// Drops every task index at or above `num_real_tasks`.
    ///
    /// Used after solving a matrix that was padded with zero-cost dummy
    /// tasks. Dummy tasks cost nothing, so the total cost is unchanged.
    pub fn without_dummy_tasks(mut self, num_real_tasks: usize) -> Self {
        for list in &mut self.tasks {
            list.retain(|t| t.get() < num_real_tasks);
        }
        self
    }

    /// Returns the plain nested form: one list of task columns per worker row.
    pub fn to_nested(&self) -> Vec<Vec<usize>> {
        self.tasks
            .iter()
            .map(|list| list.iter().map(|t| t.get()).collect())
            .collect()
    }
}

impl<T> std::fmt::Display for Assignment<T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Assignment Summary")?;
        writeln!(f, "   Total Cost: {}", self.total_cost)?;
        writeln!(f)?;

        if self.tasks.is_empty() {
            writeln!(f, "   (No workers)")?;
            return Ok(());
        }

        writeln!(f, "   {:<10} | {:<10}", "Worker", "Tasks")?;
        writeln!(f, "   {:-<10}-+-{:-<10}", "", "")?;
        for (w, list) in self.tasks.iter().enumerate() {
            let rendered = if list.is_empty() {
                "-".to_string()
            } else {
                list.iter()
                    .map(|t| t.get().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            writeln!(f, "   {:<10} | {:<10}", w, rendered)?;
        }

        Ok(())
    }
}
