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

//! Validated cost matrices.
//!
//! A `CostMatrix<T>` stores one cost per (worker, task) pair in a flat,
//! row-major vector: rows are workers, columns are tasks. It is immutable
//! once built and serves as the original cost snapshot the solver consults
//! when breaking ties between equally reduced candidates.
//!
//! Matrices are created either from nested rows (`CostMatrix::from_rows`)
//! or cell by cell through `CostMatrixBuilder`. Both paths normalize every
//! cost through `CostNumeric::normalize_cost` and reject NaN and negative
//! costs with a `CostMatrixError` pointing at the offending cell.
//!
//! Forbidden pairs are tracked in a bitset next to the costs rather than
//! encoded as a large cost, so every finite cost of the numeric type is a
//! valid, assignable cost. A pair is forbidden when its input cost is
//! infinite or when the builder never set it (or `forbid` was called).

use crate::index::{TaskIndex, WorkerIndex};
use fixedbitset::FixedBitSet;
use roster_core::num::cost::CostNumeric;

#[inline(always)]
fn flatten_index(num_tasks: usize, worker_index: WorkerIndex, task_index: TaskIndex) -> usize {
    worker_index.get() * num_tasks + task_index.get()
}

/// The error type for cost matrix construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CostMatrixError {
    /// The matrix has no workers or no tasks.
    Empty,
    /// A row does not have the same length as the first row.
    Ragged {
        /// The index of the offending row.
        row: usize,
        /// The length of the first row.
        expected: usize,
        /// The length of the offending row.
        found: usize,
    },
    /// A cost is NaN or negative.
    InvalidCost {
        /// The worker (row) of the offending cell.
        worker: WorkerIndex,
        /// The task (column) of the offending cell.
        task: TaskIndex,
    },
}

impl std::fmt::Display for CostMatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Cost matrix must have at least one worker and one task"),
            Self::Ragged {
                row,
                expected,
                found,
            } => write!(
                f,
                "Cost matrix is not rectangular: row {} has {} entries, expected {}",
                row, found, expected
            ),
            Self::InvalidCost { worker, task } => write!(
                f,
                "Cost for worker {} and task {} is NaN or negative",
                worker.get(),
                task.get()
            ),
        }
    }
}

impl std::error::Error for CostMatrixError {}

/// An immutable, rectangular matrix of normalized, non-negative costs.
///
/// `costs[worker * num_tasks + task]` is the cost of assigning `worker` to
/// `task`. The same flat index into `forbidden` tells whether the pair may
/// be assigned at all; forbidden cells store a cost of zero.
#[derive(Clone, Debug, PartialEq)]
pub struct CostMatrix<T> {
    num_workers: usize,
    num_tasks: usize,
    costs: Vec<T>,
    forbidden: FixedBitSet,
}

/// Normalizes one raw cost into its stored value and forbidden flag.
#[inline]
fn normalize_cell<T>(raw: T, index: usize, num_tasks: usize) -> Result<(T, bool), CostMatrixError>
where
    T: CostNumeric,
{
    let cost = raw.normalize_cost().ok_or(CostMatrixError::InvalidCost {
        worker: WorkerIndex::new(index / num_tasks),
        task: TaskIndex::new(index % num_tasks),
    })?;
    if cost.is_infinite_cost() {
        return Ok((T::zero(), true));
    }
    Ok((cost, false))
}

impl<T> CostMatrix<T>
where
    T: CostNumeric,
{
    /// Builds a matrix from nested rows, normalizing every cost.
    ///
    /// Infinite costs mark their pair as forbidden.
    ///
    /// # Errors
    ///
    /// Returns `CostMatrixError::Empty` if there are no rows or the first
    /// row is empty, `CostMatrixError::Ragged` if a row length differs from
    /// the first row, and `CostMatrixError::InvalidCost` for NaN or negative
    /// entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use roster_model::matrix::CostMatrix;
    /// # use roster_model::index::{TaskIndex, WorkerIndex};
    /// let m = CostMatrix::from_rows(&[vec![1.0, 2.0e12], vec![f64::INFINITY, 0.5]]).unwrap();
    /// assert_eq!(m.num_workers(), 2);
    /// assert_eq!(m.num_tasks(), 2);
    /// assert_eq!(m.cost(WorkerIndex::new(0), TaskIndex::new(1)), Some(2.0e12));
    /// assert!(m.is_forbidden(WorkerIndex::new(1), TaskIndex::new(0)));
    /// ```
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, CostMatrixError>
    where
        R: AsRef<[T]>,
    {
        let num_workers = rows.len();
        let num_tasks = rows.first().map_or(0, |r| r.as_ref().len());
        if num_workers == 0 || num_tasks == 0 {
            return Err(CostMatrixError::Empty);
        }

        let mut costs = Vec::with_capacity(num_workers * num_tasks);
        let mut forbidden = FixedBitSet::with_capacity(num_workers * num_tasks);
        for (w, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != num_tasks {
                return Err(CostMatrixError::Ragged {
                    row: w,
                    expected: num_tasks,
                    found: row.len(),
                });
            }
            for &raw in row {
                let index = costs.len();
                let (cost, is_forbidden) = normalize_cell(raw, index, num_tasks)?;
                forbidden.set(index, is_forbidden);
                costs.push(cost);
            }
        }

        Ok(Self {
            num_workers,
            num_tasks,
            costs,
            forbidden,
        })
    }

    /// Returns the number of workers (rows).
    #[inline]
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns the number of tasks (columns).
    #[inline]
    pub fn num_tasks(&self) -> usize {
        self.num_tasks
    }

    /// Returns `true` if the matrix has as many workers as tasks.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.num_workers == self.num_tasks
    }

    /// Returns the cost of assigning `worker_index` to `task_index`, or
    /// `None` if the pair is forbidden.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn cost(&self, worker_index: WorkerIndex, task_index: TaskIndex) -> Option<T> {
        debug_assert!(
            worker_index.get() < self.num_workers,
            "called `CostMatrix::cost` with worker index out of bounds: the len is {} but the index is {}",
            self.num_workers,
            worker_index.get()
        );
        debug_assert!(
            task_index.get() < self.num_tasks,
            "called `CostMatrix::cost` with task index out of bounds: the len is {} but the index is {}",
            self.num_tasks,
            task_index.get()
        );

        let index = flatten_index(self.num_tasks, worker_index, task_index);
        (!self.forbidden.contains(index)).then(|| self.costs[index])
    }

    /// Returns `true` if `worker_index` must not be assigned `task_index`.
    #[inline]
    pub fn is_forbidden(&self, worker_index: WorkerIndex, task_index: TaskIndex) -> bool {
        self.forbidden
            .contains(flatten_index(self.num_tasks, worker_index, task_index))
    }

    /// Returns the number of forbidden pairs.
    #[inline]
    pub fn num_forbidden(&self) -> usize {
        self.forbidden.count_ones(..)
    }

    /// Returns the forbidden flags in the same row-major order as `costs`.
    #[inline]
    pub fn forbidden_cells(&self) -> &FixedBitSet {
        &self.forbidden
    }

    /// Returns the stored costs of one worker across all tasks. Forbidden
    /// cells read as zero.
    #[inline]
    pub fn row(&self, worker: usize) -> &[T] {
        let start = worker * self.num_tasks;
        &self.costs[start..start + self.num_tasks]
    }

    /// Returns an iterator over all rows.
    #[inline]
    pub fn rows(&self) -> std::slice::ChunksExact<'_, T> {
        self.costs.chunks_exact(self.num_tasks)
    }

    /// Returns the flat, row-major cost storage. Forbidden cells read as zero.
    #[inline]
    pub fn costs(&self) -> &[T] {
        &self.costs
    }

    /// Returns a copy of this matrix with `count` zero-cost dummy tasks
    /// appended as extra columns.
    ///
    /// Callers use this when workers outnumber tasks; any dummy task index
    /// (`>= self.num_tasks()`) in a solution must be discarded afterwards.
    pub fn with_dummy_tasks(&self, count: usize) -> Self {
        if count == 0 {
            return self.clone();
        }

        let num_tasks = self.num_tasks + count;
        let mut costs = Vec::with_capacity(self.num_workers * num_tasks);
        let mut forbidden = FixedBitSet::with_capacity(self.num_workers * num_tasks);
        for (w, row) in self.rows().enumerate() {
            let start = w * self.num_tasks;
            for t in (0..self.num_tasks).filter(|&t| self.forbidden.contains(start + t)) {
                forbidden.insert(w * num_tasks + t);
            }
            costs.extend_from_slice(row);
            costs.extend(std::iter::repeat_n(T::zero(), count));
        }

        Self {
            num_workers: self.num_workers,
            num_tasks,
            costs,
            forbidden,
        }
    }

    /// Returns a copy of this matrix with `count` zero-cost dummy workers
    /// appended as extra rows.
    pub fn with_dummy_workers(&self, count: usize) -> Self {
        let mut costs = self.costs.clone();
        costs.extend(std::iter::repeat_n(T::zero(), count * self.num_tasks));
        let mut forbidden = self.forbidden.clone();
        forbidden.grow(costs.len());

        Self {
            num_workers: self.num_workers + count,
            num_tasks: self.num_tasks,
            costs,
            forbidden,
        }
    }
}

impl<T> std::fmt::Display for CostMatrix<T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "CostMatrix ({} workers x {} tasks)",
            self.num_workers, self.num_tasks
        )?;
        for (w, row) in self.rows().enumerate() {
            write!(f, "  ")?;
            for (t, cost) in row.iter().enumerate() {
                if t > 0 {
                    write!(f, " ")?;
                }
                if self.forbidden.contains(w * self.num_tasks + t) {
                    write!(f, "{:>8}", "-")?;
                } else {
                    write!(f, "{:>8}", cost)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A mutable builder for `CostMatrix`.
///
/// Every cell starts out forbidden: a worker can only take a task once a
/// cost for that pair has been set explicitly.
///
/// # Examples
///
/// ```rust
/// # use roster_model::matrix::CostMatrixBuilder;
/// # use roster_model::index::{TaskIndex, WorkerIndex};
/// let mut builder = CostMatrixBuilder::<i64>::new(2, 2);
/// builder
///     .set_cost(WorkerIndex::new(0), TaskIndex::new(0), 4)
///     .set_cost(WorkerIndex::new(0), TaskIndex::new(1), 1)
///     .set_cost(WorkerIndex::new(1), TaskIndex::new(0), 2);
/// let matrix = builder.build().unwrap();
/// assert_eq!(matrix.cost(WorkerIndex::new(0), TaskIndex::new(1)), Some(1));
/// assert_eq!(matrix.cost(WorkerIndex::new(1), TaskIndex::new(1)), None);
/// ```
#[derive(Clone, Debug)]
pub struct CostMatrixBuilder<T> {
    num_workers: usize,
    num_tasks: usize,
    costs: Vec<T>,
    forbidden: FixedBitSet,
}

impl<T> CostMatrixBuilder<T>
where
    T: CostNumeric,
{
    /// Creates a builder for `num_workers x num_tasks` with every pair forbidden.
    pub fn new(num_workers: usize, num_tasks: usize) -> Self {
        let len = num_workers * num_tasks;
        let mut forbidden = FixedBitSet::with_capacity(len);
        forbidden.insert_range(..);

        Self {
            num_workers,
            num_tasks,
            costs: vec![T::zero(); len],
            forbidden,
        }
    }

    /// Returns the number of workers.
    #[inline]
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns the number of tasks.
    #[inline]
    pub fn num_tasks(&self) -> usize {
        self.num_tasks
    }

    #[inline]
    fn checked_index(&self, worker_index: WorkerIndex, task_index: TaskIndex, caller: &str) -> usize {
        assert!(
            worker_index.get() < self.num_workers && task_index.get() < self.num_tasks,
            "called `CostMatrixBuilder::{}` with index out of bounds: the dimensions are {}x{} but the index is ({}, {})",
            caller,
            self.num_workers,
            self.num_tasks,
            worker_index.get(),
            task_index.get()
        );

        flatten_index(self.num_tasks, worker_index, task_index)
    }

    /// Sets the raw cost of a pair and makes it assignable. The value is
    /// normalized on `build`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn set_cost(
        &mut self,
        worker_index: WorkerIndex,
        task_index: TaskIndex,
        cost: T,
    ) -> &mut Self {
        let index = self.checked_index(worker_index, task_index, "set_cost");
        self.costs[index] = cost;
        self.forbidden.set(index, false);
        self
    }

    /// Marks a pair as forbidden.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn forbid(&mut self, worker_index: WorkerIndex, task_index: TaskIndex) -> &mut Self {
        let index = self.checked_index(worker_index, task_index, "forbid");
        self.costs[index] = T::zero();
        self.forbidden.insert(index);
        self
    }

    /// Sets all costs of one worker from a slice.
    ///
    /// # Panics
    ///
    /// Panics if `costs.len()` differs from the number of tasks.
    pub fn set_worker_costs(&mut self, worker_index: WorkerIndex, costs: &[T]) -> &mut Self {
        assert_eq!(
            costs.len(),
            self.num_tasks,
            "called `CostMatrixBuilder::set_worker_costs` with {} costs for {} tasks",
            costs.len(),
            self.num_tasks
        );

        for (t, &cost) in costs.iter().enumerate() {
            self.set_cost(worker_index, TaskIndex::new(t), cost);
        }
        self
    }

    /// Validates and normalizes all costs and builds the matrix.
    pub fn build(self) -> Result<CostMatrix<T>, CostMatrixError> {
        if self.num_workers == 0 || self.num_tasks == 0 {
            return Err(CostMatrixError::Empty);
        }

        let mut costs = self.costs;
        let mut forbidden = self.forbidden;
        for (i, cost) in costs.iter_mut().enumerate() {
            if forbidden.contains(i) {
                continue;
            }
            let (normalized, is_forbidden) = normalize_cell(*cost, i, self.num_tasks)?;
            *cost = normalized;
            forbidden.set(i, is_forbidden);
        }

        Ok(CostMatrix {
            num_workers: self.num_workers,
            num_tasks: self.num_tasks,
            costs,
            forbidden,
        })
    }
}
