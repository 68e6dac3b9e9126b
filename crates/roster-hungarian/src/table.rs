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

//! Mutable working copy of a cost matrix.
//!
//! `CostTable<T>` is the matrix the Hungarian iterations mutate in place:
//! the reducer subtracts row and column minima, the adjuster shifts the
//! uncovered and doubly covered cells. It is always created as an explicit
//! value copy of a `CostMatrix<T>`, so the caller's matrix doubles as the
//! untouched original-cost snapshot.
//!
//! Forbidden cells carry over from the matrix as a bitset. They behave as
//! infinitely expensive: they are never zero, never a row, column or
//! uncovered minimum, and the adjuster leaves their stored value alone.

use fixedbitset::FixedBitSet;
use roster_core::num::cost::CostNumeric;
use roster_model::matrix::CostMatrix;

/// A dense, row-major table of costs that can be mutated in place.
#[derive(Clone, Debug, PartialEq)]
pub struct CostTable<T> {
    num_rows: usize,
    num_cols: usize,
    values: Vec<T>,
    forbidden: FixedBitSet,
}

impl<T> CostTable<T>
where
    T: CostNumeric,
{
    /// Creates a table from row-major values with every cell allowed.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != num_rows * num_cols`.
    pub fn new(num_rows: usize, num_cols: usize, values: Vec<T>) -> Self {
        assert_eq!(
            values.len(),
            num_rows * num_cols,
            "called `CostTable::new` with {} values for a {}x{} table",
            values.len(),
            num_rows,
            num_cols
        );

        let forbidden = FixedBitSet::with_capacity(values.len());
        Self {
            num_rows,
            num_cols,
            values,
            forbidden,
        }
    }

    /// Creates a table from nested rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows are not all of the same length.
    pub fn from_rows<R>(rows: &[R]) -> Self
    where
        R: AsRef<[T]>,
    {
        let num_rows = rows.len();
        let num_cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut values = Vec::with_capacity(num_rows * num_cols);
        for row in rows {
            let row = row.as_ref();
            assert_eq!(
                row.len(),
                num_cols,
                "called `CostTable::from_rows` with ragged rows"
            );
            values.extend_from_slice(row);
        }
        Self::new(num_rows, num_cols, values)
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[inline]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        debug_assert!(
            row < self.num_rows && col < self.num_cols,
            "called `CostTable::get` with ({}, {}) on a {}x{} table",
            row,
            col,
            self.num_rows,
            self.num_cols
        );
        self.values[row * self.num_cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        debug_assert!(
            row < self.num_rows && col < self.num_cols,
            "called `CostTable::set` with ({}, {}) on a {}x{} table",
            row,
            col,
            self.num_rows,
            self.num_cols
        );
        self.values[row * self.num_cols + col] = value;
    }

    /// Marks a cell as forbidden.
    #[inline]
    pub fn forbid(&mut self, row: usize, col: usize) {
        debug_assert!(
            row < self.num_rows && col < self.num_cols,
            "called `CostTable::forbid` with ({}, {}) on a {}x{} table",
            row,
            col,
            self.num_rows,
            self.num_cols
        );
        self.forbidden.insert(row * self.num_cols + col);
    }

    #[inline]
    pub fn is_forbidden(&self, row: usize, col: usize) -> bool {
        self.forbidden.contains(row * self.num_cols + col)
    }

    /// Returns `true` if the cell is allowed and holds zero.
    #[inline]
    pub fn is_zero(&self, row: usize, col: usize) -> bool {
        !self.is_forbidden(row, col) && self.get(row, col) == T::zero()
    }

    /// Returns the allowed cells of a row as `(col, value)` pairs.
    #[inline]
    pub fn allowed_in_row(&self, row: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let start = row * self.num_cols;
        self.row(row)
            .iter()
            .enumerate()
            .filter(move |&(c, _)| !self.forbidden.contains(start + c))
            .map(|(c, &v)| (c, v))
    }

    /// Returns the number of forbidden cells.
    #[inline]
    pub fn num_forbidden(&self) -> usize {
        self.forbidden.count_ones(..)
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.num_cols;
        &self.values[start..start + self.num_cols]
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        let start = row * self.num_cols;
        &mut self.values[start..start + self.num_cols]
    }

    /// Returns the flat, row-major values.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Returns the smallest allowed value of a row, or `None` if the row
    /// has no allowed cell.
    #[inline]
    pub fn row_min(&self, row: usize) -> Option<T> {
        min_of(self.allowed_in_row(row).map(|(_, v)| v))
    }

    /// Returns the smallest allowed value of a column, or `None` if the
    /// column has no allowed cell.
    #[inline]
    pub fn col_min(&self, col: usize) -> Option<T> {
        min_of(
            (0..self.num_rows)
                .filter(|&r| !self.is_forbidden(r, col))
                .map(|r| self.get(r, col)),
        )
    }

    /// Returns the sum of all allowed values.
    pub fn sum(&self) -> T {
        self.values
            .iter()
            .enumerate()
            .filter(|&(i, _)| !self.forbidden.contains(i))
            .fold(T::zero(), |acc, (_, &v)| acc + v)
    }

    /// Returns the number of allowed zero cells.
    pub fn count_zeros(&self) -> usize {
        self.values
            .iter()
            .enumerate()
            .filter(|&(i, &v)| v == T::zero() && !self.forbidden.contains(i))
            .count()
    }

    /// Returns a transposed copy of this table.
    pub fn transposed(&self) -> Self {
        let mut values = Vec::with_capacity(self.values.len());
        let mut forbidden = FixedBitSet::with_capacity(self.values.len());
        for c in 0..self.num_cols {
            for r in 0..self.num_rows {
                forbidden.set(values.len(), self.is_forbidden(r, c));
                values.push(self.get(r, c));
            }
        }

        Self {
            num_rows: self.num_cols,
            num_cols: self.num_rows,
            values,
            forbidden,
        }
    }
}

impl<T> From<&CostMatrix<T>> for CostTable<T>
where
    T: CostNumeric,
{
    fn from(matrix: &CostMatrix<T>) -> Self {
        let mut table = Self::new(
            matrix.num_workers(),
            matrix.num_tasks(),
            matrix.costs().to_vec(),
        );
        table.forbidden.union_with(matrix.forbidden_cells());
        table
    }
}

impl<T> std::fmt::Display for CostTable<T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for r in 0..self.num_rows {
            let line = self
                .row(r)
                .iter()
                .enumerate()
                .map(|(c, v)| {
                    if self.is_forbidden(r, c) {
                        format!("{:>6}", "-")
                    } else {
                        format!("{:>6}", v)
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Minimum under `PartialOrd`; the first of equal values wins.
#[inline]
pub(crate) fn min_of<T, I>(iter: I) -> Option<T>
where
    T: PartialOrd + Copy,
    I: IntoIterator<Item = T>,
{
    iter.into_iter()
        .fold(None, |acc, v| match acc {
            Some(m) if m <= v => Some(m),
            _ => Some(v),
        })
}
