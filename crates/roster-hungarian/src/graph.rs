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

//! Zero-cost edges of a reduced table.
//!
//! The bipartite graph the matchers and the labeler work on has one vertex
//! per row, one per column, and an edge for every allowed zero cell. `ZeroEdges`
//! keeps the edges twice: row-major (sorted by row, then column) and grouped
//! by column, so both traversal directions are slice lookups.

use crate::table::CostTable;
use roster_core::num::cost::CostNumeric;

/// The zero cells of a table as a bipartite edge set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZeroEdges {
    num_rows: usize,
    num_cols: usize,
    /// All edges `(row, col)` in row-major order.
    edges: Vec<(usize, usize)>,
    /// `edges[row_offsets[r]..row_offsets[r + 1]]` are the edges of row `r`.
    row_offsets: Vec<usize>,
    /// `col_rows[col_offsets[c]..col_offsets[c + 1]]` are the rows with a zero in column `c`.
    col_offsets: Vec<usize>,
    col_rows: Vec<usize>,
}

impl ZeroEdges {
    /// Creates an empty edge set.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the edge set of the zero cells of `table`.
    pub fn from_table<T>(table: &CostTable<T>) -> Self
    where
        T: CostNumeric,
    {
        let mut edges = Self::new();
        edges.rebuild(table);
        edges
    }

    /// Creates an edge set from explicit `(row, col)` pairs.
    ///
    /// # Panics
    ///
    /// Panics if any pair is out of bounds.
    pub fn from_pairs(num_rows: usize, num_cols: usize, pairs: &[(usize, usize)]) -> Self {
        let mut sorted = pairs.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert!(
            sorted.iter().all(|&(r, c)| r < num_rows && c < num_cols),
            "called `ZeroEdges::from_pairs` with a pair outside a {}x{} graph",
            num_rows,
            num_cols
        );

        let mut edges = Self {
            num_rows,
            num_cols,
            edges: sorted,
            ..Self::default()
        };
        edges.index();
        edges
    }

    /// Recomputes the edge set from `table`, reusing the allocations.
    pub fn rebuild<T>(&mut self, table: &CostTable<T>)
    where
        T: CostNumeric,
    {
        self.num_rows = table.num_rows();
        self.num_cols = table.num_cols();
        self.edges.clear();
        for r in 0..self.num_rows {
            for (c, value) in table.allowed_in_row(r) {
                if value == T::zero() {
                    self.edges.push((r, c));
                }
            }
        }
        self.index();
    }

    /// Builds the row offsets and the column adjacency from `self.edges`.
    fn index(&mut self) {
        self.row_offsets.clear();
        self.row_offsets.resize(self.num_rows + 1, 0);
        self.col_offsets.clear();
        self.col_offsets.resize(self.num_cols + 1, 0);

        for &(r, c) in &self.edges {
            self.row_offsets[r + 1] += 1;
            self.col_offsets[c + 1] += 1;
        }
        for i in 0..self.num_rows {
            self.row_offsets[i + 1] += self.row_offsets[i];
        }
        for i in 0..self.num_cols {
            self.col_offsets[i + 1] += self.col_offsets[i];
        }

        // Edges are row-major, so each column's rows come out ascending.
        self.col_rows.clear();
        self.col_rows.resize(self.edges.len(), 0);
        let mut next = self.col_offsets.clone();
        for &(r, c) in &self.edges {
            self.col_rows[next[c]] = r;
            next[c] += 1;
        }
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[inline]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Returns the number of edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns all edges in row-major order.
    #[inline]
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Returns the edges of `row`, ordered by column.
    #[inline]
    pub fn row_edges(&self, row: usize) -> &[(usize, usize)] {
        debug_assert!(
            row < self.num_rows,
            "called `ZeroEdges::row_edges` with row {} but the graph has {} rows",
            row,
            self.num_rows
        );
        &self.edges[self.row_offsets[row]..self.row_offsets[row + 1]]
    }

    /// Returns the rows with a zero in `col`, in ascending order.
    #[inline]
    pub fn col_neighbors(&self, col: usize) -> &[usize] {
        debug_assert!(
            col < self.num_cols,
            "called `ZeroEdges::col_neighbors` with column {} but the graph has {} columns",
            col,
            self.num_cols
        );
        &self.col_rows[self.col_offsets[col]..self.col_offsets[col + 1]]
    }

    /// Returns `true` if `(row, col)` is an edge.
    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.num_rows
            && self
                .row_edges(row)
                .binary_search_by_key(&col, |&(_, c)| c)
                .is_ok()
    }
}
