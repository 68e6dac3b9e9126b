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

//! Maximum-cardinality bipartite matching over zero edges.
//!
//! Two matchers implement `MaximumMatcher`:
//!
//! - `BacktrackingMatcher` enumerates matchings exhaustively. It walks the
//!   row-major edge list in increasing index order with an explicit stack,
//!   marking a row and a column on descend and unmarking them on backtrack,
//!   so each matching (as an edge set) is visited exactly once. The search
//!   stops as soon as a matching of size `min(rows, cols)` is found, or when
//!   the rows left cannot beat the best matching found so far. Ties go to
//!   the first matching found. The running time is exponential, so the
//!   solver only uses it on small tables.
//! - `AugmentingPathMatcher` grows the matching one augmenting path at a
//!   time (Kuhn's algorithm) with an iterative depth-first search. It runs
//!   in `O(V * E)` and handles every size. It starts from the matching it is
//!   handed, keeping every pair that is still an edge, so a column matched
//!   in one cover step stays matched in the next.
//!
//! Both report the number of search nodes they expanded, which ends up in
//! the solver statistics.

use crate::graph::ZeroEdges;
use fixedbitset::FixedBitSet;

/// A matching: at most one partner per row and per column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Matching {
    row_mate: Vec<Option<usize>>,
    col_mate: Vec<Option<usize>>,
    size: usize,
}

impl Matching {
    /// Creates an empty matching for a `num_rows x num_cols` graph.
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Self {
            row_mate: vec![None; num_rows],
            col_mate: vec![None; num_cols],
            size: 0,
        }
    }

    /// Clears the matching and resizes it to `num_rows x num_cols`.
    pub fn reset(&mut self, num_rows: usize, num_cols: usize) {
        self.row_mate.clear();
        self.row_mate.resize(num_rows, None);
        self.col_mate.clear();
        self.col_mate.resize(num_cols, None);
        self.size = 0;
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.row_mate.len()
    }

    #[inline]
    pub fn num_cols(&self) -> usize {
        self.col_mate.len()
    }

    /// Returns the number of matched pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn mate_of_row(&self, row: usize) -> Option<usize> {
        self.row_mate[row]
    }

    #[inline]
    pub fn mate_of_col(&self, col: usize) -> Option<usize> {
        self.col_mate[col]
    }

    #[inline]
    pub fn is_row_matched(&self, row: usize) -> bool {
        self.row_mate[row].is_some()
    }

    #[inline]
    pub fn is_col_matched(&self, col: usize) -> bool {
        self.col_mate[col].is_some()
    }

    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.row_mate.get(row).copied().flatten() == Some(col)
    }

    /// Matches `row` with `col`. Both must be free.
    #[inline]
    pub fn insert(&mut self, row: usize, col: usize) {
        debug_assert!(
            self.row_mate[row].is_none() && self.col_mate[col].is_none(),
            "called `Matching::insert` with ({}, {}) but one of them is already matched",
            row,
            col
        );
        self.row_mate[row] = Some(col);
        self.col_mate[col] = Some(row);
        self.size += 1;
    }

    /// Flips an augmenting path given as its new `(row, col)` pairs, ordered
    /// from the free row to the free column. The matching grows by one.
    pub fn augment<I>(&mut self, path: I)
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        for (row, col) in path {
            self.row_mate[row] = Some(col);
            self.col_mate[col] = Some(row);
        }
        self.size += 1;
    }

    /// Moves rows along an alternating path without changing the size.
    ///
    /// `path` lists the new `(row, col)` pairs. The rows are all matched
    /// beforehand and `released` is the column the path leaves free.
    pub fn shift<I>(&mut self, path: I, released: usize)
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        self.col_mate[released] = None;
        for (row, col) in path {
            self.row_mate[row] = Some(col);
            self.col_mate[col] = Some(row);
        }
    }

    /// Drops every pair that is not an edge of `edges`. A matching of other
    /// dimensions is cleared and resized.
    pub fn retain_edges(&mut self, edges: &ZeroEdges) {
        if (self.num_rows(), self.num_cols()) != (edges.num_rows(), edges.num_cols()) {
            self.reset(edges.num_rows(), edges.num_cols());
            return;
        }
        for row in 0..self.row_mate.len() {
            if let Some(col) = self.row_mate[row]
                && !edges.contains(row, col)
            {
                self.row_mate[row] = None;
                self.col_mate[col] = None;
                self.size -= 1;
            }
        }
    }

    /// Returns the matched pairs ordered by row.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.row_mate
            .iter()
            .enumerate()
            .filter_map(|(r, mate)| mate.map(|c| (r, c)))
    }

    /// Returns the first row without a partner.
    #[inline]
    pub fn first_free_row(&self) -> Option<usize> {
        self.row_mate.iter().position(Option::is_none)
    }
}

/// A strategy for computing a maximum-cardinality matching.
pub trait MaximumMatcher {
    /// Returns the name of the matcher.
    fn name(&self) -> &str;

    /// Turns `matching` into a maximum matching of `edges` and returns the
    /// number of search nodes expanded.
    ///
    /// `matching` may hold the result of an earlier call. A matcher either
    /// starts over or extends the pairs that are still edges.
    fn maximum_matching(&mut self, edges: &ZeroEdges, matching: &mut Matching) -> u64;
}

impl std::fmt::Debug for dyn MaximumMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MaximumMatcher({})", self.name())
    }
}

/// Resets `bits` to `len` cleared bits.
#[inline]
pub(crate) fn reset_bits(bits: &mut FixedBitSet, len: usize) {
    bits.clear();
    bits.grow(len);
}

/// Exhaustive backtracking matcher.
#[derive(Clone, Debug, Default)]
pub struct BacktrackingMatcher {
    row_used: FixedBitSet,
    col_used: FixedBitSet,
    /// Indices into the row-major edge list of the edges currently chosen.
    chosen: Vec<usize>,
    best: Vec<usize>,
}

impl BacktrackingMatcher {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MaximumMatcher for BacktrackingMatcher {
    fn name(&self) -> &str {
        "BacktrackingMatcher"
    }

    fn maximum_matching(&mut self, edges: &ZeroEdges, matching: &mut Matching) -> u64 {
        let num_rows = edges.num_rows();
        let num_cols = edges.num_cols();
        let all = edges.edges();
        let limit = num_rows.min(num_cols);

        reset_bits(&mut self.row_used, num_rows);
        reset_bits(&mut self.col_used, num_cols);
        self.chosen.clear();
        self.best.clear();

        let mut nodes = 0u64;
        let mut cursor = 0usize;

        while limit > 0 && !all.is_empty() {
            let mut descended = false;
            while cursor < all.len() {
                let (r, c) = all[cursor];
                // Later edges start at row `r` or below; each adds one row at most.
                if self.chosen.len() + (num_rows - r) <= self.best.len() {
                    cursor = all.len();
                    break;
                }
                if !self.row_used.contains(r) && !self.col_used.contains(c) {
                    self.row_used.insert(r);
                    self.col_used.insert(c);
                    self.chosen.push(cursor);
                    cursor += 1;
                    nodes += 1;
                    descended = true;
                    break;
                }
                cursor += 1;
            }

            if descended {
                if self.chosen.len() > self.best.len() {
                    self.best.clone_from(&self.chosen);
                    if self.best.len() == limit {
                        break;
                    }
                }
                continue;
            }

            match self.chosen.pop() {
                Some(i) => {
                    let (r, c) = all[i];
                    self.row_used.set(r, false);
                    self.col_used.set(c, false);
                    cursor = i + 1;
                }
                None => break,
            }
        }

        matching.reset(num_rows, num_cols);
        for &i in &self.best {
            let (r, c) = all[i];
            matching.insert(r, c);
        }

        log::trace!(
            "backtracking matcher: {} of {} rows matched after {} nodes",
            matching.len(),
            num_rows,
            nodes
        );
        nodes
    }
}

/// A frame of the iterative augmenting-path search.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AugmentFrame {
    row: usize,
    /// Offset of the next edge of `row` to try.
    next: usize,
}

/// Searches an augmenting path from the free row `root` and flips it.
///
/// Columns in `visited_cols` are skipped and every column the search
/// enters is added to it. Returns whether the matching grew and the number
/// of columns entered.
pub(crate) fn augment_from_row(
    root: usize,
    edges: &ZeroEdges,
    matching: &mut Matching,
    visited_cols: &mut FixedBitSet,
    stack: &mut Vec<AugmentFrame>,
) -> (bool, u64) {
    debug_assert!(
        !matching.is_row_matched(root),
        "called `augment_from_row` with matched row {}",
        root
    );

    let mut nodes = 0u64;
    stack.clear();
    stack.push(AugmentFrame { row: root, next: 0 });

    while let Some(frame) = stack.last_mut() {
        let Some(&(_, col)) = edges.row_edges(frame.row).get(frame.next) else {
            stack.pop();
            continue;
        };
        frame.next += 1;

        if visited_cols.contains(col) {
            continue;
        }
        visited_cols.insert(col);
        nodes += 1;

        match matching.mate_of_col(col) {
            Some(next_row) => stack.push(AugmentFrame {
                row: next_row,
                next: 0,
            }),
            None => {
                // Every frame's last tried edge lies on the path.
                matching.augment(
                    stack
                        .iter()
                        .map(|f| (f.row, edges.row_edges(f.row)[f.next - 1].1)),
                );
                stack.clear();
                return (true, nodes);
            }
        }
    }

    (false, nodes)
}

/// Augmenting-path (Kuhn) matcher with an explicit stack.
#[derive(Clone, Debug, Default)]
pub struct AugmentingPathMatcher {
    visited_cols: FixedBitSet,
    stack: Vec<AugmentFrame>,
}

impl AugmentingPathMatcher {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MaximumMatcher for AugmentingPathMatcher {
    fn name(&self) -> &str {
        "AugmentingPathMatcher"
    }

    fn maximum_matching(&mut self, edges: &ZeroEdges, matching: &mut Matching) -> u64 {
        let num_rows = edges.num_rows();
        let num_cols = edges.num_cols();
        matching.retain_edges(edges);
        let limit = num_rows.min(num_cols);

        let mut nodes = 0u64;
        for row in 0..num_rows {
            if matching.len() == limit {
                break;
            }
            if matching.is_row_matched(row) {
                continue;
            }
            reset_bits(&mut self.visited_cols, num_cols);
            let (_, explored) =
                augment_from_row(row, edges, matching, &mut self.visited_cols, &mut self.stack);
            nodes = nodes.saturating_add(explored);
        }

        log::trace!(
            "augmenting-path matcher: {} of {} rows matched after {} nodes",
            matching.len(),
            num_rows,
            nodes
        );
        nodes
    }
}

/// How the solver picks a matcher for the cover step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MatchingStrategy {
    /// Always use the exhaustive `BacktrackingMatcher`.
    Backtracking,
    /// Always use the `AugmentingPathMatcher`.
    AugmentingPath,
    /// Backtracking up to the solver's backtracking limit, augmenting paths above it.
    #[default]
    Auto,
}

impl std::fmt::Display for MatchingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchingStrategy::Backtracking => write!(f, "Backtracking"),
            MatchingStrategy::AugmentingPath => write!(f, "AugmentingPath"),
            MatchingStrategy::Auto => write!(f, "Auto"),
        }
    }
}
