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

//! Minimum line covers of the zero cells.
//!
//! By König's theorem the minimum number of lines (rows and columns) that
//! cover every zero of a table equals the size of a maximum matching over
//! the zero edges. `AlternatingPathLabeler` turns a maximum matching into
//! such a cover:
//!
//! 1. Every free column seeds the traversal.
//! 2. From a reached column, follow non-matching edges to rows.
//! 3. From a reached row, follow its matching edge to its column.
//! 4. The cover is every reached row plus every matched column that was
//!    not reached.
//!
//! A reached row is always matched, otherwise the traversal would have
//! found an augmenting path. Every matching edge therefore contributes
//! exactly one line, and the cover has as many lines as the matching has
//! edges.
//!
//! `CoverFinder` bundles the zero-edge graph, a matcher and the labeler for
//! the solver's covering loop.

use crate::{
    graph::ZeroEdges,
    matching::{
        AugmentingPathMatcher, BacktrackingMatcher, Matching, MatchingStrategy, MaximumMatcher,
        reset_bits,
    },
    table::CostTable,
};
use fixedbitset::FixedBitSet;
use roster_core::num::cost::CostNumeric;
use std::collections::VecDeque;

/// A set of covering lines: some rows and some columns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoveringSet {
    rows: FixedBitSet,
    cols: FixedBitSet,
}

impl CoveringSet {
    /// Creates an empty cover for a `num_rows x num_cols` table.
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Self {
            rows: FixedBitSet::with_capacity(num_rows),
            cols: FixedBitSet::with_capacity(num_cols),
        }
    }

    /// Removes all lines and resizes the cover.
    pub fn reset(&mut self, num_rows: usize, num_cols: usize) {
        reset_bits(&mut self.rows, num_rows);
        reset_bits(&mut self.cols, num_cols);
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn num_cols(&self) -> usize {
        self.cols.len()
    }

    #[inline]
    pub fn cover_row(&mut self, row: usize) {
        self.rows.insert(row);
    }

    #[inline]
    pub fn cover_col(&mut self, col: usize) {
        self.cols.insert(col);
    }

    #[inline]
    pub fn covers_row(&self, row: usize) -> bool {
        self.rows.contains(row)
    }

    #[inline]
    pub fn covers_col(&self, col: usize) -> bool {
        self.cols.contains(col)
    }

    /// Returns `true` if neither the row nor the column of the cell is covered.
    #[inline]
    pub fn is_uncovered(&self, row: usize, col: usize) -> bool {
        !self.covers_row(row) && !self.covers_col(col)
    }

    /// Returns `true` if both the row and the column of the cell are covered.
    #[inline]
    pub fn is_doubly_covered(&self, row: usize, col: usize) -> bool {
        self.covers_row(row) && self.covers_col(col)
    }

    #[inline]
    pub fn num_covered_rows(&self) -> usize {
        self.rows.count_ones(..)
    }

    #[inline]
    pub fn num_covered_cols(&self) -> usize {
        self.cols.count_ones(..)
    }

    /// Returns the total number of covering lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.num_covered_rows() + self.num_covered_cols()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn covered_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.ones()
    }

    pub fn covered_cols(&self) -> impl Iterator<Item = usize> + '_ {
        self.cols.ones()
    }

    /// Returns `true` if every edge touches a covering line.
    pub fn covers_all(&self, edges: &ZeroEdges) -> bool {
        edges
            .edges()
            .iter()
            .all(|&(r, c)| self.covers_row(r) || self.covers_col(c))
    }
}

impl std::fmt::Display for CoveringSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows: Vec<_> = self.covered_rows().collect();
        let cols: Vec<_> = self.covered_cols().collect();
        write!(f, "CoveringSet(rows: {:?}, cols: {:?})", rows, cols)
    }
}

/// Derives a minimum cover from a maximum matching by alternating traversal.
#[derive(Clone, Debug, Default)]
pub struct AlternatingPathLabeler {
    reached_rows: FixedBitSet,
    reached_cols: FixedBitSet,
    queue: VecDeque<usize>,
}

impl AlternatingPathLabeler {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the cover derived from `matching` into `cover`.
    ///
    /// If `matching` is maximum, the cover has exactly `matching.len()`
    /// lines and touches every edge.
    pub fn label(&mut self, edges: &ZeroEdges, matching: &Matching, cover: &mut CoveringSet) {
        let num_rows = edges.num_rows();
        let num_cols = edges.num_cols();
        debug_assert_eq!(
            (matching.num_rows(), matching.num_cols()),
            (num_rows, num_cols),
            "called `AlternatingPathLabeler::label` with a matching of different dimensions"
        );

        reset_bits(&mut self.reached_rows, num_rows);
        reset_bits(&mut self.reached_cols, num_cols);
        self.queue.clear();

        for col in 0..num_cols {
            if !matching.is_col_matched(col) {
                self.reached_cols.insert(col);
                self.queue.push_back(col);
            }
        }

        while let Some(col) = self.queue.pop_front() {
            for &row in edges.col_neighbors(col) {
                if matching.mate_of_col(col) == Some(row) || self.reached_rows.put(row) {
                    continue;
                }
                if let Some(mate) = matching.mate_of_row(row)
                    && !self.reached_cols.put(mate)
                {
                    self.queue.push_back(mate);
                }
            }
        }

        cover.reset(num_rows, num_cols);
        for row in self.reached_rows.ones() {
            if matching.is_row_matched(row) {
                cover.cover_row(row);
            }
        }
        for col in 0..num_cols {
            if matching.is_col_matched(col) && !self.reached_cols.contains(col) {
                cover.cover_col(col);
            }
        }

        log::trace!(
            "labeler: {} rows, {} columns cover {} matched pairs",
            cover.num_covered_rows(),
            cover.num_covered_cols(),
            matching.len()
        );
    }
}

/// The result of one cover step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoverReport {
    /// Size of the maximum matching (equals the number of covering lines).
    pub matching_size: usize,
    /// Search nodes the matcher expanded.
    pub matcher_nodes: u64,
}

/// Finds a minimum cover of the zero cells of a table.
///
/// Holds the zero-edge graph, the matching and the cover between calls, so
/// the covering loop allocates once per solve.
#[derive(Debug, Default)]
pub struct CoverFinder {
    strategy: MatchingStrategy,
    backtracking_limit: usize,
    edges: ZeroEdges,
    matching: Matching,
    cover: CoveringSet,
    backtracking: BacktrackingMatcher,
    augmenting: AugmentingPathMatcher,
    labeler: AlternatingPathLabeler,
}

impl CoverFinder {
    /// Creates a cover finder. With `MatchingStrategy::Auto` the exhaustive
    /// matcher is used for square tables with at most `backtracking_limit`
    /// rows.
    pub fn new(strategy: MatchingStrategy, backtracking_limit: usize) -> Self {
        Self {
            strategy,
            backtracking_limit,
            ..Self::default()
        }
    }

    #[inline]
    pub fn strategy(&self) -> MatchingStrategy {
        self.strategy
    }

    /// Returns `true` if a `num_rows x num_cols` table is matched by the
    /// exhaustive matcher.
    ///
    /// Rectangular tables always use augmenting paths under `Auto`: only
    /// that matcher keeps earlier pairs, which the rectangular covering
    /// loop relies on.
    pub fn uses_backtracking(&self, num_rows: usize, num_cols: usize) -> bool {
        match self.strategy {
            MatchingStrategy::Backtracking => true,
            MatchingStrategy::AugmentingPath => false,
            MatchingStrategy::Auto => num_rows == num_cols && num_rows <= self.backtracking_limit,
        }
    }

    /// Recomputes the zero edges of `table`, a maximum matching over them,
    /// and the minimum cover derived from it.
    ///
    /// The matching of the previous call is handed to the matcher, so a
    /// finder should be `reset` before it moves on to an unrelated table.
    pub fn find<T>(&mut self, table: &CostTable<T>) -> CoverReport
    where
        T: CostNumeric,
    {
        self.edges.rebuild(table);

        let mut matching = std::mem::take(&mut self.matching);
        let edges = std::mem::take(&mut self.edges);
        let matcher: &mut dyn MaximumMatcher =
            if self.uses_backtracking(table.num_rows(), table.num_cols()) {
                &mut self.backtracking
            } else {
                &mut self.augmenting
            };
        let matcher_nodes = matcher.maximum_matching(&edges, &mut matching);
        self.labeler.label(&edges, &matching, &mut self.cover);
        self.edges = edges;
        self.matching = matching;

        debug_assert!(
            self.cover.covers_all(&self.edges),
            "called `CoverFinder::find` and the derived cover misses a zero"
        );
        debug_assert_eq!(
            self.cover.len(),
            self.matching.len(),
            "called `CoverFinder::find` and the cover size differs from the matching size"
        );

        CoverReport {
            matching_size: self.matching.len(),
            matcher_nodes,
        }
    }

    /// Forgets the matching of the previous `find`.
    #[inline]
    pub fn reset(&mut self) {
        self.matching.reset(0, 0);
    }

    /// The zero edges of the last table passed to `find`.
    #[inline]
    pub fn edges(&self) -> &ZeroEdges {
        &self.edges
    }

    /// The maximum matching of the last `find`.
    #[inline]
    pub fn matching(&self) -> &Matching {
        &self.matching
    }

    /// The cover of the last `find`.
    #[inline]
    pub fn cover(&self) -> &CoveringSet {
        &self.cover
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn cover_of(edges: &ZeroEdges, matching: &Matching) -> CoveringSet {
        let mut cover = CoveringSet::default();
        AlternatingPathLabeler::new().label(edges, matching, &mut cover);
        cover
    }

    #[test]
    fn test_covering_set_queries() {
        let mut cover = CoveringSet::new(3, 3);
        cover.cover_row(1);
        cover.cover_col(2);
        assert_eq!(cover.len(), 2);
        assert!(cover.is_uncovered(0, 0));
        assert!(cover.is_doubly_covered(1, 2));
        assert!(!cover.is_doubly_covered(1, 0));
        assert_eq!(cover.to_string(), "CoveringSet(rows: [1], cols: [2])");
    }

    #[test]
    fn test_two_way_traversal_covers_every_zero() {
        // Matching {r0-c0, r1-c1}; zeros (r0, c2) and (r1, c0) as well.
        // Starting from free column c2 reaches r0, then c0, then r1.
        let g = ZeroEdges::from_pairs(2, 3, &[(0, 0), (0, 2), (1, 0), (1, 1)]);
        let mut m = Matching::new(2, 3);
        m.insert(0, 0);
        m.insert(1, 1);

        let cover = cover_of(&g, &m);
        assert_eq!(cover.covered_rows().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(cover.num_covered_cols(), 0);
        assert!(cover.covers_all(&g));
    }

    #[test]
    fn test_perfect_matching_covers_with_n_lines() {
        let g = ZeroEdges::from_pairs(3, 3, &[(0, 0), (1, 1), (2, 2), (0, 1)]);
        let mut m = Matching::new(3, 3);
        m.insert(0, 0);
        m.insert(1, 1);
        m.insert(2, 2);
        let cover = cover_of(&g, &m);
        assert_eq!(cover.len(), 3);
        assert!(cover.covers_all(&g));
    }

    #[test]
    fn test_konig_equality_on_random_graphs() {
        let mut rng = StdRng::seed_from_u64(1234);
        let mut matcher = AugmentingPathMatcher::new();

        for _ in 0..500 {
            let rows = rng.gen_range(1..=7);
            let cols = rng.gen_range(1..=7);
            let density = rng.gen_range(0.05..0.6);
            let mut pairs = Vec::new();
            for r in 0..rows {
                for c in 0..cols {
                    if rng.gen_bool(density) {
                        pairs.push((r, c));
                    }
                }
            }
            let g = ZeroEdges::from_pairs(rows, cols, &pairs);
            let mut m = Matching::default();
            matcher.maximum_matching(&g, &mut m);

            let cover = cover_of(&g, &m);
            assert_eq!(cover.len(), m.len());
            assert!(cover.covers_all(&g));
        }
    }

    #[test]
    fn test_cover_finder_uses_configured_matcher() {
        let t = CostTable::from_rows(&[vec![0i64, 0, 3], vec![0, 2, 2], vec![4, 0, 1]]);

        for strategy in [
            MatchingStrategy::Backtracking,
            MatchingStrategy::AugmentingPath,
            MatchingStrategy::Auto,
        ] {
            let mut finder = CoverFinder::new(strategy, 8);
            let report = finder.find(&t);
            assert_eq!(finder.strategy(), strategy);
            assert_eq!(report.matching_size, 2);
            assert_eq!(finder.cover().len(), 2);
            assert!(finder.cover().covers_all(finder.edges()));
            assert_eq!(finder.matching().len(), 2);
            assert!(report.matcher_nodes > 0);
        }
    }

    #[test]
    fn test_auto_backtracks_only_on_small_square_tables() {
        let finder = CoverFinder::new(MatchingStrategy::Auto, 4);
        assert!(finder.uses_backtracking(4, 4));
        assert!(!finder.uses_backtracking(5, 5));
        assert!(!finder.uses_backtracking(2, 3));
        assert!(CoverFinder::new(MatchingStrategy::Backtracking, 4).uses_backtracking(9, 9));
        assert!(!CoverFinder::new(MatchingStrategy::AugmentingPath, 4).uses_backtracking(1, 1));
    }

    #[test]
    fn test_cover_finder_keeps_matched_columns_across_steps() {
        let mut finder = CoverFinder::new(MatchingStrategy::AugmentingPath, 8);
        let first = CostTable::from_rows(&[vec![0i64, 0, 1], vec![0, 2, 3]]);
        assert_eq!(finder.find(&first).matching_size, 2);
        let matched_before: Vec<_> = (0..3).filter(|&c| finder.matching().is_col_matched(c)).collect();

        // Zeros only appear; every matched pair stays an edge.
        let second = CostTable::from_rows(&[vec![0i64, 0, 0], vec![0, 2, 0]]);
        finder.find(&second);
        for c in matched_before {
            assert!(finder.matching().is_col_matched(c));
        }

        finder.reset();
        assert!(finder.matching().is_empty());
    }

    #[test]
    fn test_cover_finder_reuses_buffers_across_sizes() {
        let mut finder = CoverFinder::new(MatchingStrategy::Auto, 1);
        let big = CostTable::from_rows(&[vec![0i64, 1], vec![1, 0]]);
        assert_eq!(finder.find(&big).matching_size, 2);
        let small = CostTable::from_rows(&[vec![0i64]]);
        assert_eq!(finder.find(&small).matching_size, 1);
        assert_eq!(finder.cover().num_rows(), 1);
    }
}
