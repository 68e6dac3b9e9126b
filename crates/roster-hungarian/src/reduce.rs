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

//! Matrix reduction and cost adjustment.
//!
//! Both steps preserve the set of optimal assignments: subtracting a
//! constant from a whole row (or column) shifts the cost of every complete
//! assignment by the same amount. The reducer creates the first zeros; the
//! adjuster creates new zeros whenever the current ones cannot be covered by
//! fewer lines than there are rows.

use crate::{cover::CoveringSet, table::CostTable, table::min_of};
use roster_core::num::cost::CostNumeric;

/// Subtracts the minimum of every row from that row.
///
/// Afterwards every row with an allowed cell contains at least one zero.
/// Forbidden cells are left untouched.
pub fn reduce_rows<T>(table: &mut CostTable<T>)
where
    T: CostNumeric,
{
    for r in 0..table.num_rows() {
        let Some(min) = table.row_min(r) else {
            continue;
        };
        if min == T::zero() {
            continue;
        }
        for c in 0..table.num_cols() {
            if !table.is_forbidden(r, c) {
                table.set(r, c, table.get(r, c) - min);
            }
        }
    }
}

/// Subtracts the minimum of every column from that column.
///
/// Columns are reduced by transposing, reducing rows, and transposing back.
pub fn reduce_columns<T>(table: &mut CostTable<T>)
where
    T: CostNumeric,
{
    let mut transposed = table.transposed();
    reduce_rows(&mut transposed);
    *table = transposed.transposed();
}

/// Reduces rows, then columns if the table is not wider than it is tall.
///
/// A table with more columns than rows leaves some columns unassigned, and
/// subtracting a column minimum would favour leaving exactly those columns
/// out. Such tables are only row-reduced.
///
/// Applying it to an already reduced table is a no-op.
#[inline]
pub fn reduce<T>(table: &mut CostTable<T>)
where
    T: CostNumeric,
{
    reduce_rows(table);
    if table.num_cols() <= table.num_rows() {
        reduce_columns(table);
    }
}

/// A doubly covered cell whose cost would overflow when adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustOverflow {
    pub row: usize,
    pub col: usize,
}

/// Shifts the table by the smallest allowed uncovered value.
///
/// The minimum over all allowed uncovered cells is subtracted from every
/// allowed uncovered cell and added to every allowed doubly covered cell;
/// singly covered and forbidden cells stay unchanged.
///
/// Returns `Ok(Some(delta))` with the applied minimum, or `Ok(None)` if no
/// allowed cell is uncovered. In that case no complete matching on allowed
/// cells exists, because the covering lines already hold every allowed cell.
///
/// # Errors
///
/// Returns `AdjustOverflow` if a doubly covered cell cannot absorb the
/// minimum. The table is not modified in that case.
pub fn adjust_costs<T>(
    table: &mut CostTable<T>,
    cover: &CoveringSet,
) -> Result<Option<T>, AdjustOverflow>
where
    T: CostNumeric,
{
    debug_assert_eq!(
        (cover.num_rows(), cover.num_cols()),
        (table.num_rows(), table.num_cols()),
        "called `adjust_costs` with a cover of different dimensions"
    );

    let num_rows = table.num_rows();
    let num_cols = table.num_cols();
    let view: &CostTable<T> = table;
    let cells = move |row_covered: bool, col_covered: bool| {
        (0..num_rows)
            .filter(move |&r| cover.covers_row(r) == row_covered)
            .flat_map(move |r| {
                (0..num_cols)
                    .filter(move |&c| cover.covers_col(c) == col_covered)
                    .map(move |c| (r, c))
            })
            .filter(move |&(r, c)| !view.is_forbidden(r, c))
    };

    let Some(delta) = min_of(cells(false, false).map(|(r, c)| view.get(r, c))) else {
        return Ok(None);
    };

    let doubly: Vec<(usize, usize)> = cells(true, true).collect();
    if let Some(&(row, col)) = doubly
        .iter()
        .find(|&&(r, c)| view.get(r, c).checked_add_cost(delta).is_none())
    {
        return Err(AdjustOverflow { row, col });
    }

    for r in (0..num_rows).filter(|&r| !cover.covers_row(r)) {
        for c in (0..num_cols).filter(|&c| !cover.covers_col(c)) {
            if !table.is_forbidden(r, c) {
                table.set(r, c, table.get(r, c) - delta);
            }
        }
    }
    for (r, c) in doubly {
        table.set(r, c, table.get(r, c) + delta);
    }

    log::trace!("adjusted uncovered cells by {}", delta);
    Ok(Some(delta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn table(rows: &[Vec<i64>]) -> CostTable<i64> {
        CostTable::from_rows(rows)
    }

    fn every_row_and_col_has_zero(t: &CostTable<i64>) -> bool {
        let rows_ok = (0..t.num_rows()).all(|r| (0..t.num_cols()).any(|c| t.is_zero(r, c)));
        let cols_ok = (0..t.num_cols()).all(|c| (0..t.num_rows()).any(|r| t.is_zero(r, c)));
        rows_ok && cols_ok
    }

    #[test]
    fn test_reduce_rows() {
        let mut t = table(&[vec![3, 5, 4], vec![2, 2, 9], vec![0, 7, 1]]);
        reduce_rows(&mut t);
        assert_eq!(t.values(), &[0, 2, 1, 0, 0, 7, 0, 7, 1]);
    }

    #[test]
    fn test_reduce_columns() {
        let mut t = table(&[vec![3, 5, 4], vec![2, 6, 9]]);
        reduce_columns(&mut t);
        assert_eq!(t.values(), &[1, 0, 0, 0, 1, 5]);
    }

    #[test]
    fn test_wide_table_is_only_row_reduced() {
        // Reducing column 0 would make the cheap pair (0, 2) look worse.
        let mut t = table(&[vec![0, 3, 1], vec![0, 9, 3]]);
        reduce(&mut t);
        assert_eq!(t.values(), &[0, 3, 1, 0, 9, 3]);

        let mut tall = table(&[vec![3, 5], vec![2, 6], vec![4, 9]]);
        reduce(&mut tall);
        assert_eq!(tall.values(), &[0, 0, 0, 2, 0, 3]);
    }

    #[test]
    fn test_reduce_skips_forbidden_cells() {
        let mut t = table(&[vec![5, 2], vec![7, 4]]);
        t.forbid(0, 1);
        reduce(&mut t);
        // Row minima over allowed cells are 5 and 4.
        assert_eq!(t.values(), &[0, 2, 3, 0]);
        assert_eq!(t.count_zeros(), 2);
        assert!(!t.is_zero(0, 1));
    }

    #[test]
    fn test_single_cell_reduces_to_zero() {
        let mut t = table(&[vec![5]]);
        reduce(&mut t);
        assert_eq!(t.values(), &[0]);
    }

    #[test]
    fn test_reduce_random_tables_zero_per_line_and_idempotent() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let n = rng.gen_range(1..=6);
            let rows: Vec<Vec<i64>> = (0..n)
                .map(|_| (0..n).map(|_| rng.gen_range(0..20)).collect())
                .collect();
            let mut t = table(&rows);
            reduce(&mut t);
            assert!(every_row_and_col_has_zero(&t));
            assert!(t.values().iter().all(|&v| v >= 0));

            let once = t.clone();
            reduce(&mut t);
            assert_eq!(t, once);
        }
    }

    #[test]
    fn test_reduce_floats_produces_exact_zeros() {
        let mut t = CostTable::from_rows(&[vec![0.3, 0.1, 0.7], vec![0.2, 0.9, 0.6]]);
        reduce(&mut t);
        assert_eq!(t.count_zeros(), 3);
        assert!(t.values().iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_adjust_costs_updates_cells_by_cover() {
        let mut t = table(&[vec![0, 1, 3], vec![2, 0, 4], vec![5, 2, 6]]);
        let mut cover = CoveringSet::new(3, 3);
        cover.cover_row(0);
        cover.cover_col(1);

        let delta = adjust_costs(&mut t, &cover);
        assert_eq!(delta, Ok(Some(2)));
        // Row 0 covered, col 1 covered; (0, 1) doubly covered.
        assert_eq!(t.values(), &[0, 3, 3, 0, 0, 2, 3, 2, 4]);
    }

    #[test]
    fn test_adjust_costs_fully_covered_returns_none() {
        let mut t = table(&[vec![0, 1], vec![1, 0]]);
        let mut cover = CoveringSet::new(2, 2);
        cover.cover_row(0);
        cover.cover_row(1);
        assert_eq!(adjust_costs(&mut t, &cover), Ok(None));
        assert_eq!(t.values(), &[0, 1, 1, 0]);
    }

    #[test]
    fn test_adjust_costs_ignores_forbidden_cells() {
        let mut t = table(&[vec![0, 1, 3], vec![2, 0, 4], vec![5, 2, 6]]);
        t.forbid(1, 0);
        t.forbid(0, 1);
        let mut cover = CoveringSet::new(3, 3);
        cover.cover_row(0);
        cover.cover_col(1);

        // Forbidden (1, 0) is never the minimum; neither forbidden cell moves.
        assert_eq!(adjust_costs(&mut t, &cover), Ok(Some(4)));
        assert_eq!(t.values(), &[0, 1, 3, 2, 0, 0, 1, 2, 2]);
    }

    #[test]
    fn test_adjust_costs_without_allowed_uncovered_cell_returns_none() {
        let mut t = table(&[vec![0, 0], vec![9, 9]]);
        t.forbid(1, 0);
        t.forbid(1, 1);
        let mut cover = CoveringSet::new(2, 2);
        cover.cover_row(0);
        assert_eq!(adjust_costs(&mut t, &cover), Ok(None));
        assert_eq!(t.values(), &[0, 0, 9, 9]);
    }

    #[test]
    fn test_adjust_costs_reports_overflow_without_modifying() {
        let mut t = CostTable::from_rows(&[vec![i32::MAX, 0], vec![0, 3]]);
        let mut cover = CoveringSet::new(2, 2);
        cover.cover_row(0);
        cover.cover_col(0);

        assert_eq!(
            adjust_costs(&mut t, &cover),
            Err(AdjustOverflow { row: 0, col: 0 })
        );
        assert_eq!(t.values(), &[i32::MAX, 0, 0, 3]);
    }

    #[test]
    fn test_adjust_costs_sum_decreases_by_delta_times_line_balance() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let n = rng.gen_range(2..=6);
            let rows: Vec<Vec<i64>> = (0..n)
                .map(|_| (0..n).map(|_| rng.gen_range(0..15)).collect())
                .collect();
            let mut t = table(&rows);
            reduce(&mut t);

            let mut cover = CoveringSet::new(n, n);
            for r in 0..n {
                if rng.gen_bool(0.3) {
                    cover.cover_row(r);
                }
            }
            for c in 0..n {
                if rng.gen_bool(0.3) {
                    cover.cover_col(c);
                }
            }

            let mut uncovered = 0i64;
            let mut doubly = 0i64;
            for r in 0..n {
                for c in 0..n {
                    if cover.is_uncovered(r, c) {
                        uncovered += 1;
                    } else if cover.is_doubly_covered(r, c) {
                        doubly += 1;
                    }
                }
            }

            let before = t.sum();
            match adjust_costs(&mut t, &cover).unwrap() {
                Some(delta) => {
                    assert_eq!(t.sum(), before - delta * (uncovered - doubly));
                    assert!(t.values().iter().all(|&v| v >= 0));
                }
                None => assert_eq!(uncovered, 0),
            }
        }
    }
}
