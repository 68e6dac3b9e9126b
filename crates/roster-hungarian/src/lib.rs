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

//! # Roster Hungarian
//!
//! **Minimum-cost worker/task assignment with the Hungarian method.**
//!
//! Given a `CostMatrix<T>` (rows are workers, columns are tasks), the solver
//! reduces the costs, repeatedly covers the zeros with a minimum set of lines
//! and shifts the uncovered costs until a complete assignment along zero
//! cells exists, then extracts it.
//!
//! ## Architecture
//!
//! * **`table`**: `CostTable<T>`, the mutable working copy of a matrix.
//! * **`reduce`**: Row/column reduction and the cost adjustment step.
//! * **`graph`**: `ZeroEdges`, the zero cells as a bipartite edge set.
//! * **`matching`**: `Matching`, the `MaximumMatcher` trait and its
//!   backtracking and augmenting-path implementations.
//! * **`cover`**: `CoveringSet`, the alternating-path labeler (König's
//!   theorem) and the `CoverFinder` used by the covering loop.
//! * **`assign`**: `JobAssigner`, greedy extraction with augmenting-path repair
//!   and alternating-path placement of required columns.
//! * **`solver`**: `HungarianSolver`, its builder, and the `solve` function.
//! * **`monitor`**: Hooks to observe, log, and stop a solve.
//! * **`result`**, **`stats`**, **`error`**: Outcome, statistics and error types.
//!
//! ## Example
//!
//! ```rust
//! use roster_hungarian::solve;
//!
//! let result = solve(&[vec![4i64, 1, 3], vec![2, 0, 5], vec![3, 2, 2]]).unwrap();
//! let assignment = result.assignment().unwrap();
//! assert_eq!(assignment.to_nested(), vec![vec![1], vec![0], vec![2]]);
//! assert_eq!(assignment.total_cost(), 5);
//! ```

pub mod assign;
pub mod cover;
pub mod error;
pub mod graph;
pub mod matching;
pub mod monitor;
pub mod reduce;
pub mod result;
pub mod solver;
pub mod stats;
pub mod table;

pub use solver::solve;
