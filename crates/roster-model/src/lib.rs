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

//! # Roster Model
//!
//! **The domain model for the Roster worker/task assignment solver.**
//!
//! This crate defines the data structures exchanged between the caller
//! (which derives a cost for every worker/task pair) and the solving engine
//! (`roster_hungarian`).
//!
//! ## Architecture
//!
//! * **`index`**: Strongly typed wrappers (`WorkerIndex`, `TaskIndex`) so a
//!   worker row is never confused with a task column.
//! * **`matrix`**: The immutable, validated `CostMatrix` (row-major, flat
//!   storage) and the mutable `CostMatrixBuilder`, plus helpers to pad a
//!   matrix with zero-cost dummy workers or tasks.
//! * **`loading`**: A whitespace-delimited text loader for cost matrices.
//! * **`assignment`**: The solver output: per-worker task lists and the
//!   total original cost.
//!
//! ## Design Philosophy
//!
//! 1.  **Type Safety**: Worker and task indices are distinct types.
//! 2.  **Fail-Fast**: Ragged rows, empty matrices, NaN and negative costs are
//!     rejected when the matrix is built, so the solver never sees them.
//! 3.  **Explicit Forbidden Pairs**: Infinite or unset costs mark their pair
//!     as forbidden in a bitset beside the costs, so every finite cost of the
//!     numeric type stays assignable.

pub mod assignment;
pub mod index;
pub mod loading;
pub mod matrix;
