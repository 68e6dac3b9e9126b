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

//! # Cost Numerics
//!
//! `CostNumeric` collects the bounds the assignment pipeline needs from a
//! cost type: ordinary arithmetic (`num_traits::Num`), a total-enough order
//! (`PartialOrd`), formatting, and thread-safety. On top of that every
//! implementing type provides:
//!
//! - `normalize_cost`: maps a raw input to the value the solver stores, or
//!   `None` when the input is not a valid cost (NaN or negative). Every finite
//!   non-negative value is kept as is.
//! - `is_infinite_cost`: `true` for inputs that mark a forbidden pair. Only
//!   floating point infinity qualifies; integer types have no such value and
//!   forbid pairs explicitly through the matrix builder.
//! - `checked_add_cost`: addition that reports overflow (or, for floats, a
//!   non-finite result) as `None`.
//!
//! ```rust
//! use roster_core::num::cost::CostNumeric;
//!
//! assert_eq!(f64::NAN.normalize_cost(), None);
//! assert_eq!((-3i64).normalize_cost(), None);
//! assert_eq!(i32::MAX.normalize_cost(), Some(i32::MAX));
//! assert!(f64::INFINITY.is_infinite_cost());
//! assert_eq!(i32::MAX.checked_add_cost(1), None);
//! ```

use num_traits::Num;

/// Numeric types that can be stored in a cost matrix.
pub trait CostNumeric:
    Num + PartialOrd + Copy + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static
{
    /// Normalizes a raw cost. Returns `None` for NaN or negative values and
    /// `Some(self)` otherwise, folding `-0.0` into `+0.0`.
    fn normalize_cost(self) -> Option<Self>;

    /// Returns `true` if `self` marks a pair that must not be assigned.
    #[inline]
    fn is_infinite_cost(self) -> bool {
        false
    }

    /// Adds two costs, returning `None` if the sum cannot be represented.
    fn checked_add_cost(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_cost_numeric_signed {
    ($($t:ty),* $(,)?) => {
        $(
            impl CostNumeric for $t {
                #[inline]
                fn normalize_cost(self) -> Option<Self> {
                    (self >= 0).then_some(self)
                }

                #[inline(always)]
                fn checked_add_cost(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_add(self, rhs)
                }
            }
        )*
    };
}

macro_rules! impl_cost_numeric_unsigned {
    ($($t:ty),* $(,)?) => {
        $(
            impl CostNumeric for $t {
                #[inline]
                fn normalize_cost(self) -> Option<Self> {
                    Some(self)
                }

                #[inline(always)]
                fn checked_add_cost(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_add(self, rhs)
                }
            }
        )*
    };
}

macro_rules! impl_cost_numeric_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl CostNumeric for $t {
                #[inline]
                fn normalize_cost(self) -> Option<Self> {
                    if self.is_nan() || self < 0.0 {
                        return None;
                    }
                    // Folds -0.0 into +0.0.
                    Some(self + 0.0)
                }

                #[inline]
                fn is_infinite_cost(self) -> bool {
                    self.is_infinite()
                }

                #[inline(always)]
                fn checked_add_cost(self, rhs: Self) -> Option<Self> {
                    let sum = self + rhs;
                    sum.is_finite().then_some(sum)
                }
            }
        )*
    };
}

impl_cost_numeric_signed!(i32, i64, isize);
impl_cost_numeric_unsigned!(u32, u64, usize);
impl_cost_numeric_float!(f32, f64);
