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

//! Cost matrix loader for whitespace-delimited text.
//!
//! The expected format is a pair of dimensions followed by the costs in
//! row-major order:
//!
//! ```raw
//! W T                      # number of workers, number of tasks
//! c_0_0 ... c_0_{T-1}      # costs of worker 0
//! ...
//! c_{W-1}_0 ... c_{W-1}_{T-1}
//! ```
//!
//! Tokens may be spread over any number of lines. Everything after a `#` up
//! to the end of the line is a comment. The tokens `-`, `inf` and `Infinity`
//! (case-insensitive) mark a forbidden pair, and a configurable threshold
//! (`forbid_at_least`) lets formats that spell "infinity" as a large number
//! forbid those pairs as well.

use crate::{
    index::{TaskIndex, WorkerIndex},
    matrix::{CostMatrix, CostMatrixBuilder, CostMatrixError},
};
use roster_core::num::cost::CostNumeric;
use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// The error type for the cost matrix loading process.
#[derive(Debug)]
pub enum CostMatrixLoaderError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input stream ended before all costs were read.
    UnexpectedEof,
    /// A token could not be parsed into the expected numeric type.
    Parse(ParseTokenError),
    /// The dimensions (W or T) are invalid (must be positive integers).
    InvalidDimensions,
    /// The costs did not form a valid matrix.
    Matrix(CostMatrixError),
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into (e.g., "f64").
    pub type_name: &'static str,
}

impl std::fmt::Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not parse token '{}' as type {}",
            self.token, self.type_name
        )
    }
}

impl std::error::Error for ParseTokenError {}

impl Display for CostMatrixLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof => write!(f, "Unexpected end of file while reading costs"),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::InvalidDimensions => {
                write!(f, "Matrix dimensions (W and T) must be positive integers")
            }
            Self::Matrix(e) => write!(f, "Matrix error: {}", e),
        }
    }
}

impl std::error::Error for CostMatrixLoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Matrix(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CostMatrixLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for CostMatrixLoaderError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

impl From<CostMatrixError> for CostMatrixLoaderError {
    fn from(e: CostMatrixError) -> Self {
        Self::Matrix(e)
    }
}

/// A configurable loader for cost matrices.
///
/// # Configuration
/// * `forbid_at_least`: Any cost $\ge$ this value marks its pair as forbidden.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostMatrixLoader<T> {
    forbid_at_least: Option<T>,
}

impl<T> Default for CostMatrixLoader<T> {
    fn default() -> Self {
        Self {
            forbid_at_least: None,
        }
    }
}

impl<T> CostMatrixLoader<T>
where
    T: CostNumeric + FromStr,
{
    /// Creates a new `CostMatrixLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a threshold value. Any cost read from the input that is greater than
    /// or equal to `v` is treated as forbidden.
    #[inline]
    pub fn forbid_at_least(mut self, v: T) -> Self {
        self.forbid_at_least = Some(v);
        self
    }

    /// Loads a matrix from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<CostMatrix<T>, CostMatrixLoaderError> {
        let mut sc = Scanner::new(rdr);

        let num_workers = sc.next_dimension()?;
        let num_tasks = sc.next_dimension()?;

        let mut builder = CostMatrixBuilder::new(num_workers, num_tasks);
        for w in 0..num_workers {
            let w_idx = WorkerIndex::new(w);
            for t in 0..num_tasks {
                let t_idx = TaskIndex::new(t);
                match sc.next_cost::<T>()? {
                    Some(cost) if self.forbid_at_least.is_some_and(|limit| cost >= limit) => {
                        builder.forbid(w_idx, t_idx);
                    }
                    Some(cost) => {
                        builder.set_cost(w_idx, t_idx, cost);
                    }
                    None => {
                        builder.forbid(w_idx, t_idx);
                    }
                }
            }
        }

        Ok(builder.build()?)
    }

    /// Loads a matrix from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<CostMatrix<T>, CostMatrixLoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads a matrix from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<CostMatrix<T>, CostMatrixLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads a matrix from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<CostMatrix<T>, CostMatrixLoaderError> {
        self.from_reader(s.as_bytes())
    }
}

#[inline]
fn is_forbidden_token(token: &str) -> bool {
    token == "-" || token.eq_ignore_ascii_case("inf") || token.eq_ignore_ascii_case("infinity")
}

/// Reads whitespace-delimited tokens from a generic reader.
struct Scanner<R> {
    rdr: R,
    buf: String,
    pos: usize,
}

impl<R: BufRead> Scanner<R> {
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
            pos: 0,
        }
    }

    /// Refills the internal line buffer. Returns `Ok(false)` on EOF.
    #[inline]
    fn fill_line(&mut self) -> Result<bool, CostMatrixLoaderError> {
        self.buf.clear();
        self.pos = 0;
        let n = self.rdr.read_line(&mut self.buf)?;
        Ok(n > 0)
    }

    /// Returns the next token, skipping whitespace and `#` comments.
    fn next_token(&mut self) -> Result<String, CostMatrixLoaderError> {
        loop {
            if self.pos >= self.buf.len() && !self.fill_line()? {
                return Err(CostMatrixLoaderError::UnexpectedEof);
            }

            let line = &self.buf[self.pos..];
            let content = line.split('#').next().unwrap_or("");
            let trimmed = content.trim_start();
            if trimmed.is_empty() {
                self.pos = self.buf.len();
                continue;
            }

            let start = self.pos + (content.len() - trimmed.len());
            let len = trimmed
                .find(char::is_whitespace)
                .unwrap_or(trimmed.len());
            self.pos = start + len;
            return Ok(self.buf[start..start + len].to_owned());
        }
    }

    fn next_dimension(&mut self) -> Result<usize, CostMatrixLoaderError> {
        let token = self.next_token()?;
        match token.parse::<usize>() {
            Ok(0) | Err(_) => Err(CostMatrixLoaderError::InvalidDimensions),
            Ok(n) => Ok(n),
        }
    }

    /// Reads the next cost; `None` marks a forbidden pair.
    fn next_cost<T>(&mut self) -> Result<Option<T>, CostMatrixLoaderError>
    where
        T: FromStr,
    {
        let token = self.next_token()?;
        if is_forbidden_token(&token) {
            return Ok(None);
        }
        token.parse::<T>().map(Some).map_err(|_| {
            CostMatrixLoaderError::Parse(ParseTokenError {
                token,
                type_name: std::any::type_name::<T>(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_INSTANCE: &str = r#"
        2 3         # W=2 workers, T=3 tasks
        4 1 3       # worker 0
        2 - 900     # worker 1
    "#;

    #[test]
    fn test_loads_and_maps_correctly() {
        let loader = CostMatrixLoader::new().forbid_at_least(900);
        let m: CostMatrix<i64> = loader.from_str(SMALL_INSTANCE).expect("Failed to load");

        assert_eq!(m.num_workers(), 2);
        assert_eq!(m.num_tasks(), 3);
        assert_eq!(m.row(0), &[4, 1, 3]);
        assert_eq!(m.cost(WorkerIndex::new(1), TaskIndex::new(0)), Some(2));
        assert!(m.is_forbidden(WorkerIndex::new(1), TaskIndex::new(1)));
        assert!(m.is_forbidden(WorkerIndex::new(1), TaskIndex::new(2)));
    }

    #[test]
    fn test_loads_floats_with_infinity_tokens() {
        let data = "1 3\n0.5 inf Infinity";
        let m: CostMatrix<f64> = CostMatrixLoader::new().from_str(data).unwrap();
        assert_eq!(m.row(0)[0], 0.5);
        assert!(m.is_forbidden(WorkerIndex::new(0), TaskIndex::new(1)));
        assert!(m.is_forbidden(WorkerIndex::new(0), TaskIndex::new(2)));
    }

    #[test]
    fn test_large_costs_are_not_forbidden_without_threshold() {
        let data = "1 2
10000000 4294967295";
        let m: CostMatrix<u32> = CostMatrixLoader::new().from_str(data).unwrap();
        assert_eq!(m.num_forbidden(), 0);
        assert_eq!(m.cost(WorkerIndex::new(0), TaskIndex::new(1)), Some(u32::MAX));
    }

    #[test]
    fn test_tokens_across_lines_and_comments() {
        let data = "# header\n2\n2 # dims\n1\n2 3\n# trailing\n4\n";
        let m: CostMatrix<u32> = CostMatrixLoader::new().from_str(data).unwrap();
        assert_eq!(m.costs(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_invalid_dimensions() {
        let res = CostMatrixLoader::<i64>::new().from_str("0 2");
        assert!(matches!(res, Err(CostMatrixLoaderError::InvalidDimensions)));

        let res = CostMatrixLoader::<i64>::new().from_str("two 2");
        assert!(matches!(res, Err(CostMatrixLoaderError::InvalidDimensions)));
    }

    #[test]
    fn test_unexpected_eof() {
        let res = CostMatrixLoader::<i64>::new().from_str("2 2 1 2 3");
        assert!(matches!(res, Err(CostMatrixLoaderError::UnexpectedEof)));
    }

    #[test]
    fn test_parse_error_structure() {
        let res = CostMatrixLoader::<i64>::new().from_str("1 2 5 garbage");
        match res {
            Err(CostMatrixLoaderError::Parse(e)) => {
                assert_eq!(e.token, "garbage");
                assert!(e.type_name.contains("i64"));
            }
            _ => panic!("Expected Parse error with context"),
        }
    }

    #[test]
    fn test_negative_cost_is_matrix_error() {
        let res = CostMatrixLoader::<i64>::new().from_str("1 2 5 -3");
        match res {
            Err(CostMatrixLoaderError::Matrix(CostMatrixError::InvalidCost { worker, task })) => {
                assert_eq!(worker.get(), 0);
                assert_eq!(task.get(), 1);
            }
            _ => panic!("Expected InvalidCost"),
        }
    }
}
