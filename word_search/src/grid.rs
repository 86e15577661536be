use std::fmt;

use rand::Rng;
use thiserror::Error;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("grid dimension must not be negative, got {0}")]
    InvalidDimension(i64),
    #[error("can not parse grid dimension {0:?}")]
    UnparsableDimension(String),
    #[error("{rows}x{cols} grid needs {expected} cells, got {actual}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },
    #[error("{rows}x{cols} grid has too many cells")]
    TooLarge { rows: usize, cols: usize },
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Row-major character grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<char>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize, cells: Vec<char>) -> Result<Self, GridError> {
        let expected = cell_count(rows, cols)?;
        if cells.len() != expected {
            return Err(GridError::DimensionMismatch {
                rows,
                cols,
                expected,
                actual: cells.len(),
            });
        }

        Ok(Self { rows, cols, cells })
    }

    /// Builds a grid from one string per row.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let cols = rows.first().map_or(0, |row| row.as_ref().chars().count());
        let mut cells = Vec::with_capacity(rows.len() * cols);

        for (row, line) in rows.iter().enumerate() {
            let before = cells.len();
            cells.extend(line.as_ref().chars());
            let actual = cells.len() - before;
            if actual != cols {
                return Err(GridError::RaggedRow {
                    row,
                    expected: cols,
                    actual,
                });
            }
        }

        // a grid whose rows are all empty has no cells at all
        let rows = if cols == 0 { 0 } else { rows.len() };
        Self::new(rows, cols, cells)
    }

    /// Fills a `rows x cols` grid with random lowercase letters.
    pub fn random<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Result<Self, GridError> {
        let cells = (0..cell_count(rows, cols)?)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        Ok(Self { rows, cols, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols.max(1)) {
            for cell in row {
                write!(f, "{cell} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn cell_count(rows: usize, cols: usize) -> Result<usize, GridError> {
    rows.checked_mul(cols).ok_or(GridError::TooLarge { rows, cols })
}

/// Parses a row or column count typed by the user.
pub fn parse_dimension(input: &str) -> Result<usize, GridError> {
    let input = input.trim();
    let value: i64 = input
        .parse()
        .map_err(|_| GridError::UnparsableDimension(input.to_string()))?;

    usize::try_from(value).map_err(|_| GridError::InvalidDimension(value))
}
