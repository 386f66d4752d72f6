use serde::{Deserialize, Serialize};
use std::ops::Index;

use crate::error::{CodingError, CodingResult};

/// Row-major real matrix.
///
/// As a coding matrix, row `i` is the code vector of domain index `i` and the
/// column count is the code length K. The same type carries the N×K
/// modulation, demodulation and correlation functions of an iToF code set,
/// where each column is one length-N waveform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct CodingMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

#[derive(Deserialize)]
struct RawMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl TryFrom<RawMatrix> for CodingMatrix {
    type Error = CodingError;

    fn try_from(raw: RawMatrix) -> CodingResult<Self> {
        CodingMatrix::from_vec(raw.rows, raw.cols, raw.data)
    }
}

impl CodingMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wrap row-major data
    pub fn from_vec(
        rows: usize,
        cols: usize,
        data: Vec<f64>,
    ) -> CodingResult<Self> {
        let len = rows.checked_mul(cols).ok_or_else(|| {
            CodingError::domain(format!("matrix shape {} x {} overflows", rows, cols))
        })?;
        CodingError::check_len("matrix data", len, data.len())?;
        Ok(Self { rows, cols, data })
    }

    /// Stack equally long rows
    pub fn from_rows(rows: Vec<Vec<f64>>, cols: usize) -> CodingResult<Self> {
        let n_rows = rows.len();
        let mut data = Vec::with_capacity(n_rows * cols);
        for row in rows {
            CodingError::check_len("matrix row", cols, row.len())?;
            data.extend(row);
        }
        Ok(Self {
            rows: n_rows,
            cols,
            data,
        })
    }

    /// Place equally long vectors side by side as columns
    pub fn from_columns(columns: &[Vec<f64>]) -> CodingResult<Self> {
        let cols = columns.len();
        let rows = columns.first().map_or(0, Vec::len);
        for column in columns {
            CodingError::check_len("matrix column", rows, column.len())?;
        }

        let mut data = vec![0.0; rows * cols];
        for (c, column) in columns.iter().enumerate() {
            for (r, &value) in column.iter().enumerate() {
                data[r * cols + c] = value;
            }
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn row(&self, r: usize) -> &[f64] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |r| self.row(r))
    }

    pub fn column(&self, c: usize) -> Vec<f64> {
        (0..self.rows)
            .map(|r| self.data[r * self.cols + c])
            .collect()
    }

    pub fn columns(&self) -> Vec<Vec<f64>> {
        (0..self.cols)
            .map(|c| self.column(c))
            .collect()
    }

    /// Element-wise map into a new matrix
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    /// Replace every row with `f(row)`; `f` must keep the length
    pub(crate) fn map_rows(&self, f: impl Fn(&[f64]) -> Vec<f64>) -> Self {
        let data: Vec<f64> = self
            .iter_rows()
            .flat_map(|row| f(row))
            .collect();
        debug_assert_eq!(data.len(), self.data.len());
        Self {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    /// Replace every column with `f(column)`; `f` must keep the length
    pub(crate) fn map_columns(&self, f: impl Fn(&[f64]) -> Vec<f64>) -> Self {
        let mut data = vec![0.0; self.data.len()];
        for c in 0..self.cols {
            let column = f(&self.column(c));
            debug_assert_eq!(column.len(), self.rows);
            for (r, value) in column.into_iter().enumerate().take(self.rows) {
                data[r * self.cols + c] = value;
            }
        }
        Self {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    pub fn scale(&self, factor: f64) -> Self {
        self.map(|x| x * factor)
    }

    /// `[self | other]`, both must have the same number of rows
    pub fn hconcat(&self, other: &CodingMatrix) -> CodingResult<Self> {
        CodingError::check_len("hconcat rows", self.rows, other.rows)?;

        let cols = self.cols + other.cols;
        let mut data = Vec::with_capacity(self.rows * cols);
        for r in 0..self.rows {
            data.extend_from_slice(self.row(r));
            data.extend_from_slice(other.row(r));
        }
        Ok(Self {
            rows: self.rows,
            cols,
            data,
        })
    }

    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..self.cols {
            data.extend((0..self.rows).map(|r| self.data[r * self.cols + c]));
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// Per-column mean
    pub fn column_means(&self) -> Vec<f64> {
        if self.rows == 0 {
            return vec![0.0; self.cols];
        }
        let mut sums = vec![0.0; self.cols];
        for row in self.iter_rows() {
            for (sum, &x) in sums.iter_mut().zip(row) {
                *sum += x;
            }
        }
        sums.iter()
            .map(|s| s / self.rows as f64)
            .collect()
    }
}

impl Index<(usize, usize)> for CodingMatrix {
    type Output = f64;

    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        assert!(c < self.cols, "column {} out of range ({})", c, self.cols);
        &self.data[r * self.cols + c]
    }
}
