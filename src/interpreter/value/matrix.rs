use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Pivots smaller than this are treated as zero when inverting.
pub const SINGULAR_EPSILON: f64 = 1e-10;

/// A dense, rectangular, row-major matrix of reals.
///
/// A `Matrix` always has at least one row and one column; the constructors
/// refuse anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Builds a matrix from a list of equally long rows.
    ///
    /// # Errors
    /// `RuntimeError::Shape` if there are no rows, a row is empty, or the rows
    /// differ in length.
    ///
    /// # Example
    /// ```
    /// use keycalc::interpreter::value::matrix::Matrix;
    ///
    /// let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]], 0).unwrap();
    /// assert_eq!((m.rows(), m.cols()), (2, 2));
    /// assert_eq!(m.get(1, 0), 3.0);
    ///
    /// assert!(Matrix::from_rows(vec![vec![1.0], vec![2.0, 3.0]], 0).is_err());
    /// ```
    pub fn from_rows(rows: Vec<Vec<f64>>, offset: usize) -> EvalResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(RuntimeError::Shape { details: "a matrix needs at least one entry".to_string(),
                                             offset });
        }
        if let Some(bad) = rows.iter().find(|row| row.len() != cols) {
            return Err(RuntimeError::Shape { details: format!("row of length {} in a matrix with {cols} columns",
                                                              bad.len()),
                                             offset });
        }
        let height = rows.len();
        Ok(Self { rows: height,
                  cols,
                  data: rows.into_iter().flatten().collect() })
    }

    /// Builds a `rows × cols` matrix from row-major data.
    ///
    /// # Errors
    /// `RuntimeError::Shape` if a dimension is zero or `data` has the wrong
    /// length.
    pub fn from_data(rows: usize, cols: usize, data: Vec<f64>, offset: usize) -> EvalResult<Self> {
        if rows == 0 || cols == 0 || data.len() != rows * cols {
            return Err(RuntimeError::Shape { details: format!("{} entries do not fill a {rows}x{cols} matrix",
                                                              data.len()),
                                             offset });
        }
        Ok(Self { rows, cols, data })
    }

    /// The `n × n` identity matrix. `n` must be at least 1.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let n = n.max(1);
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self { rows: n,
               cols: n,
               data }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `true` for square matrices.
    #[must_use]
    pub const fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Entry at row `r`, column `c`. Panics if out of range, like slice
    /// indexing.
    #[must_use]
    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.data[r * self.cols + c]
    }

    /// The entries of row `r`.
    #[must_use]
    pub fn row(&self, r: usize) -> &[f64] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// Iterates over the rows.
    pub fn row_iter(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.cols)
    }

    /// All entries in row-major order.
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Applies `f` to every entry, keeping the shape.
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self { rows: self.rows,
               cols: self.cols,
               data: self.data.iter().copied().map(f).collect() }
    }

    /// Returns the transpose.
    ///
    /// # Example
    /// ```
    /// use keycalc::interpreter::value::matrix::Matrix;
    ///
    /// let m = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0]], 0).unwrap();
    /// let t = m.transpose();
    /// assert_eq!((t.rows(), t.cols()), (3, 1));
    /// assert_eq!(t.get(2, 0), 3.0);
    /// ```
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                data.push(self.get(r, c));
            }
        }
        Self { rows: self.cols,
               cols: self.rows,
               data }
    }

    /// Determinant of a square matrix.
    ///
    /// Up to 3x3 by cofactor expansion along the first row; larger matrices by
    /// elimination with partial pivoting, which stays cubic in the size.
    ///
    /// # Errors
    /// `RuntimeError::Shape` if the matrix is not square.
    ///
    /// # Example
    /// ```
    /// use keycalc::interpreter::value::matrix::Matrix;
    ///
    /// let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]], 0).unwrap();
    /// assert_eq!(m.determinant(0).unwrap(), -2.0);
    /// ```
    pub fn determinant(&self, offset: usize) -> EvalResult<f64> {
        if !self.is_square() {
            return Err(RuntimeError::Shape { details: format!("determinant of a {}x{} matrix",
                                                              self.rows, self.cols),
                                             offset });
        }
        if self.rows <= 3 {
            Ok(cofactor_determinant(self.rows, &self.data))
        } else {
            Ok(elimination_determinant(self.rows, self.data.clone()))
        }
    }

    /// Inverse of a square matrix by Gauss-Jordan elimination with partial
    /// pivoting.
    ///
    /// # Errors
    /// - `RuntimeError::Shape` if the matrix is not square.
    /// - `RuntimeError::Domain` if the matrix is singular.
    /// - `RuntimeError::Overflow` if an entry of the inverse is not a finite
    ///   `f64`.
    ///
    /// # Example
    /// ```
    /// use keycalc::interpreter::value::matrix::Matrix;
    ///
    /// let m = Matrix::from_rows(vec![vec![2.0, 0.0], vec![0.0, 4.0]], 0).unwrap();
    /// let inv = m.inverse(0).unwrap();
    /// assert_eq!(inv.data(), &[0.5, 0.0, 0.0, 0.25]);
    ///
    /// let singular = Matrix::from_rows(vec![vec![1.0, 2.0], vec![2.0, 4.0]], 0).unwrap();
    /// assert!(singular.inverse(0).is_err());
    /// ```
    pub fn inverse(&self, offset: usize) -> EvalResult<Self> {
        if !self.is_square() {
            return Err(RuntimeError::Shape { details: format!("inverse of a {}x{} matrix",
                                                              self.rows, self.cols),
                                             offset });
        }
        let n = self.rows;
        let width = 2 * n;
        let mut aug = vec![0.0; n * width];
        for r in 0..n {
            aug[r * width..r * width + n].copy_from_slice(self.row(r));
            aug[r * width + n + r] = 1.0;
        }

        for col in 0..n {
            let pivot_row = (col..n).max_by(|&a, &b| {
                                        aug[a * width + col].abs()
                                                             .total_cmp(&aug[b * width + col].abs())
                                    })
                                    .unwrap_or(col);
            let pivot = aug[pivot_row * width + col];
            if pivot.abs() < SINGULAR_EPSILON {
                return Err(RuntimeError::Domain { details: "matrix is singular".to_string(),
                                                  offset });
            }
            if pivot_row != col {
                for k in 0..width {
                    aug.swap(col * width + k, pivot_row * width + k);
                }
            }
            for k in 0..width {
                aug[col * width + k] /= pivot;
            }
            for r in (0..n).filter(|&r| r != col) {
                let factor = aug[r * width + col];
                if factor != 0.0 {
                    for k in 0..width {
                        aug[r * width + k] -= factor * aug[col * width + k];
                    }
                }
            }
            // A finite matrix whose inverse leaves the f64 range.
            if aug.iter().any(|x| !x.is_finite()) {
                return Err(RuntimeError::Overflow { offset });
            }
        }

        let data = aug.chunks(width).flat_map(|row| row[n..].iter().copied()).collect();
        Ok(Self { rows: n,
                  cols: n,
                  data })
    }
}

fn cofactor_determinant(n: usize, data: &[f64]) -> f64 {
    match n {
        1 => data[0],
        2 => data[0].mul_add(data[3], -(data[1] * data[2])),
        _ => {
            let mut det = 0.0;
            let mut minor = Vec::with_capacity((n - 1) * (n - 1));
            for c in 0..n {
                minor.clear();
                for r in 1..n {
                    minor.extend((0..n).filter(|&k| k != c).map(|k| data[r * n + k]));
                }
                let sign = if c % 2 == 0 { 1.0 } else { -1.0 };
                det += sign * data[c] * cofactor_determinant(n - 1, &minor);
            }
            det
        },
    }
}

fn elimination_determinant(n: usize, mut data: Vec<f64>) -> f64 {
    let mut det = 1.0;
    for col in 0..n {
        let pivot_row = (col..n).max_by(|&a, &b| data[a * n + col].abs().total_cmp(&data[b * n + col].abs()))
                                .unwrap_or(col);
        let pivot = data[pivot_row * n + col];
        if pivot == 0.0 {
            return 0.0;
        }
        if pivot_row != col {
            for k in 0..n {
                data.swap(col * n + k, pivot_row * n + k);
            }
            det = -det;
        }
        det *= pivot;
        for r in col + 1..n {
            let factor = data[r * n + col] / pivot;
            for k in col..n {
                data[r * n + k] -= factor * data[col * n + k];
            }
        }
    }
    det
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_by_three_determinant() {
        let m = Matrix::from_rows(vec![vec![2.0, 0.0, 1.0],
                                       vec![1.0, 3.0, 2.0],
                                       vec![1.0, 1.0, 2.0]],
                                  0).unwrap();
        assert!((m.determinant(0).unwrap() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn four_by_four_determinant() {
        let m = Matrix::from_rows(vec![vec![0.0, 2.0, 0.0, 0.0],
                                       vec![1.0, 0.0, 0.0, 0.0],
                                       vec![0.0, 0.0, 3.0, 0.0],
                                       vec![0.0, 0.0, 0.0, 4.0]],
                                  0).unwrap();
        assert!((m.determinant(0).unwrap() + 24.0).abs() < 1e-12);
        assert_eq!(Matrix::identity(6).determinant(0).unwrap(), 1.0);
    }

    #[test]
    fn inverse_needs_pivoting() {
        let m = Matrix::from_rows(vec![vec![0.0, 1.0], vec![1.0, 0.0]], 0).unwrap();
        assert_eq!(m.inverse(0).unwrap(), m);
    }

    #[test]
    fn inverse_out_of_range_overflows() {
        let m = Matrix::from_rows(vec![vec![1e-9, 1e300], vec![0.0, 1e-9]], 0).unwrap();
        assert_eq!(m.inverse(7), Err(RuntimeError::Overflow { offset: 7 }));

        let tiny = Matrix::from_rows(vec![vec![1e-9, 0.0], vec![0.0, 1e-9]], 0).unwrap();
        let inverse = tiny.inverse(0).unwrap();
        assert!(inverse.data().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn non_square_is_a_shape_error() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0]], 4).unwrap();
        assert!(matches!(m.determinant(4), Err(RuntimeError::Shape { offset: 4, .. })));
        assert!(matches!(m.inverse(4), Err(RuntimeError::Shape { .. })));
    }
}
