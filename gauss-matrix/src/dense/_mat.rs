use std::ops::{AddAssign, Index, Mul, MulAssign};
use delegate::delegate;
use derive_more::Display;
use nalgebra::DMatrix;
use num_traits::Zero;
use gauss::Real;
use crate::{MatError, MatTrait};

/// A dense m×n matrix of real cells, m ≥ 1 and n ≥ 1 at all times.
///
/// The public coordinate accessors `get`/`set` are 1-based, matching the
/// mathematical convention; everything behind them (including the
/// read-only `Index` used by the algorithm layer) is 0-based.
#[derive(Clone, Debug, Display, PartialEq)]
pub struct Mat<R: Real> {
    inner: DMatrix<R>
}

impl<R: Real> MatTrait for Mat<R> {
    fn shape(&self) -> (usize, usize) {
        (self.inner.nrows(), self.inner.ncols())
    }
}

impl<R: Real> From<DMatrix<R>> for Mat<R> {
    fn from(inner: DMatrix<R>) -> Self {
        Self { inner }
    }
}

impl<R: Real> Mat<R> {
    /// Validating constructor: the grid must be rectangular, non-empty,
    /// and every cell finite.
    pub fn from_rows(rows: Vec<Vec<R>>) -> Result<Self, MatError> {
        let m = rows.len();
        if m == 0 {
            return Err(MatError::InvalidShape("a matrix needs at least one row".into()))
        }

        let n = rows[0].len();
        if n == 0 {
            return Err(MatError::InvalidShape("a matrix needs at least one column".into()))
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(MatError::InvalidShape(
                    format!("row {} has {} entries, expected {}", i + 1, row.len(), n)
                ))
            }
            for &a in row.iter() {
                check_finite(a)?;
            }
        }

        let inner = DMatrix::from_row_iterator(m, n, rows.into_iter().flatten());
        Ok(Self::from(inner))
    }

    /// Row-major construction from exactly m·n values.
    /// Panics on an empty shape; use `from_rows` for untrusted input.
    pub fn from_data<I>(shape: (usize, usize), data: I) -> Self
    where I: IntoIterator<Item = R> {
        assert!(shape.0 >= 1 && shape.1 >= 1);
        DMatrix::from_row_iterator(shape.0, shape.1, data).into()
    }

    pub fn zero(shape: (usize, usize)) -> Self {
        assert!(shape.0 >= 1 && shape.1 >= 1);
        Self::from(DMatrix::zeros(shape.0, shape.1))
    }

    pub fn id(size: usize) -> Self {
        assert!(size >= 1);
        Self::from(DMatrix::identity(size, size))
    }

    pub fn diag<I>(shape: (usize, usize), entries: I) -> Self
    where I: IntoIterator<Item = R> {
        let mut mat = Self::zero(shape);
        for (i, a) in entries.into_iter().enumerate() {
            mat.inner[(i, i)] = a;
        }
        mat
    }

    pub fn inner(&self) -> &DMatrix<R> {
        &self.inner
    }

    pub(crate) fn inner_mut(&mut self) -> &mut DMatrix<R> {
        &mut self.inner
    }

    pub fn into_inner(self) -> DMatrix<R> {
        self.inner
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &R)> {
        let m = self.nrows();
        self.inner.iter().enumerate().map(move |(i, a)|
            (i % m, i / m, a)
        )
    }

    pub fn is_zero(&self) -> bool {
        self.iter().all(|e| e.2.is_zero())
    }

    /// Largest |cell|.
    pub fn max_norm(&self) -> R {
        self.iter().fold(R::zero(), |acc, (_, _, a)| acc.max(a.abs()))
    }

    pub fn approx_eq(&self, other: &Self, tol: R) -> bool {
        self.shape() == other.shape() &&
        self.iter().all(|(i, j, a)| a.approx_eq(other[(i, j)], tol))
    }
}

// 1-based accessors and structural mutation. Every mutation validates
// before touching storage, so it either fully applies or leaves the
// receiver as it was.
impl<R: Real> Mat<R> {
    /// Cell read; `get(1, 1)` is the top-left cell.
    pub fn get(&self, row: usize, col: usize) -> Result<R, MatError> {
        let (i, j) = self.checked_index(row, col)?;
        Ok(self.inner[(i, j)])
    }

    /// Cell write; rejects non-finite values.
    pub fn set(&mut self, row: usize, col: usize, value: R) -> Result<(), MatError> {
        check_finite(value)?;
        let (i, j) = self.checked_index(row, col)?;
        self.inner[(i, j)] = value;
        Ok(())
    }

    /// Appends `row` below the last row; it must have exactly n entries.
    pub fn append_row(&mut self, row: Vec<R>) -> Result<(), MatError> {
        let (m, n) = self.shape();
        if row.len() != n {
            return Err(MatError::DimensionMismatch(
                format!("appended row has {} entries, expected {}", row.len(), n)
            ))
        }
        for &a in row.iter() {
            check_finite(a)?;
        }

        let inner = std::mem::replace(&mut self.inner, DMatrix::zeros(1, 1));
        let mut inner = inner.insert_row(m, R::zero());
        for (j, a) in row.into_iter().enumerate() {
            inner[(m, j)] = a;
        }
        self.inner = inner;

        Ok(())
    }

    /// Appends `col` to the right of the last column; it must have exactly
    /// m entries.
    pub fn append_col(&mut self, col: Vec<R>) -> Result<(), MatError> {
        let (m, n) = self.shape();
        if col.len() != m {
            return Err(MatError::DimensionMismatch(
                format!("appended column has {} entries, expected {}", col.len(), m)
            ))
        }
        for &a in col.iter() {
            check_finite(a)?;
        }

        let inner = std::mem::replace(&mut self.inner, DMatrix::zeros(1, 1));
        let mut inner = inner.insert_column(n, R::zero());
        for (i, a) in col.into_iter().enumerate() {
            inner[(i, n)] = a;
        }
        self.inner = inner;

        Ok(())
    }

    /// Removes the `row`-th row (1-based); later rows shift up.
    /// A matrix keeps at least one row.
    pub fn remove_row(&mut self, row: usize) -> Result<(), MatError> {
        let m = self.nrows();
        if row < 1 || row > m {
            return Err(MatError::IndexOutOfRange { index: row, bound: m })
        }
        if m == 1 {
            return Err(MatError::InvalidShape("cannot remove the last remaining row".into()))
        }

        let inner = std::mem::replace(&mut self.inner, DMatrix::zeros(1, 1));
        self.inner = inner.remove_row(row - 1);

        Ok(())
    }

    /// Removes the `col`-th column (1-based) from every row at once;
    /// later columns shift left. A matrix keeps at least one column.
    pub fn remove_col(&mut self, col: usize) -> Result<(), MatError> {
        let n = self.ncols();
        if col < 1 || col > n {
            return Err(MatError::IndexOutOfRange { index: col, bound: n })
        }
        if n == 1 {
            return Err(MatError::InvalidShape("cannot remove the last remaining column".into()))
        }

        let inner = std::mem::replace(&mut self.inner, DMatrix::zeros(1, 1));
        self.inner = inner.remove_column(col - 1);

        Ok(())
    }

    fn checked_index(&self, row: usize, col: usize) -> Result<(usize, usize), MatError> {
        let (m, n) = self.shape();
        if row < 1 || row > m {
            return Err(MatError::IndexOutOfRange { index: row, bound: m })
        }
        if col < 1 || col > n {
            return Err(MatError::IndexOutOfRange { index: col, bound: n })
        }
        Ok((row - 1, col - 1))
    }
}

// Row operations for the elimination engine (0-based).
impl<R: Real> Mat<R> {
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        self.inner.swap_rows(i, j);
    }

    pub fn swap_cols(&mut self, i: usize, j: usize) {
        self.inner.swap_columns(i, j);
    }

    pub fn mul_row(&mut self, i: usize, r: R) {
        self.inner.row_mut(i).mul_assign(r)
    }

    // row_j += r * row_i
    pub fn add_row_to(&mut self, i: usize, j: usize, r: R) {
        let row = self.inner.row(i).mul(r);
        self.inner.row_mut(j).add_assign(row)
    }
}

impl<R: Real> Index<(usize, usize)> for Mat<R> {
    type Output = R;
    delegate! {
        to self.inner {
            fn index(&self, index: (usize, usize)) -> &R;
        }
    }
}

fn check_finite<R: Real>(a: R) -> Result<(), MatError> {
    if a.is_finite() {
        Ok(())
    } else {
        Err(MatError::InvalidValue(format!("non-finite cell value: {}", a)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init() {
        let a: Mat<f64> = Mat::from_data((2, 3), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        assert_eq!(a.nrows(), 2);
        assert_eq!(a.ncols(), 3);
        assert_eq!(a.into_inner(), DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
    }

    #[test]
    fn eq() {
        let a: Mat<f64> = Mat::from_data((2, 3), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b: Mat<f64> = Mat::from_data((2, 3), [1.0, 2.0, 0.0, 4.0, 5.0, 6.0]);
        let c: Mat<f64> = Mat::from_data((3, 2), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        assert_eq!(a, a);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn square() {
        let a: Mat<f64> = Mat::zero((3, 3));
        assert!(a.is_square());

        let a: Mat<f64> = Mat::zero((3, 2));
        assert!(!a.is_square());
    }

    #[test]
    fn from_rows() {
        let a = Mat::from_rows(vec![
            vec![1.0, 2.0],
            vec![3.0, 4.0]
        ]).unwrap();
        assert_eq!(a, Mat::from_data((2, 2), [1.0, 2.0, 3.0, 4.0]));
    }

    #[test]
    fn from_rows_empty() {
        let e = Mat::<f64>::from_rows(vec![]);
        assert!(matches!(e, Err(MatError::InvalidShape(_))));

        let e = Mat::<f64>::from_rows(vec![vec![]]);
        assert!(matches!(e, Err(MatError::InvalidShape(_))));
    }

    #[test]
    fn from_rows_ragged() {
        let e = Mat::from_rows(vec![
            vec![1.0, 2.0],
            vec![3.0, 4.0, 5.0]
        ]);
        assert!(matches!(e, Err(MatError::InvalidShape(_))));
    }

    #[test]
    fn from_rows_non_finite() {
        let e = Mat::from_rows(vec![
            vec![1.0, f64::NAN]
        ]);
        assert!(matches!(e, Err(MatError::InvalidValue(_))));
    }

    #[test]
    fn get() {
        let a: Mat<f64> = Mat::from_data((2, 2), [1.0, 2.0, 3.0, 4.0]);

        assert_eq!(a.get(1, 1), Ok(1.0));
        assert_eq!(a.get(2, 1), Ok(3.0));
        assert_eq!(a.get(0, 1), Err(MatError::IndexOutOfRange { index: 0, bound: 2 }));
        assert_eq!(a.get(1, 3), Err(MatError::IndexOutOfRange { index: 3, bound: 2 }));
    }

    #[test]
    fn set() {
        let mut a: Mat<f64> = Mat::from_data((2, 2), [1.0, 2.0, 3.0, 4.0]);

        a.set(2, 1, 9.0).unwrap();
        assert_eq!(a, Mat::from_data((2, 2), [1.0, 2.0, 9.0, 4.0]));

        assert!(a.set(3, 1, 0.0).is_err());
        assert!(matches!(a.set(1, 1, f64::INFINITY), Err(MatError::InvalidValue(_))));
        assert_eq!(a, Mat::from_data((2, 2), [1.0, 2.0, 9.0, 4.0]));
    }

    #[test]
    fn append_row() {
        let mut a: Mat<f64> = Mat::from_data((2, 2), [1.0, 2.0, 3.0, 4.0]);
        a.append_row(vec![5.0, 6.0]).unwrap();

        assert_eq!(a.nrows(), 3);
        assert_eq!(a, Mat::from_data((3, 2), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
    }

    #[test]
    fn append_row_mismatch() {
        let mut a: Mat<f64> = Mat::from_data((2, 2), [1.0, 2.0, 3.0, 4.0]);
        let e = a.append_row(vec![5.0]);

        assert!(matches!(e, Err(MatError::DimensionMismatch(_))));
        assert_eq!(a.nrows(), 2);
    }

    #[test]
    fn append_col() {
        let mut a: Mat<f64> = Mat::from_data((2, 2), [1.0, 2.0, 3.0, 4.0]);
        a.append_col(vec![5.0, 6.0]).unwrap();

        assert_eq!(a.ncols(), 3);
        assert_eq!(a, Mat::from_data((2, 3), [1.0, 2.0, 5.0, 3.0, 4.0, 6.0]));
    }

    #[test]
    fn remove_row() {
        let mut a: Mat<f64> = Mat::from_data((3, 2), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        a.remove_row(2).unwrap();

        assert_eq!(a, Mat::from_data((2, 2), [1.0, 2.0, 5.0, 6.0]));
    }

    #[test]
    fn remove_col() {
        let mut a: Mat<f64> = Mat::from_data((2, 3), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        a.remove_col(1).unwrap();

        assert_eq!(a, Mat::from_data((2, 2), [2.0, 3.0, 5.0, 6.0]));
    }

    #[test]
    fn remove_last_fails() {
        let mut a: Mat<f64> = Mat::from_data((1, 1), [1.0]);

        assert!(matches!(a.remove_row(1), Err(MatError::InvalidShape(_))));
        assert!(matches!(a.remove_col(1), Err(MatError::InvalidShape(_))));
        assert!(matches!(a.remove_row(2), Err(MatError::IndexOutOfRange { .. })));
    }

    #[test]
    fn append_remove_row_roundtrip() {
        let a: Mat<f64> = Mat::from_data((2, 2), [1.0, 2.0, 3.0, 4.0]);

        let mut b = a.clone();
        b.append_row(vec![5.0, 6.0]).unwrap();
        b.remove_row(3).unwrap();
        assert_eq!(b, a);
    }

    #[test]
    fn append_remove_col_roundtrip() {
        let a: Mat<f64> = Mat::from_data((2, 2), [1.0, 2.0, 3.0, 4.0]);

        let mut b = a.clone();
        b.append_col(vec![5.0, 6.0]).unwrap();
        b.remove_col(3).unwrap();
        assert_eq!(b, a);
    }

    #[test]
    fn diag() {
        let a: Mat<f64> = Mat::diag((3, 3), [1.0, 2.0, 3.0]);
        assert_eq!(a, Mat::from_data((3, 3), [
            1.0, 0.0, 0.0,
            0.0, 2.0, 0.0,
            0.0, 0.0, 3.0
        ]));
    }

    #[test]
    fn display() {
        let a: Mat<f64> = Mat::from_data((2, 2), [1.0, 2.0, 3.0, 4.0]);
        let s = a.to_string();
        assert!(s.contains('1') && s.contains('4'));
    }

    #[test]
    fn max_norm() {
        let a: Mat<f64> = Mat::from_data((2, 2), [1.0, -7.0, 3.0, 4.0]);
        assert_eq!(a.max_norm(), 7.0);

        let z: Mat<f64> = Mat::zero((2, 2));
        assert_eq!(z.max_norm(), 0.0);
    }

    #[test]
    fn swap_rows() {
        let mut a: Mat<f64> = Mat::from_data((2, 2), [1.0, 2.0, 3.0, 4.0]);
        a.swap_rows(0, 1);
        assert_eq!(a, Mat::from_data((2, 2), [3.0, 4.0, 1.0, 2.0]));
    }

    #[test]
    fn mul_row() {
        let mut a: Mat<f64> = Mat::from_data((2, 2), [1.0, 2.0, 3.0, 4.0]);
        a.mul_row(1, 10.0);
        assert_eq!(a, Mat::from_data((2, 2), [1.0, 2.0, 30.0, 40.0]));
    }

    #[test]
    fn add_row_to() {
        let mut a: Mat<f64> = Mat::from_data((2, 2), [1.0, 2.0, 3.0, 4.0]);
        a.add_row_to(0, 1, 10.0);
        assert_eq!(a, Mat::from_data((2, 2), [1.0, 2.0, 13.0, 24.0]));
    }
}
