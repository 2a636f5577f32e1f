use gauss::Real;
use crate::{MatError, MatTrait};
use super::Mat;

/// Cell (j, i) of the result is cell (i, j) of `a`.
pub fn transpose<R: Real>(a: &Mat<R>) -> Mat<R> {
    Mat::from(a.inner().transpose())
}

/// Reverses the entry order of every row: the last column comes first.
pub fn fliplr<R: Real>(a: &Mat<R>) -> Mat<R> {
    let mut b = a.clone();
    let n = b.ncols();
    for j in 0..n / 2 {
        b.swap_cols(j, n - 1 - j);
    }
    b
}

/// The main diagonal: cells (i, i) for i up to min(m, n).
pub fn diagonal<R: Real>(a: &Mat<R>) -> Vec<R> {
    (0..a.min_dim()).map(|i| a[(i, i)]).collect()
}

pub fn is_square<R: Real>(a: &Mat<R>) -> bool {
    MatTrait::is_square(a)
}

pub fn add<R: Real>(a: &Mat<R>, b: &Mat<R>) -> Result<Mat<R>, MatError> {
    check_same_shape("add", a, b)?;
    Ok(Mat::from(a.inner() + b.inner()))
}

pub fn sub<R: Real>(a: &Mat<R>, b: &Mat<R>) -> Result<Mat<R>, MatError> {
    check_same_shape("sub", a, b)?;
    Ok(Mat::from(a.inner() - b.inner()))
}

/// Matrix product; the operands must chain (a.ncols == b.nrows).
pub fn mul<R: Real>(a: &Mat<R>, b: &Mat<R>) -> Result<Mat<R>, MatError> {
    if a.ncols() != b.nrows() {
        return Err(MatError::DimensionMismatch(
            format!("mul of {:?} by {:?}", a.shape(), b.shape())
        ))
    }
    Ok(Mat::from(a.inner() * b.inner()))
}

/// Scalar multiple of every cell.
pub fn scale<R: Real>(a: &Mat<R>, r: R) -> Mat<R> {
    Mat::from(a.inner() * r)
}

fn check_same_shape<R: Real>(op: &str, a: &Mat<R>, b: &Mat<R>) -> Result<(), MatError> {
    if a.shape() == b.shape() {
        Ok(())
    } else {
        Err(MatError::DimensionMismatch(
            format!("{} of {:?} and {:?}", op, a.shape(), b.shape())
        ))
    }
}
