use std::cmp::Ordering;
use itertools::{repeat_n, Itertools};
use log::{debug, trace};
use num_traits::{One, Zero};
use gauss::Real;
use crate::{MatError, MatTrait};
use super::{null_space, scale, sub, Mat};

const MAX_ITER: usize = 1000;

/// Real eigenvalues of a square matrix, descending, with multiplicity.
///
/// Complex conjugate pairs are omitted from the result; when the whole
/// spectrum is complex the call fails with `NoRealEigenvalue` (complex
/// arithmetic is out of scope for this crate). `NotConverged` signals
/// that the iteration budget ran out before the spectrum separated.
pub fn eigenvalues<R: Real>(a: &Mat<R>) -> Result<Vec<R>, MatError> {
    let (m, n) = a.shape();
    if m != n {
        return Err(MatError::NotSquare(m, n))
    }

    if n == 1 {
        return Ok(vec![a[(0, 0)]])
    }

    let tol = (R::one() + a.max_norm()) * R::epsilon().sqrt();
    let t = schur_form(a, tol)?;

    let (mut vals, complex) = read_diagonal(&t, tol);

    if vals.is_empty() {
        debug_assert!(complex > 0);
        return Err(MatError::NoRealEigenvalue)
    }

    vals.sort_by(|x, y| y.partial_cmp(x).unwrap_or(Ordering::Equal));
    Ok(vals)
}

/// One pair per distinct real eigenvalue λ: the eigenspace basis comes
/// from solving (a - λ id) v = 0 with the reduced row-echelon engine.
/// Basis vectors have unit length and a positive leading component.
pub fn eigenvectors<R: Real>(a: &Mat<R>) -> Result<Vec<EigenPair<R>>, MatError> {
    let vals = eigenvalues(a)?;
    let n = a.nrows();

    // looser than the iteration tolerance: the eigenvalue error must not
    // hide the rank drop of a - λ id.
    let tol = R::from_count(16) * (R::one() + a.max_norm()) * R::epsilon().sqrt();

    let mut pairs: Vec<EigenPair<R>> = vec![];

    for &l in vals.iter() {
        if let Some(prev) = pairs.last() {
            if prev.value().approx_eq(l, tol) { continue }
        }

        let li = Mat::diag((n, n), repeat_n(l, n));
        let b = sub(a, &li)?;

        let basis = null_space(&b, tol).into_iter()
            .map(normalize)
            .collect_vec();

        if basis.is_empty() {
            return Err(MatError::NotConverged(MAX_ITER))
        }

        pairs.push(EigenPair { value: l, basis });
    }

    Ok(pairs)
}

#[derive(Clone, Debug)]
pub struct EigenPair<R: Real> {
    value: R,
    basis: Vec<Mat<R>>
}

impl<R: Real> EigenPair<R> {
    pub fn value(&self) -> R {
        self.value
    }

    /// Basis of the eigenspace, as n×1 column vectors.
    pub fn basis(&self) -> &[Mat<R>] {
        &self.basis
    }

    pub fn geo_multiplicity(&self) -> usize {
        self.basis.len()
    }
}

// QR iteration: t <- r q converges to a quasi-upper-triangular form
// (real Schur) with the same spectrum.
fn schur_form<R: Real>(a: &Mat<R>, tol: R) -> Result<Mat<R>, MatError> {
    let mut t = a.clone();

    for it in 0..MAX_ITER {
        if is_quasi_triangular(&t, tol) {
            debug!("schur form reached after {it} iterations.");
            trace!("{}", t);
            return Ok(t)
        }

        let (q, r) = householder_qr(&t);
        t = Mat::from(r.inner() * q.inner());
    }

    if is_quasi_triangular(&t, tol) {
        Ok(t)
    } else {
        Err(MatError::NotConverged(MAX_ITER))
    }
}

fn is_quasi_triangular<R: Real>(t: &Mat<R>, tol: R) -> bool {
    let n = t.nrows();

    for j in 0..n {
        for i in (j + 2)..n {
            if t[(i, j)].abs() > tol {
                return false
            }
        }
    }

    // 2x2 bumps on the subdiagonal must not overlap
    for i in 1..n.saturating_sub(1) {
        if t[(i, i - 1)].abs() > tol && t[(i + 1, i)].abs() > tol {
            return false
        }
    }

    true
}

// diagonal walk: 1x1 entries are real eigenvalues, 2x2 bumps resolve
// through their characteristic quadratic. Returns (values, #complex).
fn read_diagonal<R: Real>(t: &Mat<R>, tol: R) -> (Vec<R>, usize) {
    let n = t.nrows();
    let four = R::two() * R::two();

    let mut vals = vec![];
    let mut complex = 0;
    let mut i = 0;

    while i < n {
        if i + 1 < n && t[(i + 1, i)].abs() > tol {
            let (a, b) = (t[(i, i)], t[(i, i + 1)]);
            let (c, d) = (t[(i + 1, i)], t[(i + 1, i + 1)]);

            // roots of x^2 - (a + d) x + (ad - bc)
            let tr = a + d;
            let disc = tr * tr - four * (a * d - b * c);

            if disc >= R::zero() {
                let s = disc.sqrt();
                vals.push((tr + s) / R::two());
                vals.push((tr - s) / R::two());
            } else {
                complex += 2;
            }
            i += 2;
        } else {
            vals.push(t[(i, i)]);
            i += 1;
        }
    }

    (vals, complex)
}

// Householder QR: a = q r with q orthogonal, r upper triangular.
fn householder_qr<R: Real>(a: &Mat<R>) -> (Mat<R>, Mat<R>) {
    let n = a.nrows();
    let mut q = Mat::id(n);
    let mut r = a.clone();
    let tiny = (R::one() + a.max_norm()) * R::epsilon();

    for k in 0..(n - 1) {
        let norm = column_norm(&r, k, k);
        if norm <= tiny { continue }

        // v = x + sign(x_k) |x| e_k
        let mut v = vec![R::zero(); n];
        for i in k..n {
            v[i] = r[(i, k)];
        }
        v[k] = v[k] + if r[(k, k)] >= R::zero() { norm } else { -norm };

        let vv = (k..n).fold(R::zero(), |acc, i| acc + v[i] * v[i]);
        if vv <= tiny * tiny { continue }
        let beta = R::two() / vv;

        // r <- (id - beta v vᵀ) r
        for j in k..n {
            let s = (k..n).fold(R::zero(), |acc, i| acc + v[i] * r[(i, j)]);
            let bs = beta * s;
            for i in k..n {
                r.inner_mut()[(i, j)] -= bs * v[i];
            }
        }
        for i in (k + 1)..n {
            r.inner_mut()[(i, k)] = R::zero();
        }

        // q <- q (id - beta v vᵀ)
        for i in 0..n {
            let s = (k..n).fold(R::zero(), |acc, j| acc + q[(i, j)] * v[j]);
            let bs = beta * s;
            for j in k..n {
                q.inner_mut()[(i, j)] -= bs * v[j];
            }
        }
    }

    (q, r)
}

fn column_norm<R: Real>(a: &Mat<R>, from_row: usize, j: usize) -> R {
    (from_row..a.nrows())
        .fold(R::zero(), |acc, i| acc + a[(i, j)] * a[(i, j)])
        .sqrt()
}

// unit length, first nonzero component positive.
fn normalize<R: Real>(v: Mat<R>) -> Mat<R> {
    let norm = column_norm(&v, 0, 0);
    let flip = v.iter()
        .find(|e| !e.2.is_zero())
        .map(|e| *e.2 < R::zero())
        .unwrap_or(false);

    let s = if flip { -norm.recip() } else { norm.recip() };
    scale(&v, s)
}
