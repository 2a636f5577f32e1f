use std::cmp::Ordering;
use log::{debug, trace};
use num_traits::{One, Zero};
use gauss::{Real, Sign};
use crate::{MatError, MatTrait};
use super::Mat;

pub fn echelonize<R: Real>(target: &Mat<R>, reduced: bool) -> Echelon<R> {
    echelonize_in_place(target.clone(), reduced)
}

pub fn echelonize_in_place<R: Real>(target: Mat<R>, reduced: bool) -> Echelon<R> {
    debug!("start echelon: {:?}, reduced: {}.", target.shape(), reduced);
    trace!("{}", target);

    let mut calc = EchelonCalc::new(target);

    calc.process(reduced);

    debug!("echelon done, rank: {}.", calc.pivots.len());
    trace!("{}", calc.target);

    calc.result()
}

/// Row echelon form: Gaussian elimination with partial pivoting. The
/// leading entry of every nonzero row lies strictly right of the one
/// above; zero rows sort to the bottom.
pub fn row_echelon_form<R: Real>(a: &Mat<R>) -> Mat<R> {
    echelonize(a, false).into_result()
}

/// Reduced row echelon form: pivots normalized to 1, pivot columns
/// cleared above and below. Idempotent.
pub fn reduced_row_echelon_form<R: Real>(a: &Mat<R>) -> Mat<R> {
    echelonize(a, true).into_result()
}

/// Number of pivot rows in the echelon form of `a`.
pub fn rank<R: Real>(a: &Mat<R>) -> usize {
    echelonize(a, false).rank()
}

/// Treats the rows of `a` as vectors: true iff they span a space of
/// dimension m.
pub fn is_linearly_independent<R: Real>(a: &Mat<R>) -> bool {
    rank(a) == a.nrows()
}

/// Determinant via elimination: the product of the pivots of the echelon
/// form, negated once per row swap. Zero when the rank falls short.
pub fn det<R: Real>(a: &Mat<R>) -> Result<R, MatError> {
    let (m, n) = a.shape();
    if m != n {
        return Err(MatError::NotSquare(m, n))
    }

    let e = echelonize(a, false);
    if e.rank() < n {
        return Ok(R::zero())
    }

    let prod = (0..n).fold(R::one(), |acc, i| acc * e.result()[(i, i)]);
    if e.sign().is_negative() {
        Ok(-prod)
    } else {
        Ok(prod)
    }
}

/// Basis of { x : a x = 0 }, one vector per free column of the reduced
/// form. Entries with |x| <= tol count as zero during elimination.
pub fn null_space<R: Real>(a: &Mat<R>, tol: R) -> Vec<Mat<R>> {
    let n = a.ncols();

    let mut calc = EchelonCalc::with_tol(a.clone(), tol);
    calc.process(true);
    let e = calc.result();
    let r = e.result();

    let mut is_pivot = vec![false; n];
    for &(_, j) in e.pivots() {
        is_pivot[j] = true;
    }

    (0..n).filter(|&f| !is_pivot[f]).map(|f| {
        let mut v = Mat::zero((n, 1));
        v.inner_mut()[(f, 0)] = R::one();
        for &(i, j) in e.pivots() {
            v.inner_mut()[(j, 0)] = -r[(i, f)];
        }
        v
    }).collect()
}

#[derive(Debug)]
pub struct Echelon<R: Real> {
    result: Mat<R>,
    sign: Sign,
    pivots: Vec<(usize, usize)>
}

impl<R: Real> Echelon<R> {
    pub fn result(&self) -> &Mat<R> {
        &self.result
    }

    pub fn into_result(self) -> Mat<R> {
        self.result
    }

    /// Parity of the row swaps performed.
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// Pivot positions, one per nonzero row, in row order.
    pub fn pivots(&self) -> &[(usize, usize)] {
        &self.pivots
    }

    pub fn rank(&self) -> usize {
        self.pivots.len()
    }
}

#[derive(Debug)]
pub struct EchelonCalc<R: Real> {
    target: Mat<R>,
    swaps: usize,
    pivots: Vec<(usize, usize)>,
    tol: R
}

impl<R: Real> EchelonCalc<R> {
    pub fn new(target: Mat<R>) -> Self {
        let tol = default_tol(&target);
        Self::with_tol(target, tol)
    }

    pub fn with_tol(target: Mat<R>, tol: R) -> Self {
        EchelonCalc { target, swaps: 0, pivots: vec![], tol }
    }

    pub fn result(self) -> Echelon<R> {
        Echelon {
            result: self.target,
            sign: Sign::from_parity(self.swaps as u32),
            pivots: self.pivots
        }
    }

    pub fn process(&mut self, reduced: bool) {
        if self.target.is_zero() {
            return
        }

        self.eliminate_all();
        if reduced {
            self.reduce_all();
        }
    }

    fn eliminate_all(&mut self) {
        let (m, n) = self.target.shape();
        let mut i = 0;

        for j in 0..n {
            if i >= m { break }
            if self.eliminate_step(i, j) {
                i += 1;
            }
        }
    }

    fn eliminate_step(&mut self, i: usize, j: usize) -> bool {
        let Some(i_p) = self.select_pivot(i, j) else {
            return false
        };

        trace!("select-pivot: ({i_p}, {j})");

        if i_p > i {
            self.swap_rows(i, i_p);
        }

        self.eliminate_below(i, j);
        self.pivots.push((i, j));

        true
    }

    // partial pivoting: among the remaining rows, the one with the
    // largest |entry| in column j.
    fn select_pivot(&self, below_i: usize, j: usize) -> Option<usize> {
        (below_i..self.target.nrows())
            .filter( |&i| self.target[(i, j)].abs() > self.tol )
            .max_by( |&i1, &i2| {
                let (a1, a2) = (self.target[(i1, j)].abs(), self.target[(i2, j)].abs());
                a1.partial_cmp(&a2).unwrap_or(Ordering::Equal)
            })
    }

    fn eliminate_below(&mut self, i: usize, j: usize) {
        let p = self.target[(i, j)];

        for k in (i + 1)..self.target.nrows() {
            let a = self.target[(k, j)];
            if a.is_zero() { continue }

            self.target.add_row_to(i, k, -(a / p));
            self.target.inner_mut()[(k, j)] = R::zero();
        }

        trace!("eliminate-below: ({i}, {j})\n{}", self.target);
    }

    fn reduce_all(&mut self) {
        for idx in (0..self.pivots.len()).rev() {
            let (i, j) = self.pivots[idx];
            self.normalize_pivot(i, j);
            self.eliminate_above(i, j);
        }
    }

    fn normalize_pivot(&mut self, i: usize, j: usize) {
        let p = self.target[(i, j)];
        if p.is_one() { return }

        self.target.mul_row(i, p.recip());
        self.target.inner_mut()[(i, j)] = R::one();

        trace!("normalize-pivot: ({i}, {j})\n{}", self.target);
    }

    fn eliminate_above(&mut self, i: usize, j: usize) {
        for k in 0..i {
            let a = self.target[(k, j)];
            if a.is_zero() { continue }

            self.target.add_row_to(i, k, -a);
            self.target.inner_mut()[(k, j)] = R::zero();
        }

        trace!("eliminate-above: ({i}, {j})\n{}", self.target);
    }

    fn swap_rows(&mut self, i: usize, j: usize) {
        self.target.swap_rows(i, j);
        self.swaps += 1;

        trace!("swap-rows: ({i}, {j})\n{}", self.target);
    }
}

fn default_tol<R: Real>(a: &Mat<R>) -> R {
    let (m, n) = a.shape();
    R::from_count(m.max(n)) * R::epsilon() * a.max_norm()
}
