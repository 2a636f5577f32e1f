/// Dimension queries shared by matrix types.
pub trait MatTrait {
    fn shape(&self) -> (usize, usize);

    fn nrows(&self) -> usize { self.shape().0 }
    fn ncols(&self) -> usize { self.shape().1 }

    /// Derived, never stored: recomputed from the current shape.
    fn is_square(&self) -> bool {
        let (m, n) = self.shape();
        m == n
    }

    /// Length of the main diagonal.
    fn min_dim(&self) -> usize {
        let (m, n) = self.shape();
        m.min(n)
    }
}
