use std::fmt::{Debug, Display};
use std::ops::{AddAssign, SubAssign, MulAssign, DivAssign};
use num_traits::Float;

/// Cell type for dense real matrices: a floating-point field element
/// together with the assign-ops and the marker bounds the containers need.
/// Blanket-implemented, so `f32` and `f64` qualify out of the box.
pub trait Real:
    Float +
    AddAssign +
    SubAssign +
    MulAssign +
    DivAssign +
    Default +
    Debug +
    Display +
    Send +
    Sync +
    'static
{
    fn two() -> Self {
        Self::one() + Self::one()
    }

    // total: saturates instead of failing on an impossible cast.
    fn from_count(n: usize) -> Self {
        num_traits::cast(n).unwrap_or_else(Self::max_value)
    }

    fn approx_eq(self, other: Self, tol: Self) -> bool {
        (self - other).abs() <= tol
    }
}

impl<T> Real for T where T:
    Float +
    AddAssign +
    SubAssign +
    MulAssign +
    DivAssign +
    Default +
    Debug +
    Display +
    Send +
    Sync +
    'static
{}
