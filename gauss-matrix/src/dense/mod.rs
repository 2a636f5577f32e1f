pub use crate::MatTrait;

mod _mat;
pub use _mat::Mat;

mod parse;

mod ops;
pub use ops::*;

mod echelon;
pub use echelon::*;

pub mod eig;
