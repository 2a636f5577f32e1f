mod abst;
mod misc;

pub use abst::*;
pub use misc::*;

pub mod util;
