pub mod playoff;
pub mod progression;
pub mod rollover;

pub use playoff::*;
pub use progression::*;
pub use rollover::*;
