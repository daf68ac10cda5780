pub mod league;
pub mod names;

pub use league::*;
pub use names::*;
