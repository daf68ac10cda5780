pub mod squad;

pub use squad::*;
