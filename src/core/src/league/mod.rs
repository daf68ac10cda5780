pub mod generator;
pub mod league;
pub mod schedule;
pub mod table;

pub use generator::*;
pub use league::*;
pub use schedule::*;
pub use table::*;
