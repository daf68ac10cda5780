pub mod market;
pub mod offer;
pub mod valuation;
pub mod window;

pub use market::*;
pub use offer::*;
pub use valuation::*;
pub use window::*;
