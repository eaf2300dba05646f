pub mod browser;
pub mod deal_comparator;
pub mod droid;
pub mod price_extractor;

pub use browser::*;
pub use deal_comparator::*;
pub use droid::*;
pub use price_extractor::*;
