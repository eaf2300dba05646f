pub mod catalog;
pub mod deal;
pub mod page_target;
pub mod price;

pub use catalog::*;
pub use deal::*;
pub use page_target::*;
pub use price::*;
