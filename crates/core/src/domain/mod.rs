mod prd;
mod reference;
mod requirement;
mod test_case;

pub use prd::*;
pub use reference::*;
pub use requirement::*;
pub use test_case::*;
