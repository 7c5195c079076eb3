pub mod ai_providers;
mod health;
pub mod prd;
pub mod requirements;
pub mod test_cases;

pub use health::*;
