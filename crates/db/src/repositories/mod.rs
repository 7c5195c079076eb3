mod prd_repository;
mod reference_repository;
mod requirement_repository;
mod test_case_repository;

pub use prd_repository::*;
pub use reference_repository::*;
pub use requirement_repository::*;
pub use test_case_repository::*;
