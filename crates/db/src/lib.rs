//! SQLite persistence for the backlog, its reference data and generated documents.

mod error;
pub mod models;
mod pool;
pub mod repositories;
mod seed;

pub use error::*;
pub use pool::*;
pub use repositories::*;
pub use seed::*;
