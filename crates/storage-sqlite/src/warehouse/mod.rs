//! SQLite-backed warehouse storage.

pub mod model;
pub mod repository;

pub use repository::SqliteCoverageStore;
