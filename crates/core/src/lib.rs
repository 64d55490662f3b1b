//! Quotevault Core - Read-through market data warehouse.
//!
//! This crate contains the domain logic for the warehouse: the trading-day
//! calendar heuristic, gap detection, the cache orchestration service, and the
//! storage/fetcher traits. It is database-agnostic; the traits defined here
//! are implemented by the `storage-sqlite` crate.

pub mod errors;
pub mod warehouse;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
