//! SQLite storage implementation for Quotevault.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the `CoverageStore` trait defined in
//! `quotevault-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The warehouse repository and its database model types
//!
//! # Architecture
//!
//! This is the only crate where Diesel dependencies exist. `core` is
//! database-agnostic and works with traits.
//!
//! ```text
//!     core (domain)
//!          │
//!          ▼
//!  storage-sqlite (this crate)
//!          │
//!          ▼
//!      SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod warehouse;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export the store implementation
pub use warehouse::SqliteCoverageStore;

// Re-export from quotevault-core for convenience
pub use quotevault_core::errors::{DatabaseError, Error, Result};
