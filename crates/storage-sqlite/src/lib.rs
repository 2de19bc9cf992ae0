//! SQLite storage implementation for Sitebook.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `sitebook-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for divisions, cost codes and GL accounts
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `core` is database-agnostic and works with traits.
//!
//! ```text
//!          core (domain)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod cost_codes;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from sitebook-core for convenience
pub use sitebook_core::errors::{DatabaseError, Error, Result};
