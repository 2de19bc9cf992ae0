//! Sitebook Core - Domain entities, services, and traits.
//!
//! This crate contains the cost-code master data logic for Sitebook, including
//! the hierarchical bulk importer. It is database-agnostic and defines traits
//! that are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod cost_codes;
pub mod errors;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
