//! # TaskFlow Shared Library
//!
//! This crate contains the domain core shared by the TaskFlow API server:
//! database models, authentication primitives, and the connection pool.
//!
//! ## Module Organization
//!
//! - `models`: Database models and owner-scoped query construction
//! - `auth`: Password hashing and bearer token primitives
//! - `db`: PostgreSQL connection pool management

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the TaskFlow shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
