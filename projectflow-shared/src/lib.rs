//! # ProjectFlow Shared Library
//!
//! Domain core of the ProjectFlow API: everything except HTTP wiring.
//!
//! ## Module Organization
//!
//! - `auth`: token codec, password hashing, login, access guard, ownership rule
//! - `db`: connection pool and embedded migrations
//! - `models`: typed rows and parameterized queries per table
//! - `services`: uniqueness checks, association sets, cascades, partial updates
//! - `error`: service error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

/// Current version of the ProjectFlow shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
