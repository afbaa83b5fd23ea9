//! # Inkwell Infrastructure
//!
//! Concrete implementations of the ports defined in `inkwell-core`.
//! This crate contains the database repositories and auth service
//! integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory repositories only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::memory::{InMemoryCommentRepository, InMemoryPostRepository, InMemoryUserRepository};
pub use database::{DatabaseConfig, DatabaseConnection};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtTokenService};

// Re-exports - Postgres
#[cfg(feature = "postgres")]
pub use database::{PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository};
