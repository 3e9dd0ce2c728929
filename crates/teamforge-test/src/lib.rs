//! Shared test fixtures for TeamForge crates.
//!
//! - [`pool`] - participant constructors and seeded random pools
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! teamforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use teamforge_test::pool::{participant, seeded_pool};
//! ```

pub mod pool;

pub use pool::{homogeneous_pool, participant, seeded_pool};
