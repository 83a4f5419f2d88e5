//! Shared test fixtures for coursetable crates.
//!
//! This crate only depends on `coursetable-core` so that every other crate
//! can use it as a dev-dependency.
//!
//! - [`fixtures`] - hand-built instances for small, fully predictable
//!   scenarios and the `Toy` instance of the ITC-2007 curriculum track
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! coursetable-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use coursetable_test::fixtures;
//!
//! let instance = fixtures::toy();
//! ```

pub mod fixtures;

pub use fixtures::TOY_ECTT;
