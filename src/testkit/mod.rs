//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`fake`] - In-memory [`MarketplaceApi`](crate::port::MarketplaceApi)
//!   with call recording and per-endpoint failure switches.
//! - [`domain`] - Builders for transactions, offers, listings and users.
//! - [`config`] - Canonical test configuration.

pub mod config;
pub mod domain;
pub mod fake;

pub use fake::{Call, Endpoint, FakeApi};
