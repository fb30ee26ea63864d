//! mcdesk - client and operator CLI for an MC-authority marketplace.
//!
//! Buyers, sellers and platform admins share one backend. This crate gives
//! them a typed client for it, the derived views each role works from, and a
//! command line.
//!
//! # Architecture
//!
//! - **`domain`** - records, status enums, the workflow projector and the
//!   stats aggregator. Pure functions only.
//! - **`port`** - the [`port::MarketplaceApi`] and [`port::TokenStore`] traits
//! - **`adapter`** - the REST client and the session token holder
//! - **`application`** - dashboard loaders, debounced search, view states and
//!   role-scoped actions
//! - **`cli`** - the `mcdesk` binary's commands and output
//!
//! # Features
//!
//! - `testkit` - in-memory fake backend and record builders for tests
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mcdesk::adapter::http::MarketplaceClient;
//! use mcdesk::adapter::session::Session;
//! use mcdesk::port::{ListQuery, MarketplaceApi, Scope};
//!
//! # async fn run() -> mcdesk::error::Result<()> {
//! let client = MarketplaceClient::new("https://api.example.com/api/", Arc::new(Session::in_memory()))?;
//! client.login("ops@example.com", "secret").await?;
//! let page = client.list_transactions(Scope::Admin, &ListQuery::default()).await?;
//! println!("{} transactions", page.total());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
