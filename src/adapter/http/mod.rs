//! HTTP adapter for the marketplace backend.

mod client;
mod dto;
mod endpoints;

pub use client::MarketplaceClient;
pub use dto::{error_message, Registration};
pub use endpoints::{listing_route, offer_route, payment_route, transaction_route, user_route, Route};
