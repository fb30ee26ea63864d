//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! - [`MarketplaceApi`] - the remote backend
//! - [`TokenStore`] - durable credential storage

mod api;
mod session;

pub use api::{
    Ack, ListQuery, ListingAction, MarketplaceApi, OfferAction, Page, Pagination, PaymentKind,
    Scope, TransactionAction, UserAction,
};
pub use session::{StoredTokens, TokenStore};
