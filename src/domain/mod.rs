//! Marketplace domain: records, shared status enums, projections and stats.

pub mod error;
pub mod external;
mod lenient;
pub mod projector;
pub mod stats;

mod ids;
mod listing;
mod offer;
mod status;
mod transaction;
mod user;

pub use ids::{ListingId, OfferId, TransactionId, UserId};
pub use listing::{Listing, ListingSummary};
pub use offer::{Offer, OfferDraft};
pub use status::{
    ListingStatus, ListingVisibility, OfferStatus, TransactionStatus, UserRole, UserStatus,
};
pub use transaction::{Transaction, TransactionDraft};
pub use user::{PartySummary, User};
