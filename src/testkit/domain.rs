//! Builders for domain records used across tests.
//!
//! Each builder fills the fields a test usually cares about and leaves the
//! rest at their defaults.

use rust_decimal::Decimal;

use crate::domain::{
    Listing, ListingId, ListingStatus, Offer, OfferId, OfferStatus, Transaction, TransactionId,
    TransactionStatus, User, UserId, UserRole, UserStatus,
};

/// Transaction `id` in `status` with an agreed price.
pub fn transaction(id: &str, status: TransactionStatus, agreed_price: Decimal) -> Transaction {
    Transaction {
        id: TransactionId::new(id),
        status,
        agreed_price: Some(agreed_price),
        ..Default::default()
    }
}

/// Transactions with the given statuses, ids `t0..`, price 10 000 each.
pub fn transactions(statuses: &[TransactionStatus]) -> Vec<Transaction> {
    statuses
        .iter()
        .enumerate()
        .map(|(i, status)| transaction(&format!("t{i}"), status.clone(), Decimal::from(10_000)))
        .collect()
}

pub fn offer(id: &str, status: OfferStatus, amount: Decimal) -> Offer {
    Offer {
        id: OfferId::new(id),
        listing_id: Some(ListingId::new("l1")),
        buyer_id: Some(UserId::new("u1")),
        amount,
        status,
        ..Default::default()
    }
}

pub fn listing(id: &str, status: ListingStatus) -> Listing {
    Listing {
        id: ListingId::new(id),
        mc_number: Some(format!("MC{id}")),
        legal_name: Some(format!("Carrier {id}")),
        status,
        ..Default::default()
    }
}

pub fn user(id: &str, role: UserRole, status: UserStatus) -> User {
    User {
        id: UserId::new(id),
        email: format!("{id}@example.com"),
        name: Some(format!("User {id}")),
        role,
        status,
        ..Default::default()
    }
}
