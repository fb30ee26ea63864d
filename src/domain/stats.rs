//! Dashboard statistics folded from in-memory lists.
//!
//! Every figure here is computed over whatever the caller fetched. Global
//! numbers require the caller to fetch the whole collection first (see
//! `StatsConfig::global_fetch_limit`); there is no server-side aggregate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::{
    Listing, ListingStatus, Offer, OfferStatus, Transaction, TransactionStatus, User, UserRole,
    UserStatus,
};

/// Deposit assumed for a transaction whose `depositAmount` is absent.
///
/// Likely an approximation rather than a business rule; the product owner has
/// not confirmed it. Override with `[stats] deposit_fallback`.
pub const DEFAULT_DEPOSIT_FALLBACK: Decimal = dec!(5000);

/// Knobs that change how aggregates are computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsPolicy {
    pub deposit_fallback: Decimal,
}

impl Default for StatsPolicy {
    fn default() -> Self {
        Self {
            deposit_fallback: DEFAULT_DEPOSIT_FALLBACK,
        }
    }
}

/// Count items matching a predicate.
pub fn count<T>(items: &[T], pred: impl Fn(&T) -> bool) -> usize {
    items.iter().filter(|item| pred(item)).count()
}

/// Sum a decimal field over items matching a predicate.
pub fn sum<T>(
    items: &[T],
    selector: impl Fn(&T) -> Decimal,
    pred: impl Fn(&T) -> bool,
) -> Decimal {
    items
        .iter()
        .filter(|item| pred(item))
        .map(selector)
        .fold(Decimal::ZERO, |acc, value| acc + value)
}

/// Compute a percentage, returning None if the denominator is zero.
#[must_use]
pub fn percentage(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator > 0 {
        Some(numerator as f64 / denominator as f64 * 100.0)
    } else {
        None
    }
}

fn is_active(txn: &Transaction) -> bool {
    !txn.status.is_terminal()
}

/// Headline numbers for transaction views.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    pub total: usize,
    pub active: usize,
    pub needs_review: usize,
    pub awaiting_payment: usize,
    pub verify_payment: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub disputed: usize,
    /// Agreed price summed over non-terminal transactions.
    pub total_pipeline: Decimal,
    /// Deposits summed over non-terminal transactions, with the fallback
    /// substituted for missing amounts.
    pub total_deposits: Decimal,
    pub completed_volume: Decimal,
    pub platform_fees: Decimal,
}

impl TransactionStats {
    #[must_use]
    pub fn from_transactions(transactions: &[Transaction], policy: &StatsPolicy) -> Self {
        let status_is = |status: TransactionStatus| {
            move |txn: &Transaction| txn.status == status
        };

        Self {
            total: transactions.len(),
            active: count(transactions, is_active),
            needs_review: count(transactions, |t| {
                matches!(
                    t.status,
                    TransactionStatus::DepositReceived | TransactionStatus::InReview
                )
            }),
            awaiting_payment: count(transactions, |t| {
                matches!(
                    t.status,
                    TransactionStatus::AwaitingDeposit | TransactionStatus::AwaitingFinalPayment
                )
            }),
            verify_payment: count(transactions, status_is(TransactionStatus::PaymentReceived)),
            completed: count(transactions, status_is(TransactionStatus::Completed)),
            cancelled: count(transactions, status_is(TransactionStatus::Cancelled)),
            disputed: count(transactions, status_is(TransactionStatus::Disputed)),
            total_pipeline: sum(
                transactions,
                |t| t.agreed_price.unwrap_or(Decimal::ZERO),
                is_active,
            ),
            total_deposits: sum(
                transactions,
                |t| t.deposit_amount.unwrap_or(policy.deposit_fallback),
                is_active,
            ),
            completed_volume: sum(
                transactions,
                |t| t.agreed_price.unwrap_or(Decimal::ZERO),
                status_is(TransactionStatus::Completed),
            ),
            platform_fees: sum(
                transactions,
                |t| t.platform_fee.unwrap_or(Decimal::ZERO),
                status_is(TransactionStatus::Completed),
            ),
        }
    }

    /// Share of finished transactions that completed rather than failed.
    #[must_use]
    pub fn completion_rate(&self) -> Option<f64> {
        percentage(
            self.completed,
            self.completed + self.cancelled + self.disputed,
        )
    }
}

/// Headline numbers for offer views.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub countered: usize,
    pub accepted: usize,
    /// Buy-now offers, whatever their status.
    pub buy_now: usize,
    pub total_offer_value: Decimal,
}

impl OfferStats {
    #[must_use]
    pub fn from_offers(offers: &[Offer]) -> Self {
        let status_is = |status: OfferStatus| move |offer: &Offer| offer.status == status;

        Self {
            total: offers.len(),
            pending: count(offers, status_is(OfferStatus::Pending)),
            approved: count(offers, status_is(OfferStatus::Approved)),
            rejected: count(offers, status_is(OfferStatus::Rejected)),
            countered: count(offers, status_is(OfferStatus::Countered)),
            accepted: count(offers, status_is(OfferStatus::Accepted)),
            buy_now: count(offers, |o| o.is_buy_now),
            total_offer_value: sum(offers, |o| o.amount, |_| true),
        }
    }

    /// Mean offer amount, or None with no offers.
    #[must_use]
    pub fn average_offer(&self) -> Option<Decimal> {
        if self.total == 0 {
            None
        } else {
            Some((self.total_offer_value / Decimal::from(self.total)).round_dp(2))
        }
    }
}

/// Headline numbers for the user directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: usize,
    pub buyers: usize,
    pub sellers: usize,
    pub admins: usize,
    pub active: usize,
    pub blocked: usize,
    pub pending: usize,
    pub verified: usize,
}

impl UserStats {
    #[must_use]
    pub fn from_users(users: &[User]) -> Self {
        let role_is = |role: UserRole| move |user: &User| user.role == role;
        let status_is = |status: UserStatus| move |user: &User| user.status == status;

        Self {
            total: users.len(),
            buyers: count(users, role_is(UserRole::Buyer)),
            sellers: count(users, role_is(UserRole::Seller)),
            admins: count(users, role_is(UserRole::Admin)),
            active: count(users, status_is(UserStatus::Active)),
            blocked: count(users, status_is(UserStatus::Blocked)),
            pending: count(users, status_is(UserStatus::Pending)),
            verified: count(users, |u| u.verified),
        }
    }

    #[must_use]
    pub fn verification_rate(&self) -> Option<f64> {
        percentage(self.verified, self.total)
    }
}

/// Headline numbers for listing views.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingStats {
    pub total: usize,
    pub pending_review: usize,
    pub active: usize,
    pub sold: usize,
    pub total_asking: Decimal,
    pub total_listing: Decimal,
    /// Margin summed over listings that carry both prices.
    pub total_margin: Decimal,
}

impl ListingStats {
    #[must_use]
    pub fn from_listings(listings: &[Listing]) -> Self {
        let status_is = |status: ListingStatus| move |listing: &Listing| listing.status == status;

        Self {
            total: listings.len(),
            pending_review: count(listings, status_is(ListingStatus::PendingReview)),
            active: count(listings, status_is(ListingStatus::Active)),
            sold: count(listings, status_is(ListingStatus::Sold)),
            total_asking: sum(listings, |l| l.asking_price.unwrap_or(Decimal::ZERO), |_| true),
            total_listing: sum(listings, |l| l.listing_price.unwrap_or(Decimal::ZERO), |_| true),
            total_margin: sum(listings, |l| l.margin().unwrap_or(Decimal::ZERO), |_| true),
        }
    }
}
