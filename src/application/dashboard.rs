//! Screen loaders.
//!
//! Each loader fans out its independent fetches with `tokio::join!` and joins
//! them. A failing branch never blocks the others: page-defining data turns
//! into a failed [`ViewState`], supporting data falls back to a default and
//! logs a warning. Every load can be cancelled, in which case its results are
//! discarded.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::cancel::CancelSignal;
use super::view::ViewState;
use crate::config::StatsConfig;
use crate::domain::external::{CarrierSnapshot, ChargeRecord};
use crate::domain::projector::{
    needs_buyer_action, needs_seller_action, offer_needs_review, position_of_transaction,
    progress_percent, states_at, StepPosition, StepState, STEP_COUNT,
};
use crate::domain::stats::{ListingStats, OfferStats, StatsPolicy, TransactionStats, UserStats};
use crate::domain::{Listing, Offer, Transaction, TransactionId, User};
use crate::error::Result;
use crate::port::{ListQuery, MarketplaceApi, Page, Scope};

/// Outcome of a cancellable load.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    Ready(T),
    Cancelled,
}

impl<T> Loaded<T> {
    #[must_use]
    pub fn into_ready(self) -> Option<T> {
        match self {
            Loaded::Ready(value) => Some(value),
            Loaded::Cancelled => None,
        }
    }
}

/// Admin "active closings": one filtered page plus global numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminClosings {
    pub transactions: ViewState<Page<Transaction>>,
    /// Computed from the unfiltered fetch, not from the visible page.
    pub stats: TransactionStats,
    pub charges: Vec<ChargeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerDashboard {
    pub transactions: ViewState<Page<Transaction>>,
    pub offers: ViewState<Page<Offer>>,
    pub stats: TransactionStats,
    pub offer_stats: OfferStats,
    /// Transactions waiting on the buyer.
    pub needs_action: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerDashboard {
    pub transactions: ViewState<Page<Transaction>>,
    pub listings: ViewState<Page<Listing>>,
    pub stats: TransactionStats,
    pub listing_stats: ListingStats,
    /// Transactions waiting on the seller.
    pub needs_action: Vec<Transaction>,
}

/// Admin overview cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub users: UserStats,
    pub listings: ListingStats,
    pub offers: OfferStats,
    pub transactions: TransactionStats,
    pub offers_awaiting_review: usize,
}

/// One transaction with its workflow projection.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionView {
    pub transaction: Transaction,
    pub position: StepPosition,
    pub states: [StepState; STEP_COUNT],
    pub progress: u8,
}

impl TransactionView {
    #[must_use]
    pub fn new(transaction: Transaction) -> Self {
        let position = position_of_transaction(&transaction);
        Self {
            states: states_at(position),
            progress: progress_percent(position),
            position,
            transaction,
        }
    }
}

/// Choices for the admin transaction creation form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreationForm {
    pub buyers: Vec<User>,
    pub listings: Vec<Listing>,
}

const NO_TRANSACTIONS: &str = "No transactions yet. They appear here once an offer is accepted.";
const NO_OFFERS: &str = "No offers yet. Browse listings to make one.";
const NO_LISTINGS: &str = "No listings yet. Create one to start selling.";

fn or_default<T: Default>(branch: &'static str, result: Result<T>) -> T {
    result.unwrap_or_else(|err| {
        warn!(branch, error = %err, "Fetch failed, using default");
        T::default()
    })
}

fn page_items<T>(state: &ViewState<Page<T>>) -> &[T] {
    state.ready().map(|page| page.items.as_slice()).unwrap_or(&[])
}

/// Loads every screen through one [`MarketplaceApi`].
pub struct DashboardLoader<A: ?Sized> {
    api: Arc<A>,
    policy: StatsPolicy,
    global_fetch_limit: u32,
}

impl<A: MarketplaceApi + ?Sized> DashboardLoader<A> {
    pub fn new(api: Arc<A>, stats: &StatsConfig) -> Self {
        Self {
            api,
            policy: stats.policy(),
            global_fetch_limit: stats.global_fetch_limit,
        }
    }

    async fn guarded<T>(&self, cancel: &CancelSignal, work: impl Future<Output = T>) -> Loaded<T> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("Load cancelled");
                Loaded::Cancelled
            }
            value = work => {
                if cancel.is_cancelled() {
                    Loaded::Cancelled
                } else {
                    Loaded::Ready(value)
                }
            }
        }
    }

    /// Admin closings: the requested page, global stats and Stripe history.
    pub async fn admin_closings(
        &self,
        query: &ListQuery,
        cancel: &CancelSignal,
    ) -> Loaded<AdminClosings> {
        let global = ListQuery::everything(self.global_fetch_limit);
        let work = async {
            let (page, everything, charges) = tokio::join!(
                self.api.list_transactions(Scope::Admin, query),
                self.api.list_transactions(Scope::Admin, &global),
                self.api.charge_history(),
            );
            let everything: Page<Transaction> = or_default("global_transactions", everything);
            AdminClosings {
                transactions: ViewState::from_page(page, NO_TRANSACTIONS),
                stats: TransactionStats::from_transactions(&everything.items, &self.policy),
                charges: or_default("charges", charges),
            }
        };
        self.guarded(cancel, work).await
    }

    pub async fn buyer(&self, query: &ListQuery, cancel: &CancelSignal) -> Loaded<BuyerDashboard> {
        let work = async {
            let (transactions, offers) = tokio::join!(
                self.api.list_transactions(Scope::Own, query),
                self.api.list_offers(Scope::Own, query),
            );
            let transactions = ViewState::from_page(transactions, NO_TRANSACTIONS);
            let offers = ViewState::from_page(offers, NO_OFFERS);
            let txns = page_items(&transactions);
            BuyerDashboard {
                stats: TransactionStats::from_transactions(txns, &self.policy),
                offer_stats: OfferStats::from_offers(page_items(&offers)),
                needs_action: txns.iter().filter(|t| needs_buyer_action(t)).cloned().collect(),
                transactions,
                offers,
            }
        };
        self.guarded(cancel, work).await
    }

    pub async fn seller(&self, query: &ListQuery, cancel: &CancelSignal) -> Loaded<SellerDashboard> {
        let work = async {
            let (transactions, listings) = tokio::join!(
                self.api.list_transactions(Scope::Own, query),
                self.api.list_listings(Scope::Own, query),
            );
            let transactions = ViewState::from_page(transactions, NO_TRANSACTIONS);
            let listings = ViewState::from_page(listings, NO_LISTINGS);
            let txns = page_items(&transactions);
            SellerDashboard {
                stats: TransactionStats::from_transactions(txns, &self.policy),
                listing_stats: ListingStats::from_listings(page_items(&listings)),
                needs_action: txns.iter().filter(|t| needs_seller_action(t)).cloned().collect(),
                transactions,
                listings,
            }
        };
        self.guarded(cancel, work).await
    }

    /// Admin overview cards, each computed from an unfiltered fetch.
    pub async fn admin_overview(&self, cancel: &CancelSignal) -> Loaded<AdminOverview> {
        let global = ListQuery::everything(self.global_fetch_limit);
        let work = async {
            let (users, listings, offers, transactions) = tokio::join!(
                self.api.list_users(&global),
                self.api.list_listings(Scope::Admin, &global),
                self.api.list_offers(Scope::Admin, &global),
                self.api.list_transactions(Scope::Admin, &global),
            );
            let users: Page<User> = or_default("users", users);
            let listings: Page<Listing> = or_default("listings", listings);
            let offers: Page<Offer> = or_default("offers", offers);
            let transactions: Page<Transaction> = or_default("transactions", transactions);
            AdminOverview {
                users: UserStats::from_users(&users.items),
                listings: ListingStats::from_listings(&listings.items),
                offers: OfferStats::from_offers(&offers.items),
                transactions: TransactionStats::from_transactions(&transactions.items, &self.policy),
                offers_awaiting_review: offers.items.iter().filter(|o| offer_needs_review(o)).count(),
            }
        };
        self.guarded(cancel, work).await
    }

    /// A single transaction with its workflow projection.
    pub async fn transaction(
        &self,
        id: &TransactionId,
        cancel: &CancelSignal,
    ) -> Loaded<ViewState<TransactionView>> {
        let work = async {
            ViewState::from_result(self.api.get_transaction(id).await).map(TransactionView::new)
        };
        self.guarded(cancel, work).await
    }

    /// Buyers and listings for the creation form, fetched together.
    pub async fn creation_form(&self, cancel: &CancelSignal) -> Loaded<CreationForm> {
        let global = ListQuery::everything(self.global_fetch_limit);
        let buyers_query = global.clone().with_role("BUYER");
        let listings_query = global.with_status("ACTIVE");
        let work = async {
            let (buyers, listings) = tokio::join!(
                self.api.list_users(&buyers_query),
                self.api.list_listings(Scope::Admin, &listings_query),
            );
            let buyers: Page<User> = or_default("buyers", buyers);
            let listings: Page<Listing> = or_default("listings", listings);
            CreationForm {
                buyers: buyers.items,
                listings: listings.items,
            }
        };
        self.guarded(cancel, work).await
    }

    /// FMCSA carrier lookup with SMS data attached when it loads. The census
    /// snapshot defines the page; SMS data is optional.
    pub async fn carrier(
        &self,
        dot_number: &str,
        cancel: &CancelSignal,
    ) -> Loaded<ViewState<CarrierSnapshot>> {
        let work = async {
            let dot = dot_number.trim();
            if dot.is_empty() {
                return ViewState::Empty {
                    hint: "Enter a USDOT number to look up a carrier.".into(),
                };
            }
            let (snapshot, safety) = tokio::join!(
                self.api.carrier_snapshot(dot),
                self.api.carrier_safety(dot),
            );
            ViewState::from_result(snapshot.map(|mut snapshot| {
                match safety {
                    Ok(safety) => snapshot.safety = Some(safety),
                    Err(err) => debug!(dot_number = dot, error = %err, "SMS data unavailable"),
                }
                snapshot
            }))
        };
        self.guarded(cancel, work).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionStatus;

    #[test]
    fn transaction_view_places_halted_record() {
        let txn = Transaction {
            status: TransactionStatus::Cancelled,
            buyer_approved: true,
            ..Default::default()
        };
        let view = TransactionView::new(txn);
        assert!(view.position.is_halted());
        assert_eq!(view.states[3], StepState::Error);
        assert_eq!(view.states[4], StepState::Pending);
    }

    #[test]
    fn loaded_into_ready() {
        assert_eq!(Loaded::Ready(3).into_ready(), Some(3));
        assert_eq!(Loaded::<u8>::Cancelled.into_ready(), None);
    }
}
