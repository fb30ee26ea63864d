//! In-memory [`MarketplaceApi`] for tests.
//!
//! Records every call, serves canned data with the backend's filtering and
//! paging rules, and can be told to fail or stall per endpoint.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::external::{CarrierSnapshot, ChargeRecord, CompanyRecord, SafetySnapshot};
use crate::domain::{
    Listing, ListingId, Offer, OfferDraft, OfferId, Transaction, TransactionDraft, TransactionId,
    User, UserId,
};
use crate::error::{ApiError, Error, Result};
use crate::port::{
    Ack, ListQuery, ListingAction, MarketplaceApi, OfferAction, Page, Pagination, PaymentKind,
    Scope, TransactionAction, UserAction,
};

/// Groups of endpoints that can be switched to failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CurrentUser,
    Transactions,
    Offers,
    Listings,
    Users,
    /// Every POST command.
    Commands,
    Carrier,
    CarrierSafety,
    Companies,
    Charges,
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CurrentUser,
    ListTransactions(Scope, ListQuery),
    GetTransaction(TransactionId),
    CreateTransaction(TransactionDraft),
    TransactionAction(TransactionId, TransactionAction),
    RecordPayment(TransactionId, PaymentKind, String),
    UploadPaymentProof(TransactionId, PathBuf),
    ListOffers(Scope, ListQuery),
    CreateOffer(OfferDraft),
    OfferAction(OfferId, OfferAction),
    ListListings(Scope, ListQuery),
    GetListing(ListingId),
    ListingAction(ListingId, ListingAction),
    ListUsers(ListQuery),
    UserAction(UserId, UserAction),
    CarrierSnapshot(String),
    CarrierSafety(String),
    SearchCompanies(String),
    ChargeHistory,
}

#[derive(Default)]
struct FakeData {
    current_user: Option<User>,
    transactions: Vec<Transaction>,
    offers: Vec<Offer>,
    listings: Vec<Listing>,
    users: Vec<User>,
    carrier: Option<CarrierSnapshot>,
    safety: Option<SafetySnapshot>,
    companies: Vec<CompanyRecord>,
    charges: Vec<ChargeRecord>,
}

/// Scriptable in-memory backend.
#[derive(Default)]
pub struct FakeApi {
    data: Mutex<FakeData>,
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<Endpoint>>,
    delay: Option<Duration>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current_user(self, user: User) -> Self {
        self.data.lock().current_user = Some(user);
        self
    }

    pub fn with_transactions(self, transactions: Vec<Transaction>) -> Self {
        self.data.lock().transactions = transactions;
        self
    }

    pub fn with_offers(self, offers: Vec<Offer>) -> Self {
        self.data.lock().offers = offers;
        self
    }

    pub fn with_listings(self, listings: Vec<Listing>) -> Self {
        self.data.lock().listings = listings;
        self
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        self.data.lock().users = users;
        self
    }

    pub fn with_carrier(self, carrier: CarrierSnapshot) -> Self {
        self.data.lock().carrier = Some(carrier);
        self
    }

    pub fn with_safety(self, safety: SafetySnapshot) -> Self {
        self.data.lock().safety = Some(safety);
        self
    }

    pub fn with_companies(self, companies: Vec<CompanyRecord>) -> Self {
        self.data.lock().companies = companies;
        self
    }

    pub fn with_charges(self, charges: Vec<ChargeRecord>) -> Self {
        self.data.lock().charges = charges;
        self
    }

    /// Make every call sleep first. Pair with `start_paused` tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make an endpoint group fail with HTTP 500.
    pub fn failing(self, endpoint: Endpoint) -> Self {
        self.fail(endpoint);
        self
    }

    pub fn fail(&self, endpoint: Endpoint) {
        self.failing.lock().insert(endpoint);
    }

    pub fn recover(&self, endpoint: Endpoint) {
        self.failing.lock().remove(&endpoint);
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| pred(call)).count()
    }

    async fn enter(&self, call: Call, endpoint: Endpoint) -> Result<()> {
        self.calls.lock().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().contains(&endpoint) {
            return Err(Error::Api(ApiError::Status {
                status: 500,
                message: format!("{endpoint:?} unavailable"),
            }));
        }
        Ok(())
    }

    fn ack(message: &str) -> Ack {
        Ack {
            message: Some(message.to_string()),
        }
    }
}

fn not_found(what: &str) -> Error {
    Error::Api(ApiError::Status {
        status: 404,
        message: format!("{what} not found"),
    })
}

fn matches_search(query: &ListQuery, haystack: &[Option<&str>]) -> bool {
    let Some(term) = &query.search else {
        return true;
    };
    let term = term.to_lowercase();
    haystack
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
}

fn matches_filter(filter: &Option<String>, value: &str) -> bool {
    filter
        .as_deref()
        .map_or(true, |wanted| wanted.eq_ignore_ascii_case(value))
}

fn paginate<T>(items: Vec<T>, query: &ListQuery) -> Page<T> {
    let limit = query.limit.max(1);
    let total = items.len() as u64;
    let total_pages = total.div_ceil(u64::from(limit)) as u32;
    let skip = (query.page.max(1) as usize - 1) * limit as usize;
    let items = items.into_iter().skip(skip).take(limit as usize).collect();
    Page::new(
        items,
        Some(Pagination {
            page: query.page.max(1),
            limit,
            total,
            total_pages,
        }),
    )
}

#[async_trait]
impl MarketplaceApi for FakeApi {
    async fn current_user(&self) -> Result<User> {
        self.enter(Call::CurrentUser, Endpoint::CurrentUser).await?;
        self.data
            .lock()
            .current_user
            .clone()
            .ok_or_else(|| ApiError::Unauthorized.into())
    }

    async fn list_transactions(&self, scope: Scope, query: &ListQuery) -> Result<Page<Transaction>> {
        self.enter(Call::ListTransactions(scope, query.clone()), Endpoint::Transactions)
            .await?;
        let rows = self
            .data
            .lock()
            .transactions
            .iter()
            .filter(|t| matches_filter(&query.status, t.status.as_str()))
            .filter(|t| {
                let label = t.listing_label();
                matches_search(query, &[Some(t.id.as_str()), Some(label.as_str())])
            })
            .cloned()
            .collect();
        Ok(paginate(rows, query))
    }

    async fn get_transaction(&self, id: &TransactionId) -> Result<Transaction> {
        self.enter(Call::GetTransaction(id.clone()), Endpoint::Transactions)
            .await?;
        self.data
            .lock()
            .transactions
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| not_found("Transaction"))
    }

    async fn create_transaction(&self, draft: &TransactionDraft) -> Result<Transaction> {
        self.enter(Call::CreateTransaction(draft.clone()), Endpoint::Commands)
            .await?;
        let mut data = self.data.lock();
        let txn = Transaction {
            id: TransactionId::new(format!("t{}", data.transactions.len() + 1)),
            agreed_price: Some(draft.agreed_price),
            deposit_amount: draft.deposit_amount,
            offer_id: draft.offer_id.clone(),
            listing_id: Some(draft.listing_id.clone()),
            buyer_id: Some(draft.buyer_id.clone()),
            ..Default::default()
        };
        data.transactions.push(txn.clone());
        Ok(txn)
    }

    async fn transaction_action(&self, id: &TransactionId, action: &TransactionAction) -> Result<Ack> {
        self.enter(
            Call::TransactionAction(id.clone(), action.clone()),
            Endpoint::Commands,
        )
        .await?;
        Ok(Self::ack("Transaction updated"))
    }

    async fn record_payment(
        &self,
        id: &TransactionId,
        kind: PaymentKind,
        reference: &str,
    ) -> Result<Ack> {
        self.enter(
            Call::RecordPayment(id.clone(), kind, reference.to_string()),
            Endpoint::Commands,
        )
        .await?;
        Ok(Self::ack("Payment recorded"))
    }

    async fn upload_payment_proof(&self, id: &TransactionId, file: &Path) -> Result<Ack> {
        self.enter(
            Call::UploadPaymentProof(id.clone(), file.to_path_buf()),
            Endpoint::Commands,
        )
        .await?;
        Ok(Self::ack("Proof uploaded"))
    }

    async fn list_offers(&self, scope: Scope, query: &ListQuery) -> Result<Page<Offer>> {
        self.enter(Call::ListOffers(scope, query.clone()), Endpoint::Offers)
            .await?;
        let rows = self
            .data
            .lock()
            .offers
            .iter()
            .filter(|o| matches_filter(&query.status, o.status.as_str()))
            .filter(|o| matches_search(query, &[Some(o.id.as_str())]))
            .cloned()
            .collect();
        Ok(paginate(rows, query))
    }

    async fn create_offer(&self, draft: &OfferDraft) -> Result<Offer> {
        self.enter(Call::CreateOffer(draft.clone()), Endpoint::Commands)
            .await?;
        let mut data = self.data.lock();
        let offer = Offer {
            id: OfferId::new(format!("o{}", data.offers.len() + 1)),
            listing_id: Some(draft.listing_id.clone()),
            amount: draft.amount,
            message: draft.message.clone(),
            is_buy_now: draft.is_buy_now,
            ..Default::default()
        };
        data.offers.push(offer.clone());
        Ok(offer)
    }

    async fn offer_action(&self, id: &OfferId, action: &OfferAction) -> Result<Ack> {
        self.enter(Call::OfferAction(id.clone(), action.clone()), Endpoint::Commands)
            .await?;
        Ok(Self::ack("Offer updated"))
    }

    async fn list_listings(&self, scope: Scope, query: &ListQuery) -> Result<Page<Listing>> {
        self.enter(Call::ListListings(scope, query.clone()), Endpoint::Listings)
            .await?;
        let rows = self
            .data
            .lock()
            .listings
            .iter()
            .filter(|l| matches_filter(&query.status, l.status.as_str()))
            .filter(|l| {
                matches_search(
                    query,
                    &[
                        l.mc_number.as_deref(),
                        l.legal_name.as_deref(),
                        l.title.as_deref(),
                    ],
                )
            })
            .cloned()
            .collect();
        Ok(paginate(rows, query))
    }

    async fn get_listing(&self, id: &ListingId) -> Result<Listing> {
        self.enter(Call::GetListing(id.clone()), Endpoint::Listings)
            .await?;
        self.data
            .lock()
            .listings
            .iter()
            .find(|l| &l.id == id)
            .cloned()
            .ok_or_else(|| not_found("Listing"))
    }

    async fn listing_action(&self, id: &ListingId, action: &ListingAction) -> Result<Ack> {
        self.enter(Call::ListingAction(id.clone(), action.clone()), Endpoint::Commands)
            .await?;
        Ok(Self::ack("Listing updated"))
    }

    async fn list_users(&self, query: &ListQuery) -> Result<Page<User>> {
        self.enter(Call::ListUsers(query.clone()), Endpoint::Users)
            .await?;
        let rows = self
            .data
            .lock()
            .users
            .iter()
            .filter(|u| matches_filter(&query.status, u.status.as_str()))
            .filter(|u| matches_filter(&query.role, u.role.as_str()))
            .filter(|u| {
                matches_search(
                    query,
                    &[Some(u.email.as_str()), u.name.as_deref(), u.company_name.as_deref()],
                )
            })
            .cloned()
            .collect();
        Ok(paginate(rows, query))
    }

    async fn user_action(&self, id: &UserId, action: &UserAction) -> Result<Ack> {
        self.enter(Call::UserAction(id.clone(), action.clone()), Endpoint::Commands)
            .await?;
        Ok(Self::ack("User updated"))
    }

    async fn carrier_snapshot(&self, dot_number: &str) -> Result<CarrierSnapshot> {
        self.enter(Call::CarrierSnapshot(dot_number.to_string()), Endpoint::Carrier)
            .await?;
        self.data
            .lock()
            .carrier
            .clone()
            .ok_or_else(|| not_found("Carrier"))
    }

    async fn carrier_safety(&self, dot_number: &str) -> Result<SafetySnapshot> {
        self.enter(
            Call::CarrierSafety(dot_number.to_string()),
            Endpoint::CarrierSafety,
        )
        .await?;
        self.data
            .lock()
            .safety
            .clone()
            .ok_or_else(|| not_found("SMS data"))
    }

    async fn search_companies(&self, name: &str) -> Result<Vec<CompanyRecord>> {
        self.enter(Call::SearchCompanies(name.to_string()), Endpoint::Companies)
            .await?;
        let term = name.to_lowercase();
        Ok(self
            .data
            .lock()
            .companies
            .iter()
            .filter(|c| {
                c.name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&term))
            })
            .cloned()
            .collect())
    }

    async fn charge_history(&self) -> Result<Vec<ChargeRecord>> {
        self.enter(Call::ChargeHistory, Endpoint::Charges).await?;
        Ok(self.data.lock().charges.clone())
    }
}
