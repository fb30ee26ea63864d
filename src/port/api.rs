//! Marketplace backend port.
//!
//! This trait is the only way application code reaches the backend. The HTTP
//! adapter implements it for production; the `testkit` fake implements it for
//! tests.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::external::{CarrierSnapshot, ChargeRecord, CompanyRecord, SafetySnapshot};
use crate::domain::{
    Listing, ListingId, Offer, OfferDraft, OfferId, Transaction, TransactionDraft, TransactionId,
    User, UserId,
};
use crate::error::Result;

/// Whose records a list endpoint returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Records belonging to the signed-in user.
    #[default]
    Own,
    /// Every record, admin only.
    Admin,
}

/// Pagination and filter parameters for list endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            search: None,
            status: None,
            role: None,
        }
    }
}

impl ListQuery {
    /// Unfiltered first page with a large limit, used to compute global stats.
    #[must_use]
    pub fn everything(limit: u32) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search.trim().to_string())
        };
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Query-string pairs, omitting absent filters.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        if let Some(role) = &self.role {
            pairs.push(("role", role.clone()));
        }
        pairs
    }
}

/// Pagination block returned alongside list data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, pagination: Option<Pagination>) -> Self {
        Self { items, pagination }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total matching records server-side, or the page length when unknown.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.pagination
            .map(|p| p.total)
            .unwrap_or(self.items.len() as u64)
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.pagination
            .is_some_and(|p| p.page < p.total_pages)
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::new(Vec::new(), None)
    }
}

/// Acknowledgement of a command. The backend's word only; callers refetch to
/// see the new state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ack {
    pub message: Option<String>,
}

/// Commands on a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionAction {
    BuyerApprove,
    SellerApprove,
    AdminApprove,
    VerifyDeposit,
    VerifyFinalPayment,
    Cancel { reason: String },
}

/// Which payment a buyer is reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentKind {
    Deposit,
    Final,
}

/// Commands on an offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferAction {
    Approve { notes: Option<String> },
    Reject { reason: String },
    Withdraw,
    AcceptCounter,
}

/// Commands on a listing (admin review).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingAction {
    Approve,
    Reject { reason: String },
}

/// Commands on a user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Block { reason: Option<String> },
    Unblock,
    Verify,
}

/// The marketplace backend as seen by the application layer.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// The signed-in account.
    async fn current_user(&self) -> Result<User>;

    async fn list_transactions(&self, scope: Scope, query: &ListQuery) -> Result<Page<Transaction>>;
    async fn get_transaction(&self, id: &TransactionId) -> Result<Transaction>;
    async fn create_transaction(&self, draft: &TransactionDraft) -> Result<Transaction>;
    async fn transaction_action(&self, id: &TransactionId, action: &TransactionAction) -> Result<Ack>;
    async fn record_payment(
        &self,
        id: &TransactionId,
        kind: PaymentKind,
        reference: &str,
    ) -> Result<Ack>;
    async fn upload_payment_proof(&self, id: &TransactionId, file: &Path) -> Result<Ack>;

    async fn list_offers(&self, scope: Scope, query: &ListQuery) -> Result<Page<Offer>>;
    async fn create_offer(&self, draft: &OfferDraft) -> Result<Offer>;
    async fn offer_action(&self, id: &OfferId, action: &OfferAction) -> Result<Ack>;

    async fn list_listings(&self, scope: Scope, query: &ListQuery) -> Result<Page<Listing>>;
    async fn get_listing(&self, id: &ListingId) -> Result<Listing>;
    async fn listing_action(&self, id: &ListingId, action: &ListingAction) -> Result<Ack>;

    async fn list_users(&self, query: &ListQuery) -> Result<Page<User>>;
    async fn user_action(&self, id: &UserId, action: &UserAction) -> Result<Ack>;

    async fn carrier_snapshot(&self, dot_number: &str) -> Result<CarrierSnapshot>;
    async fn carrier_safety(&self, dot_number: &str) -> Result<SafetySnapshot>;
    async fn search_companies(&self, name: &str) -> Result<Vec<CompanyRecord>>;
    async fn charge_history(&self) -> Result<Vec<ChargeRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_skip_absent_filters() {
        let query = ListQuery::default().with_status("IN_REVIEW");
        assert_eq!(
            query.to_pairs(),
            vec![
                ("page", "1".to_string()),
                ("limit", "20".to_string()),
                ("status", "IN_REVIEW".to_string()),
            ]
        );
    }

    #[test]
    fn blank_search_is_dropped() {
        assert_eq!(ListQuery::default().with_search("   ").search, None);
        assert_eq!(
            ListQuery::default().with_search(" acme ").search.as_deref(),
            Some("acme")
        );
    }

    #[test]
    fn page_total_falls_back_to_len() {
        let page = Page::new(vec![1, 2, 3], None);
        assert_eq!(page.total(), 3);
        assert!(!page.has_next());

        let paged = Page::new(
            vec![1],
            Some(Pagination {
                page: 1,
                limit: 1,
                total: 9,
                total_pages: 9,
            }),
        );
        assert_eq!(paged.total(), 9);
        assert!(paged.has_next());
    }

    #[test]
    fn everything_query_is_unfiltered() {
        let query = ListQuery::everything(1000);
        assert_eq!(query.limit, 1000);
        assert_eq!(query.page, 1);
        assert!(query.status.is_none() && query.search.is_none() && query.role.is_none());
    }
}
