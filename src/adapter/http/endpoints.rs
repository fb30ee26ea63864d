//! [`MarketplaceApi`] over HTTP: the route table for every backend call.

use std::path::Path;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use super::client::MarketplaceClient;
use crate::domain::external::{CarrierSnapshot, ChargeRecord, CompanyRecord, SafetySnapshot};
use crate::domain::{
    Listing, ListingId, Offer, OfferDraft, OfferId, Transaction, TransactionDraft, TransactionId,
    User, UserId,
};
use crate::error::Result;
use crate::port::{
    Ack, ListQuery, ListingAction, MarketplaceApi, OfferAction, Page, PaymentKind, Scope,
    TransactionAction, UserAction,
};

/// Path segments plus optional JSON body of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub segments: Vec<String>,
    pub body: Option<Value>,
}

impl Route {
    fn new(segments: &[&str]) -> Self {
        Self {
            segments: segments.iter().map(|s| (*s).to_string()).collect(),
            body: None,
        }
    }

    fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Slash-joined path, for logs and tests.
    #[must_use]
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    fn segment_refs(&self) -> Vec<&str> {
        self.segments.iter().map(String::as_str).collect()
    }
}

fn collection(scope: Scope, name: &'static str) -> Vec<&'static str> {
    match scope {
        Scope::Own => vec![name],
        Scope::Admin => vec!["admin", name],
    }
}

#[must_use]
pub fn transaction_route(id: &TransactionId, action: &TransactionAction) -> Route {
    let id = id.as_str();
    match action {
        TransactionAction::BuyerApprove => Route::new(&["transactions", id, "buyer-approve"]),
        TransactionAction::SellerApprove => Route::new(&["transactions", id, "seller-approve"]),
        TransactionAction::AdminApprove => Route::new(&["admin", "transactions", id, "approve"]),
        TransactionAction::VerifyDeposit => {
            Route::new(&["admin", "transactions", id, "verify-deposit"])
        }
        TransactionAction::VerifyFinalPayment => {
            Route::new(&["admin", "transactions", id, "verify-final-payment"])
        }
        TransactionAction::Cancel { reason } => {
            Route::new(&["admin", "transactions", id, "cancel"]).with_body(json!({ "reason": reason }))
        }
    }
}

#[must_use]
pub fn payment_route(id: &TransactionId, kind: PaymentKind, reference: &str) -> Route {
    let leaf = match kind {
        PaymentKind::Deposit => "deposit",
        PaymentKind::Final => "final-payment",
    };
    Route::new(&["transactions", id.as_str(), leaf]).with_body(json!({ "reference": reference }))
}

#[must_use]
pub fn offer_route(id: &OfferId, action: &OfferAction) -> Route {
    let id = id.as_str();
    match action {
        OfferAction::Approve { notes } => {
            let route = Route::new(&["admin", "offers", id, "approve"]);
            match notes {
                Some(notes) => route.with_body(json!({ "adminNotes": notes })),
                None => route,
            }
        }
        OfferAction::Reject { reason } => {
            Route::new(&["admin", "offers", id, "reject"]).with_body(json!({ "reason": reason }))
        }
        OfferAction::Withdraw => Route::new(&["offers", id, "withdraw"]),
        OfferAction::AcceptCounter => Route::new(&["offers", id, "accept-counter"]),
    }
}

#[must_use]
pub fn listing_route(id: &ListingId, action: &ListingAction) -> Route {
    let id = id.as_str();
    match action {
        ListingAction::Approve => Route::new(&["admin", "listings", id, "approve"]),
        ListingAction::Reject { reason } => {
            Route::new(&["admin", "listings", id, "reject"]).with_body(json!({ "reason": reason }))
        }
    }
}

#[must_use]
pub fn user_route(id: &UserId, action: &UserAction) -> Route {
    let id = id.as_str();
    match action {
        UserAction::Block { reason } => {
            let route = Route::new(&["admin", "users", id, "block"]);
            match reason {
                Some(reason) => route.with_body(json!({ "reason": reason })),
                None => route,
            }
        }
        UserAction::Unblock => Route::new(&["admin", "users", id, "unblock"]),
        UserAction::Verify => Route::new(&["admin", "users", id, "verify"]),
    }
}

impl MarketplaceClient {
    async fn command(&self, route: Route) -> Result<Ack> {
        let ack = self.post_ack(&route.segment_refs(), route.body.as_ref()).await?;
        info!(path = %route.path(), "Command accepted");
        Ok(ack)
    }
}

#[async_trait]
impl MarketplaceApi for MarketplaceClient {
    async fn current_user(&self) -> Result<User> {
        self.get_data(&["auth", "me"], &[]).await
    }

    async fn list_transactions(&self, scope: Scope, query: &ListQuery) -> Result<Page<Transaction>> {
        self.get_page(&collection(scope, "transactions"), query).await
    }

    async fn get_transaction(&self, id: &TransactionId) -> Result<Transaction> {
        self.get_data(&["transactions", id.as_str()], &[]).await
    }

    async fn create_transaction(&self, draft: &TransactionDraft) -> Result<Transaction> {
        let body = serde_json::to_value(draft)?;
        let txn: Transaction = self.post_data(&["admin", "transactions"], &body).await?;
        info!(transaction_id = %txn.id, "Transaction created");
        Ok(txn)
    }

    async fn transaction_action(&self, id: &TransactionId, action: &TransactionAction) -> Result<Ack> {
        self.command(transaction_route(id, action)).await
    }

    async fn record_payment(
        &self,
        id: &TransactionId,
        kind: PaymentKind,
        reference: &str,
    ) -> Result<Ack> {
        self.command(payment_route(id, kind, reference)).await
    }

    async fn upload_payment_proof(&self, id: &TransactionId, file: &Path) -> Result<Ack> {
        self.upload(&["transactions", id.as_str(), "payment-proof"], "file", file)
            .await
    }

    async fn list_offers(&self, scope: Scope, query: &ListQuery) -> Result<Page<Offer>> {
        self.get_page(&collection(scope, "offers"), query).await
    }

    async fn create_offer(&self, draft: &OfferDraft) -> Result<Offer> {
        let body = serde_json::to_value(draft)?;
        let offer: Offer = self.post_data(&["offers"], &body).await?;
        info!(offer_id = %offer.id, listing_id = %draft.listing_id, "Offer submitted");
        Ok(offer)
    }

    async fn offer_action(&self, id: &OfferId, action: &OfferAction) -> Result<Ack> {
        self.command(offer_route(id, action)).await
    }

    async fn list_listings(&self, scope: Scope, query: &ListQuery) -> Result<Page<Listing>> {
        self.get_page(&collection(scope, "listings"), query).await
    }

    async fn get_listing(&self, id: &ListingId) -> Result<Listing> {
        self.get_data(&["listings", id.as_str()], &[]).await
    }

    async fn listing_action(&self, id: &ListingId, action: &ListingAction) -> Result<Ack> {
        self.command(listing_route(id, action)).await
    }

    async fn list_users(&self, query: &ListQuery) -> Result<Page<User>> {
        self.get_page(&["admin", "users"], query).await
    }

    async fn user_action(&self, id: &UserId, action: &UserAction) -> Result<Ack> {
        self.command(user_route(id, action)).await
    }

    async fn carrier_snapshot(&self, dot_number: &str) -> Result<CarrierSnapshot> {
        self.get_data(&["fmcsa", "carrier", dot_number], &[])
            .await
    }

    async fn carrier_safety(&self, dot_number: &str) -> Result<SafetySnapshot> {
        self.get_data(&["fmcsa", "carrier", dot_number, "sms"], &[])
            .await
    }

    async fn search_companies(&self, name: &str) -> Result<Vec<CompanyRecord>> {
        self.get_items(&["creditsafe", "companies"], &[("name", name.to_string())])
            .await
    }

    async fn charge_history(&self) -> Result<Vec<ChargeRecord>> {
        self.get_items(&["stripe", "charges"], &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn() -> TransactionId {
        TransactionId::new("t42")
    }

    #[test]
    fn party_approvals_use_party_routes() {
        assert_eq!(
            transaction_route(&txn(), &TransactionAction::BuyerApprove).path(),
            "transactions/t42/buyer-approve"
        );
        assert_eq!(
            transaction_route(&txn(), &TransactionAction::SellerApprove).path(),
            "transactions/t42/seller-approve"
        );
    }

    #[test]
    fn admin_commands_use_admin_routes() {
        assert_eq!(
            transaction_route(&txn(), &TransactionAction::AdminApprove).path(),
            "admin/transactions/t42/approve"
        );
        assert_eq!(
            transaction_route(&txn(), &TransactionAction::VerifyDeposit).path(),
            "admin/transactions/t42/verify-deposit"
        );
        assert_eq!(
            transaction_route(&txn(), &TransactionAction::VerifyFinalPayment).path(),
            "admin/transactions/t42/verify-final-payment"
        );
    }

    #[test]
    fn cancel_carries_reason() {
        let route = transaction_route(
            &txn(),
            &TransactionAction::Cancel {
                reason: "Buyer withdrew".into(),
            },
        );
        assert_eq!(route.path(), "admin/transactions/t42/cancel");
        assert_eq!(route.body, Some(json!({ "reason": "Buyer withdrew" })));
    }

    #[test]
    fn payment_routes_by_kind() {
        let deposit = payment_route(&txn(), PaymentKind::Deposit, "WIRE-1");
        assert_eq!(deposit.path(), "transactions/t42/deposit");
        assert_eq!(deposit.body, Some(json!({ "reference": "WIRE-1" })));
        assert_eq!(
            payment_route(&txn(), PaymentKind::Final, "WIRE-2").path(),
            "transactions/t42/final-payment"
        );
    }

    #[test]
    fn offer_routes() {
        let id = OfferId::new("o1");
        let approve = offer_route(&id, &OfferAction::Approve { notes: None });
        assert_eq!(approve.path(), "admin/offers/o1/approve");
        assert!(approve.body.is_none());
        assert_eq!(
            offer_route(&id, &OfferAction::Reject { reason: "low".into() }).body,
            Some(json!({ "reason": "low" }))
        );
        assert_eq!(offer_route(&id, &OfferAction::Withdraw).path(), "offers/o1/withdraw");
        assert_eq!(
            offer_route(&id, &OfferAction::AcceptCounter).path(),
            "offers/o1/accept-counter"
        );
    }

    #[test]
    fn listing_and_user_routes() {
        assert_eq!(
            listing_route(&ListingId::new("l1"), &ListingAction::Approve).path(),
            "admin/listings/l1/approve"
        );
        let user = UserId::new("u1");
        assert_eq!(
            user_route(&user, &UserAction::Block { reason: None }).path(),
            "admin/users/u1/block"
        );
        assert_eq!(user_route(&user, &UserAction::Unblock).path(), "admin/users/u1/unblock");
        assert_eq!(user_route(&user, &UserAction::Verify).path(), "admin/users/u1/verify");
    }

    #[test]
    fn scoped_collections() {
        assert_eq!(collection(Scope::Own, "offers"), vec!["offers"]);
        assert_eq!(collection(Scope::Admin, "offers"), vec!["admin", "offers"]);
    }
}
