//! Role-scoped commands.
//!
//! Inputs are validated before any request is sent. Every command reports a
//! [`Notice`] instead of an error; callers refetch to see the new state.

use std::path::Path;
use std::sync::Arc;

use futures_util::future::join_all;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::view::Notice;
use crate::domain::error::{require_positive, require_text, ValidationError};
use crate::domain::{
    ListingId, Offer, OfferDraft, OfferId, TransactionDraft, TransactionId, UserId,
};
use crate::error::Result;
use crate::port::{
    Ack, ListingAction, MarketplaceApi, OfferAction, PaymentKind, TransactionAction, UserAction,
};

fn notice(result: Result<Ack>, done: &str) -> Notice {
    if let Err(err) = &result {
        warn!(error = %err, "Command failed");
    }
    Notice::from_result(result, done, |ack| ack.message.clone())
}

fn invalid(err: ValidationError) -> Notice {
    Notice::error(err.to_string())
}

/// Commands available to platform administrators.
pub struct AdminActions<A: ?Sized> {
    api: Arc<A>,
}

impl<A: MarketplaceApi + ?Sized> AdminActions<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub async fn approve_offer(&self, id: &OfferId, notes: Option<&str>) -> Notice {
        let notes = notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let result = self.api.offer_action(id, &OfferAction::Approve { notes }).await;
        notice(result, "Offer approved")
    }

    /// Approve several offers concurrently, one notice per offer in input order.
    pub async fn approve_offers(&self, ids: &[OfferId]) -> Vec<Notice> {
        join_all(ids.iter().map(|id| self.approve_offer(id, None))).await
    }

    pub async fn reject_offer(&self, id: &OfferId, reason: &str) -> Notice {
        let reason = match require_text("reason", reason) {
            Ok(reason) => reason.to_string(),
            Err(err) => return invalid(err),
        };
        let result = self.api.offer_action(id, &OfferAction::Reject { reason }).await;
        notice(result, "Offer rejected")
    }

    pub async fn approve_transaction(&self, id: &TransactionId) -> Notice {
        let result = self
            .api
            .transaction_action(id, &TransactionAction::AdminApprove)
            .await;
        notice(result, "Transaction approved")
    }

    pub async fn verify_deposit(&self, id: &TransactionId) -> Notice {
        let result = self
            .api
            .transaction_action(id, &TransactionAction::VerifyDeposit)
            .await;
        notice(result, "Deposit verified")
    }

    pub async fn verify_final_payment(&self, id: &TransactionId) -> Notice {
        let result = self
            .api
            .transaction_action(id, &TransactionAction::VerifyFinalPayment)
            .await;
        notice(result, "Final payment verified")
    }

    pub async fn cancel_transaction(&self, id: &TransactionId, reason: &str) -> Notice {
        let reason = match require_text("reason", reason) {
            Ok(reason) => reason.to_string(),
            Err(err) => return invalid(err),
        };
        let result = self
            .api
            .transaction_action(id, &TransactionAction::Cancel { reason })
            .await;
        notice(result, "Transaction cancelled")
    }

    pub async fn block_user(&self, id: &UserId, reason: Option<&str>) -> Notice {
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        let result = self.api.user_action(id, &UserAction::Block { reason }).await;
        notice(result, "User blocked")
    }

    pub async fn unblock_user(&self, id: &UserId) -> Notice {
        notice(self.api.user_action(id, &UserAction::Unblock).await, "User unblocked")
    }

    pub async fn verify_user(&self, id: &UserId) -> Notice {
        notice(self.api.user_action(id, &UserAction::Verify).await, "User verified")
    }

    pub async fn approve_listing(&self, id: &ListingId) -> Notice {
        notice(
            self.api.listing_action(id, &ListingAction::Approve).await,
            "Listing approved",
        )
    }

    pub async fn reject_listing(&self, id: &ListingId, reason: &str) -> Notice {
        let reason = match require_text("reason", reason) {
            Ok(reason) => reason.to_string(),
            Err(err) => return invalid(err),
        };
        let result = self
            .api
            .listing_action(id, &ListingAction::Reject { reason })
            .await;
        notice(result, "Listing rejected")
    }

    /// Open a transaction from explicit terms.
    pub async fn create_transaction(&self, draft: TransactionDraft) -> Notice {
        let checks = require_text("listing", draft.listing_id.as_str())
            .and(require_text("buyer", draft.buyer_id.as_str()))
            .and(require_positive("agreed price", draft.agreed_price));
        if let Err(err) = checks {
            return invalid(err);
        }
        if let Some(deposit) = draft.deposit_amount {
            if let Err(err) = require_positive("deposit", deposit) {
                return invalid(err);
            }
        }

        match self.api.create_transaction(&draft).await {
            Ok(txn) => {
                info!(transaction_id = %txn.id, "Transaction opened");
                Notice::success(format!("Transaction {} created", txn.id))
            }
            Err(err) => {
                warn!(error = %err, "Transaction creation failed");
                Notice::error(err.display_message())
            }
        }
    }

    /// Open a transaction on the terms of an offer.
    pub async fn create_from_offer(&self, offer: &Offer) -> Notice {
        let (Some(listing_id), Some(buyer_id)) = (offer.listing_id.clone(), offer.buyer_id.clone())
        else {
            return invalid(ValidationError::Required {
                field: "offer listing and buyer",
            });
        };
        self.create_transaction(TransactionDraft {
            offer_id: Some(offer.id.clone()),
            listing_id,
            buyer_id,
            agreed_price: offer.effective_amount(),
            deposit_amount: None,
            notes: None,
        })
        .await
    }
}

/// Commands available to buyers.
pub struct BuyerActions<A: ?Sized> {
    api: Arc<A>,
}

impl<A: MarketplaceApi + ?Sized> BuyerActions<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub async fn create_offer(
        &self,
        listing_id: &ListingId,
        amount: Decimal,
        message: Option<&str>,
        is_buy_now: bool,
    ) -> Notice {
        if let Err(err) = require_text("listing", listing_id.as_str())
            .and(require_positive("amount", amount))
        {
            return invalid(err);
        }
        let draft = OfferDraft {
            listing_id: listing_id.clone(),
            amount,
            message: message
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
            is_buy_now,
        };
        match self.api.create_offer(&draft).await {
            Ok(offer) => Notice::success(format!("Offer {} submitted", offer.id)),
            Err(err) => {
                warn!(error = %err, "Offer submission failed");
                Notice::error(err.display_message())
            }
        }
    }

    pub async fn withdraw_offer(&self, id: &OfferId) -> Notice {
        notice(
            self.api.offer_action(id, &OfferAction::Withdraw).await,
            "Offer withdrawn",
        )
    }

    pub async fn accept_counter(&self, id: &OfferId) -> Notice {
        notice(
            self.api.offer_action(id, &OfferAction::AcceptCounter).await,
            "Counter-offer accepted",
        )
    }

    pub async fn approve_transaction(&self, id: &TransactionId) -> Notice {
        notice(
            self.api
                .transaction_action(id, &TransactionAction::BuyerApprove)
                .await,
            "Transaction approved",
        )
    }

    pub async fn record_deposit(&self, id: &TransactionId, reference: &str) -> Notice {
        self.record_payment(id, PaymentKind::Deposit, reference, "Deposit recorded")
            .await
    }

    pub async fn record_final_payment(&self, id: &TransactionId, reference: &str) -> Notice {
        self.record_payment(id, PaymentKind::Final, reference, "Final payment recorded")
            .await
    }

    async fn record_payment(
        &self,
        id: &TransactionId,
        kind: PaymentKind,
        reference: &str,
        done: &str,
    ) -> Notice {
        let reference = match require_text("payment reference", reference) {
            Ok(reference) => reference,
            Err(err) => return invalid(err),
        };
        notice(self.api.record_payment(id, kind, reference).await, done)
    }

    pub async fn upload_payment_proof(&self, id: &TransactionId, file: &Path) -> Notice {
        if !file.is_file() {
            return invalid(ValidationError::MissingFile {
                path: file.display().to_string(),
            });
        }
        notice(
            self.api.upload_payment_proof(id, file).await,
            "Payment proof uploaded",
        )
    }
}

/// Commands available to sellers.
pub struct SellerActions<A: ?Sized> {
    api: Arc<A>,
}

impl<A: MarketplaceApi + ?Sized> SellerActions<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub async fn approve_transaction(&self, id: &TransactionId) -> Notice {
        notice(
            self.api
                .transaction_action(id, &TransactionAction::SellerApprove)
                .await,
            "Transaction approved",
        )
    }
}
