//! Sales of MC authorities between a buyer and a seller.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::projector::WorkflowStep;
use super::{
    ListingId, ListingSummary, OfferId, PartySummary, TransactionId, TransactionStatus, UserId,
};

/// One sale of an MC authority.
///
/// The backend owns the lifecycle. Buyer, seller and admin approvals are
/// independent flags, each stamped when given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transaction {
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub id: TransactionId,
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub status: TransactionStatus,
    pub agreed_price: Option<Decimal>,
    pub deposit_amount: Option<Decimal>,
    pub platform_fee: Option<Decimal>,
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub buyer_approved: bool,
    pub buyer_approved_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub seller_approved: bool,
    pub seller_approved_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub admin_approved: bool,
    pub admin_approved_at: Option<DateTime<Utc>>,
    pub deposit_paid_at: Option<DateTime<Utc>>,
    pub deposit_reference: Option<String>,
    pub final_payment_paid_at: Option<DateTime<Utc>>,
    pub final_payment_reference: Option<String>,
    pub cancellation_reason: Option<String>,
    pub offer_id: Option<OfferId>,
    pub listing_id: Option<ListingId>,
    pub buyer_id: Option<UserId>,
    pub seller_id: Option<UserId>,
    pub listing: Option<ListingSummary>,
    pub buyer: Option<PartySummary>,
    pub seller: Option<PartySummary>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    #[must_use]
    pub fn deposit_recorded(&self) -> bool {
        self.deposit_paid_at.is_some() || has_text(&self.deposit_reference)
    }

    #[must_use]
    pub fn final_payment_recorded(&self) -> bool {
        self.final_payment_paid_at.is_some() || has_text(&self.final_payment_reference)
    }

    /// Balance due at closing: agreed price less the deposit.
    #[must_use]
    pub fn balance_due(&self) -> Option<Decimal> {
        let price = self.agreed_price?;
        Some(price - self.deposit_amount.unwrap_or(Decimal::ZERO))
    }

    /// Furthest workflow step the record shows evidence of reaching.
    ///
    /// Used to place cancelled and disputed transactions on the progress bar,
    /// since their status no longer says where they stopped.
    #[must_use]
    pub fn furthest_evidenced_step(&self) -> WorkflowStep {
        if self.final_payment_recorded() {
            WorkflowStep::PaymentReceived
        } else if self.admin_approved {
            WorkflowStep::Approved
        } else if self.buyer_approved || self.seller_approved {
            WorkflowStep::InReview
        } else if self.deposit_recorded() {
            WorkflowStep::DepositReceived
        } else {
            WorkflowStep::TermsAgreement
        }
    }

    /// Label for the listing being sold.
    #[must_use]
    pub fn listing_label(&self) -> String {
        match (&self.listing, &self.listing_id) {
            (Some(listing), _) => listing.label(),
            (None, Some(id)) => id.to_string(),
            (None, None) => "N/A".to_string(),
        }
    }
}

/// Fields an admin submits to open a transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_id: Option<OfferId>,
    pub listing_id: ListingId,
    pub buyer_id: UserId,
    pub agreed_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn deserializes_backend_payload() {
        let json = r#"{
            "id": "txn_1",
            "status": "IN_REVIEW",
            "agreedPrice": 52000,
            "depositAmount": 5200,
            "buyerApproved": true,
            "buyerApprovedAt": "2024-03-02T10:00:00Z",
            "sellerApproved": false,
            "listing": {"id": "lst_1", "mcNumber": "998877", "legalName": "Acme Haul"},
            "buyer": {"id": "u_b", "name": "Bo"}
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.status, TransactionStatus::InReview);
        assert!(txn.buyer_approved);
        assert!(txn.buyer_approved_at.is_some());
        assert_eq!(txn.balance_due(), Some(dec!(46800)));
        assert_eq!(txn.listing_label(), "MC-998877 Acme Haul");
    }

    #[test]
    fn blank_reference_is_not_a_payment() {
        let txn = Transaction {
            final_payment_reference: Some("   ".into()),
            ..Default::default()
        };
        assert!(!txn.final_payment_recorded());
    }

    #[test]
    fn furthest_step_reads_flags_and_timestamps() {
        let mut txn = Transaction::default();
        assert_eq!(txn.furthest_evidenced_step(), WorkflowStep::TermsAgreement);

        txn.deposit_reference = Some("wire-001".into());
        assert_eq!(txn.furthest_evidenced_step(), WorkflowStep::DepositReceived);

        txn.seller_approved = true;
        assert_eq!(txn.furthest_evidenced_step(), WorkflowStep::InReview);

        txn.admin_approved = true;
        assert_eq!(txn.furthest_evidenced_step(), WorkflowStep::Approved);

        txn.final_payment_paid_at = Some(Utc::now());
        assert_eq!(txn.furthest_evidenced_step(), WorkflowStep::PaymentReceived);
    }

    #[test]
    fn missing_listing_label_is_na() {
        assert_eq!(Transaction::default().listing_label(), "N/A");
    }
}
