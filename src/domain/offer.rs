//! Buyer offers on listings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ListingId, ListingSummary, OfferId, OfferStatus, PartySummary, UserId};

/// A buyer's bid on a listing.
///
/// Admin approval of an offer is what produces a transaction on the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Offer {
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub id: OfferId,
    pub listing_id: Option<ListingId>,
    pub buyer_id: Option<UserId>,
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub amount: Decimal,
    pub message: Option<String>,
    pub counter_amount: Option<Decimal>,
    pub counter_message: Option<String>,
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub status: OfferStatus,
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub is_buy_now: bool,
    pub admin_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<UserId>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub listing: Option<ListingSummary>,
    pub buyer: Option<PartySummary>,
}

impl Offer {
    /// Amount currently on the table: the counter if one was made.
    #[must_use]
    pub fn effective_amount(&self) -> Decimal {
        match (&self.status, self.counter_amount) {
            (OfferStatus::Countered, Some(counter)) => counter,
            _ => self.amount,
        }
    }
}

/// Fields a buyer submits to create an offer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferDraft {
    pub listing_id: ListingId,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub is_buy_now: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn effective_amount_uses_counter_only_when_countered() {
        let mut offer = Offer {
            amount: dec!(30000),
            counter_amount: Some(dec!(34000)),
            status: OfferStatus::Countered,
            ..Default::default()
        };
        assert_eq!(offer.effective_amount(), dec!(34000));

        offer.status = OfferStatus::Rejected;
        assert_eq!(offer.effective_amount(), dec!(30000));
    }

    #[test]
    fn draft_serializes_camel_case() {
        let draft = OfferDraft {
            listing_id: "lst_1".into(),
            amount: dec!(25000),
            message: None,
            is_buy_now: true,
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["listingId"], "lst_1");
        assert_eq!(json["isBuyNow"], true);
        assert!(json.get("message").is_none());
    }
}
