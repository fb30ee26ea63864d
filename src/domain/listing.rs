//! MC authorities offered for sale.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ListingId, ListingStatus, ListingVisibility, UserId};

/// One MC authority listed on the marketplace.
///
/// `asking_price` is what the seller wants; `listing_price` is the published
/// buyer-facing price. The difference is the platform margin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Listing {
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub id: ListingId,
    #[serde(deserialize_with = "super::lenient::text")]
    pub mc_number: Option<String>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub dot_number: Option<String>,
    pub legal_name: Option<String>,
    pub dba_name: Option<String>,
    pub title: Option<String>,
    pub asking_price: Option<Decimal>,
    pub listing_price: Option<Decimal>,
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub status: ListingStatus,
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub visibility: ListingVisibility,
    pub safety_rating: Option<String>,
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub insurance_on_file: bool,
    pub state: Option<String>,
    pub years_active: Option<u32>,
    pub fleet_size: Option<u32>,
    pub seller_id: Option<UserId>,
    pub rejection_reason: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// Platform margin, when both prices are known.
    #[must_use]
    pub fn margin(&self) -> Option<Decimal> {
        match (self.asking_price, self.listing_price) {
            (Some(ask), Some(published)) => Some(published - ask),
            _ => None,
        }
    }

    /// Price shown to buyers: the published price, else the seller's ask.
    #[must_use]
    pub fn buyer_price(&self) -> Option<Decimal> {
        self.listing_price.or(self.asking_price)
    }

    /// Headline for lists: title, legal name, then MC number.
    #[must_use]
    pub fn headline(&self) -> String {
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            return title.to_string();
        }
        if let Some(name) = self.legal_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        match &self.mc_number {
            Some(mc) => format!("MC-{mc}"),
            None => self.id.to_string(),
        }
    }
}

/// Abbreviated listing embedded in transactions and offers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingSummary {
    pub id: ListingId,
    #[serde(deserialize_with = "super::lenient::text")]
    pub mc_number: Option<String>,
    pub legal_name: Option<String>,
    pub title: Option<String>,
}

impl ListingSummary {
    #[must_use]
    pub fn label(&self) -> String {
        match (&self.mc_number, &self.legal_name) {
            (Some(mc), Some(name)) => format!("MC-{mc} {name}"),
            (Some(mc), None) => format!("MC-{mc}"),
            (None, Some(name)) => name.clone(),
            (None, None) => self.title.clone().unwrap_or_else(|| self.id.to_string()),
        }
    }
}
