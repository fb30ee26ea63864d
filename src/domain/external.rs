//! Read-only records passed through from third-party data providers.
//!
//! FMCSA, Creditsafe and Stripe payloads arrive loosely shaped. Every field is
//! optional and tolerant of its type: identifiers may come as numbers, counts
//! as strings. A value that fits no reading is dropped rather than failing the
//! record. Display sites supply the fallback: `"N/A"` for text and zero for
//! numbers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Placeholder shown for any missing text field.
pub const NOT_AVAILABLE: &str = "N/A";

/// Text for display, with [`NOT_AVAILABLE`] for missing or blank values.
#[must_use]
pub fn or_na(value: Option<&str>) -> &str {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(NOT_AVAILABLE)
}

/// Number for display, with zero for missing values.
#[must_use]
pub fn or_zero<N: Default + Copy>(value: Option<N>) -> N {
    value.unwrap_or_default()
}

/// FMCSA carrier census snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarrierSnapshot {
    #[serde(deserialize_with = "super::lenient::text")]
    pub dot_number: Option<String>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub mc_number: Option<String>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub legal_name: Option<String>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub dba_name: Option<String>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub operating_status: Option<String>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub entity_type: Option<String>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub physical_address: Option<String>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "super::lenient::number")]
    pub power_units: Option<u32>,
    #[serde(deserialize_with = "super::lenient::number")]
    pub drivers: Option<u32>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub safety_rating: Option<String>,
    #[serde(deserialize_with = "super::lenient::nested")]
    pub authority: Option<AuthoritySnapshot>,
    #[serde(deserialize_with = "super::lenient::nested")]
    pub insurance: Option<InsuranceSnapshot>,
    /// SMS safety data, fetched separately and attached when available.
    #[serde(skip)]
    pub safety: Option<SafetySnapshot>,
}

/// Operating authority status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthoritySnapshot {
    #[serde(deserialize_with = "super::lenient::text")]
    pub common_authority: Option<String>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub contract_authority: Option<String>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub broker_authority: Option<String>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub granted_at: Option<String>,
}

/// Insurance filings on record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsuranceSnapshot {
    #[serde(deserialize_with = "super::lenient::number")]
    pub bipd_on_file: Option<Decimal>,
    #[serde(deserialize_with = "super::lenient::number")]
    pub bipd_required: Option<Decimal>,
    #[serde(deserialize_with = "super::lenient::number")]
    pub cargo_on_file: Option<Decimal>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub insurer: Option<String>,
}

/// SMS (Safety Measurement System) percentiles and inspection counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafetySnapshot {
    #[serde(deserialize_with = "super::lenient::number")]
    pub unsafe_driving: Option<f64>,
    #[serde(deserialize_with = "super::lenient::number")]
    pub hours_of_service: Option<f64>,
    #[serde(deserialize_with = "super::lenient::number")]
    pub vehicle_maintenance: Option<f64>,
    #[serde(deserialize_with = "super::lenient::number")]
    pub driver_fitness: Option<f64>,
    #[serde(deserialize_with = "super::lenient::number")]
    pub inspections: Option<u32>,
    #[serde(deserialize_with = "super::lenient::number")]
    pub crashes: Option<u32>,
    #[serde(deserialize_with = "super::lenient::number")]
    pub out_of_service_rate: Option<f64>,
}

/// Company match from a Creditsafe search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyRecord {
    #[serde(deserialize_with = "super::lenient::text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub reg_no: Option<String>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub status: Option<String>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub address: Option<String>,
    #[serde(deserialize_with = "super::lenient::number")]
    pub credit_score: Option<u32>,
    #[serde(deserialize_with = "super::lenient::number")]
    pub credit_limit: Option<Decimal>,
}

/// Charge from the Stripe history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChargeRecord {
    #[serde(deserialize_with = "super::lenient::text")]
    pub id: Option<String>,
    /// Amount in minor units (cents), as Stripe reports it.
    #[serde(deserialize_with = "super::lenient::number")]
    pub amount: Option<i64>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub currency: Option<String>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub status: Option<String>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "super::lenient::text")]
    pub customer_email: Option<String>,
    #[serde(deserialize_with = "super::lenient::timestamp")]
    pub created: Option<DateTime<Utc>>,
}

impl ChargeRecord {
    /// Amount in major units, zero when missing.
    #[must_use]
    pub fn amount_major(&self) -> Decimal {
        Decimal::new(or_zero(self.amount), 2)
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.status.as_deref() == Some("succeeded")
    }
}
