//! Marketplace accounts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{UserId, UserRole, UserStatus};

/// A buyer, seller or admin account as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub id: UserId,
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub email: String,
    pub name: Option<String>,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub role: UserRole,
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub status: UserStatus,
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub verified: bool,
    #[serde(deserialize_with = "super::lenient::number")]
    pub trust_score: Option<Decimal>,
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub total_credits: i64,
    #[serde(deserialize_with = "super::lenient::or_default")]
    pub used_credits: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Credits left to spend, never negative.
    #[must_use]
    pub fn available_credits(&self) -> i64 {
        (self.total_credits - self.used_credits).max(0)
    }

    /// Name for display, falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// Abbreviated party record embedded in transactions and offers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartySummary {
    pub id: UserId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub company_name: Option<String>,
}

impl PartySummary {
    /// Best available label for the party.
    #[must_use]
    pub fn label(&self) -> &str {
        self.company_name
            .as_deref()
            .or(self.name.as_deref())
            .or(self.email.as_deref())
            .unwrap_or(self.id.as_str())
    }
}
