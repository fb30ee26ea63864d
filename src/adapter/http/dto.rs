//! Wire shapes of the marketplace REST API.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::User;
use crate::error::{ApiError, Result};
use crate::port::{Ack, Page, Pagination};

/// Standard response envelope: `{ success, data, pagination?, message?, error? }`.
#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_success() -> bool {
    true
}

impl<T> Envelope<T> {
    fn check(&self) -> Result<()> {
        if self.success {
            return Ok(());
        }
        let message = self
            .error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "Request was not successful".to_string());
        Err(ApiError::Rejected { message }.into())
    }

    /// The `data` payload, failing on `success: false` or an absent payload.
    pub fn into_data(self) -> Result<T> {
        self.check()?;
        self.data.ok_or_else(|| ApiError::MissingData.into())
    }

    /// The acknowledgement message of a command.
    pub fn into_ack(self) -> Result<Ack> {
        self.check()?;
        Ok(Ack {
            message: self.message,
        })
    }
}

impl<T> Envelope<Vec<T>> {
    /// A page of list data; a missing `data` array is an empty page.
    pub fn into_page(self) -> Result<Page<T>> {
        self.check()?;
        Ok(Page::new(self.data.unwrap_or_default(), self.pagination))
    }
}

/// Extract the best error text from a non-2xx response body.
#[must_use]
pub fn error_message(status: u16, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<serde_json::Value>,
        message: Option<String>,
    }

    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    let from_body = parsed.and_then(|b| {
        let error = b.error.and_then(|e| match e {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Object(map) => map
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string),
            _ => None,
        });
        let message = b.message;
        error.filter(|e| !e.trim().is_empty()).or(message)
    });

    from_body
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {status}"))
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Account details submitted at sign-up.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Token pair returned by login, register and refresh.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Offer, Transaction, TransactionStatus};
    use crate::error::Error;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn envelope_data_success() {
        let env: Envelope<Transaction> =
            serde_json::from_str(r#"{"success":true,"data":{"id":"t1","status":"APPROVED"}}"#)
                .unwrap();
        assert_eq!(env.into_data().unwrap().id.as_str(), "t1");
    }

    #[test]
    fn envelope_without_success_flag_is_ok() {
        let env: Envelope<Vec<Transaction>> = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(env.into_page().unwrap().is_empty());
    }

    #[test]
    fn envelope_failure_uses_error_then_message() {
        let env: Envelope<Transaction> =
            serde_json::from_str(r#"{"success":false,"message":"Not allowed"}"#).unwrap();
        match env.into_data() {
            Err(Error::Api(ApiError::Rejected { message })) => assert_eq!(message, "Not allowed"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn envelope_missing_data_is_an_error() {
        let env: Envelope<Transaction> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(
            env.into_data(),
            Err(Error::Api(ApiError::MissingData))
        ));
    }

    #[test]
    fn ack_carries_message() {
        let env: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"success":true,"message":"Deposit verified"}"#).unwrap();
        assert_eq!(
            env.into_ack().unwrap().message.as_deref(),
            Some("Deposit verified")
        );
    }

    #[test]
    fn page_keeps_pagination() {
        let env: Envelope<Vec<Transaction>> = serde_json::from_str(
            r#"{"success":true,"data":[{"id":"a"}],"pagination":{"page":1,"limit":1,"total":4,"totalPages":4}}"#,
        )
        .unwrap();
        let page = env.into_page().unwrap();
        assert_eq!(page.total(), 4);
        assert!(page.has_next());
    }

    #[test]
    fn page_survives_null_fields_in_rows() {
        let env: Envelope<Vec<Transaction>> = serde_json::from_str(
            r#"{"success":true,"data":[
                {"id":"t1","status":"IN_REVIEW","buyerApproved":null,"sellerApproved":true,"adminApproved":null},
                {"id":"t2","status":null,"agreedPrice":null}
            ]}"#,
        )
        .unwrap();
        let page = env.into_page().unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(!page.items[0].buyer_approved);
        assert!(page.items[0].seller_approved);
        assert_eq!(page.items[1].status, TransactionStatus::default());
    }

    #[test]
    fn offer_and_user_pages_survive_nulls() {
        let offers: Envelope<Vec<Offer>> = serde_json::from_str(
            r#"{"data":[{"id":"o1","amount":null,"isBuyNow":null,"status":"PENDING"}]}"#,
        )
        .unwrap();
        let offers = offers.into_page().unwrap();
        assert_eq!(offers.items[0].amount, Decimal::ZERO);
        assert!(!offers.items[0].is_buy_now);

        let users: Envelope<Vec<User>> = serde_json::from_str(
            r#"{"data":[{"id":"u1","email":null,"name":"Dana","trustScore":87.5,"totalCredits":null,"usedCredits":2,"verified":null}]}"#,
        )
        .unwrap();
        let users = users.into_page().unwrap();
        let user = &users.items[0];
        assert_eq!(user.email, "");
        assert_eq!(user.display_name(), "Dana");
        assert_eq!(user.trust_score, Some(dec!(87.5)));
        assert_eq!(user.available_credits(), 0);
    }

    #[test]
    fn error_message_extraction() {
        assert_eq!(error_message(400, r#"{"error":"Bad input"}"#), "Bad input");
        assert_eq!(error_message(400, r#"{"message":"Try again"}"#), "Try again");
        assert_eq!(
            error_message(409, r#"{"error":{"message":"Already approved"}}"#),
            "Already approved"
        );
        assert_eq!(
            error_message(502, "<html>Bad Gateway</html>"),
            "Request failed with status 502"
        );
        assert_eq!(error_message(500, r#"{"error":""}"#), "Request failed with status 500");
        assert_eq!(
            error_message(422, r#"{"error":"  ","message":"Reason is required"}"#),
            "Reason is required"
        );
    }
}
