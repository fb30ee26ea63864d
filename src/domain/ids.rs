//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Transaction identifier.
    TransactionId
);

string_id!(
    /// Offer identifier.
    OfferId
);

string_id!(
    /// Listing identifier.
    ListingId
);

string_id!(
    /// User identifier (buyers, sellers and admins share one id space).
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_strings() {
        let id = TransactionId::new("txn_42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"txn_42\"");

        let parsed: OfferId = serde_json::from_str("\"off_7\"").unwrap();
        assert_eq!(parsed.as_str(), "off_7");
    }

    #[test]
    fn display_is_raw_value() {
        assert_eq!(ListingId::from("lst_1").to_string(), "lst_1");
    }
}
