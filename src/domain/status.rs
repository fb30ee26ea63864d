//! Status enumerations shared with the marketplace backend.
//!
//! The backend owns these enumerations; the client mirrors them here once so
//! the projector and the aggregator read the same definitions. Every enum has
//! an `Unknown` arm that keeps the raw server value, so a status added on the
//! server never breaks deserialization.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// A value this client does not recognise, kept verbatim.
            Unknown(String),
        }

        impl $name {
            /// Every recognised variant in declaration order.
            pub const KNOWN: &'static [$name] = &[$($name::$variant),+];

            /// Wire representation.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Unknown(raw) => raw.as_str(),
                }
            }

            /// Parse a wire value. Never fails; unrecognised input becomes `Unknown`.
            #[must_use]
            pub fn parse(raw: &str) -> Self {
                match raw.trim().to_ascii_uppercase().as_str() {
                    $($wire => $name::$variant,)+
                    _ => $name::Unknown(raw.to_string()),
                }
            }

            /// True for the `Unknown` fallback arm.
            #[must_use]
            pub fn is_unknown(&self) -> bool {
                matches!(self, $name::Unknown(_))
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::parse(raw)
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self::parse(&raw)
            }
        }

        impl From<$name> for String {
            fn from(status: $name) -> Self {
                match status {
                    $name::Unknown(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum!(
    /// Lifecycle of a transaction. The happy path runs top to bottom;
    /// `Cancelled` and `Disputed` are absorbing.
    TransactionStatus {
        TermsPending => "TERMS_PENDING",
        AwaitingDeposit => "AWAITING_DEPOSIT",
        DepositReceived => "DEPOSIT_RECEIVED",
        InReview => "IN_REVIEW",
        Approved => "APPROVED",
        AwaitingFinalPayment => "AWAITING_FINAL_PAYMENT",
        PaymentReceived => "PAYMENT_RECEIVED",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
        Disputed => "DISPUTED",
    }
);

impl TransactionStatus {
    /// Completed, cancelled or disputed: no further work is expected.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Completed | TransactionStatus::Cancelled | TransactionStatus::Disputed
        )
    }

    /// Cancelled or disputed: progress halted with a fault.
    #[must_use]
    pub fn is_absorbing(&self) -> bool {
        matches!(self, TransactionStatus::Cancelled | TransactionStatus::Disputed)
    }
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::TermsPending
    }
}

wire_enum!(
    /// Lifecycle of a buyer's offer on a listing.
    OfferStatus {
        Pending => "PENDING",
        Approved => "APPROVED",
        Rejected => "REJECTED",
        Accepted => "ACCEPTED",
        Countered => "COUNTERED",
        Expired => "EXPIRED",
        Withdrawn => "WITHDRAWN",
    }
);

impl Default for OfferStatus {
    fn default() -> Self {
        OfferStatus::Pending
    }
}

wire_enum!(
    /// Review state of a listing.
    ListingStatus {
        Draft => "DRAFT",
        PendingReview => "PENDING_REVIEW",
        Active => "ACTIVE",
        Reserved => "RESERVED",
        Sold => "SOLD",
        Rejected => "REJECTED",
        Archived => "ARCHIVED",
    }
);

impl Default for ListingStatus {
    fn default() -> Self {
        ListingStatus::Draft
    }
}

wire_enum!(
    /// Who can see a listing.
    ListingVisibility {
        Public => "PUBLIC",
        Private => "PRIVATE",
        Unlisted => "UNLISTED",
    }
);

impl Default for ListingVisibility {
    fn default() -> Self {
        ListingVisibility::Public
    }
}

wire_enum!(
    /// Account role.
    UserRole {
        Buyer => "BUYER",
        Seller => "SELLER",
        Admin => "ADMIN",
    }
);

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Buyer
    }
}

wire_enum!(
    /// Account standing.
    UserStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        Blocked => "BLOCKED",
        Pending => "PENDING",
    }
);

impl Default for UserStatus {
    fn default() -> Self {
        UserStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_recognises_every_known_variant() {
        for status in TransactionStatus::KNOWN {
            assert_eq!(&TransactionStatus::parse(status.as_str()), status);
        }
        for status in OfferStatus::KNOWN {
            assert_eq!(&OfferStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn parse_is_case_and_whitespace_tolerant() {
        assert_eq!(
            TransactionStatus::parse(" in_review "),
            TransactionStatus::InReview
        );
    }

    #[test]
    fn unknown_value_is_preserved() {
        let status = TransactionStatus::parse("ESCROW_HOLD");
        assert!(status.is_unknown());
        assert_eq!(status.as_str(), "ESCROW_HOLD");
        assert_eq!(String::from(status), "ESCROW_HOLD");
    }

    #[test]
    fn serde_round_trips_through_wire_strings() {
        let json = "\"AWAITING_FINAL_PAYMENT\"";
        let status: TransactionStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status, TransactionStatus::AwaitingFinalPayment);
        assert_eq!(serde_json::to_string(&status).unwrap(), json);

        let unknown: OfferStatus = serde_json::from_str("\"ON_HOLD\"").unwrap();
        assert_eq!(unknown, OfferStatus::Unknown("ON_HOLD".into()));
    }

    #[test]
    fn terminal_and_absorbing_sets() {
        assert!(TransactionStatus::Completed.is_terminal());
        assert!(!TransactionStatus::Completed.is_absorbing());
        assert!(TransactionStatus::Disputed.is_absorbing());
        assert!(!TransactionStatus::PaymentReceived.is_terminal());
        assert!(!TransactionStatus::Unknown("X".into()).is_terminal());
    }
}
