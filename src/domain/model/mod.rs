//! Domain model definitions for users, meme coins, tokens, networks and payments.

pub mod chain;
pub mod meme_coin;
pub mod payment;
pub mod token;
pub mod user;

pub use chain::{Network, Transaction, TransactionStatus, TransactionType, Wallet, WalletType};
pub use meme_coin::{DeploymentTransaction, MemeCoin, MemeCoinStatus, TokenContract};
pub use payment::{Payment, PaymentStatus};
pub use token::{Token, TokenAnalytics, TokenFeatures, TokenStatus};
pub use user::User;

/// Error returned when a stored status string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a lowercase string-backed enum that round-trips through
/// serde, `Display` and `FromStr` (the form it is stored in).
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize, utoipa::ToSchema,
        )]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::model::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err($crate::domain::model::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

pub(crate) use string_enum;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn statuses_round_trip_through_their_storage_form() {
        for status in [
            MemeCoinStatus::Pending,
            MemeCoinStatus::Deploying,
            MemeCoinStatus::Deployed,
            MemeCoinStatus::Failed,
        ] {
            assert_eq!(MemeCoinStatus::from_str(status.as_str()), Ok(status));
        }
        assert_eq!(TokenStatus::from_str("draft"), Ok(TokenStatus::Draft));
        assert_eq!(
            serde_json::to_value(PaymentStatus::Refunded).unwrap(),
            serde_json::json!("refunded")
        );
    }

    #[test]
    fn unknown_status_is_reported_with_its_kind() {
        let err = TokenStatus::from_str("minted").unwrap_err();
        assert_eq!(err.kind, "token status");
        assert_eq!(err.to_string(), "unknown token status 'minted'");
    }
}
