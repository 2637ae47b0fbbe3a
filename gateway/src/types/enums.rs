use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// How money moves in a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionMethod {
    BankToWallet,
    WalletToBank,
    UserToUser,
    AdminToUser,
    BankToPerson,
    WalletToPerson,
}

impl TransactionMethod {
    pub const ALL: [TransactionMethod; 6] = [
        TransactionMethod::BankToWallet,
        TransactionMethod::WalletToBank,
        TransactionMethod::UserToUser,
        TransactionMethod::AdminToUser,
        TransactionMethod::BankToPerson,
        TransactionMethod::WalletToPerson,
    ];

    /// Wire name, e.g. `USER_TO_USER`.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionMethod::BankToWallet => "BANK_TO_WALLET",
            TransactionMethod::WalletToBank => "WALLET_TO_BANK",
            TransactionMethod::UserToUser => "USER_TO_USER",
            TransactionMethod::AdminToUser => "ADMIN_TO_USER",
            TransactionMethod::BankToPerson => "BANK_TO_PERSON",
            TransactionMethod::WalletToPerson => "WALLET_TO_PERSON",
        }
    }
}

impl fmt::Display for TransactionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the wire name in any case, with `-` in place of `_`.
impl FromStr for TransactionMethod {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        TransactionMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| GatewayError::validation(format!("unknown transaction method: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_names() {
        for method in TransactionMethod::ALL {
            assert_eq!(method.as_str().parse::<TransactionMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_parse_is_lenient_on_case_and_dashes() {
        assert_eq!(
            "user-to-user".parse::<TransactionMethod>().unwrap(),
            TransactionMethod::UserToUser
        );
        assert_eq!(
            " Bank_To_Wallet ".parse::<TransactionMethod>().unwrap(),
            TransactionMethod::BankToWallet
        );
    }

    #[test]
    fn test_unknown_method_is_validation_error() {
        let err = "CASH".parse::<TransactionMethod>().unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[test]
    fn test_serde_matches_as_str() {
        for method in TransactionMethod::ALL {
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("\"{}\"", method.as_str()));
        }
    }
}
