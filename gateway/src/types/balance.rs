use rust_decimal::Decimal;
use serde::Deserialize;

/// Balance payload from the wallet and bank services.
///
/// Current services answer with a bare number; an object wrapping the amount
/// is accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BalanceResponse {
    Amount(Decimal),
    Wrapped {
        #[serde(alias = "amount")]
        balance: Decimal,
    },
}

impl BalanceResponse {
    pub fn amount(self) -> Decimal {
        match self {
            BalanceResponse::Amount(amount) => amount,
            BalanceResponse::Wrapped { balance } => balance,
        }
    }
}
