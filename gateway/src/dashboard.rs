use rust_decimal::Decimal;
use tracing::warn;

use crate::client::WalletGateway;
use crate::error::{GatewayError, Result};
use crate::types::UserView;

/// Everything the user dashboard shows, fetched in one go.
///
/// Balances are settled independently: one failing does not hide the other,
/// and the failure stays available to the caller.
#[derive(Debug)]
pub struct DashboardSnapshot {
    pub user: UserView,
    pub wallet_balance: Result<Decimal>,
    pub bank_balance: Result<Decimal>,
}

impl DashboardSnapshot {
    /// Both balances, if both were fetched.
    pub fn balances(&self) -> Option<(Decimal, Decimal)> {
        match (&self.wallet_balance, &self.bank_balance) {
            (Ok(wallet), Ok(bank)) => Some((*wallet, *bank)),
            _ => None,
        }
    }
}

impl WalletGateway {
    /// Load the signed-in user's view, then wallet and bank balances
    /// concurrently.
    pub async fn dashboard(&self) -> Result<DashboardSnapshot> {
        let identity = match self.session().current() {
            Some(session) => session.identity,
            None => {
                let err = GatewayError::login_required();
                self.record_error(&err);
                return Err(err);
            }
        };

        let user = self.get_user(&identity).await?;
        let (wallet_balance, bank_balance) =
            tokio::join!(self.get_wallet_balance(), self.get_bank_balance());

        if let Err(e) = &wallet_balance {
            warn!(error = %e, "wallet balance unavailable");
        }
        if let Err(e) = &bank_balance {
            warn!(error = %e, "bank balance unavailable");
        }

        Ok(DashboardSnapshot {
            user,
            wallet_balance,
            bank_balance,
        })
    }
}
