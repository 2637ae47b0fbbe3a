use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::client::WalletGateway;
use crate::error::{GatewayError, Result};
use crate::types::{Credentials, Transaction, TransactionMethod, UserView};

/// Admin console client.
///
/// Only constructible over an admin session, and every call re-checks that
/// the session is still one.
#[derive(Debug, Clone)]
pub struct GatewayAdmin {
    gateway: Arc<WalletGateway>,
}

impl GatewayAdmin {
    /// Log in and require the admin role. A non-admin login is signed out
    /// again immediately.
    pub async fn login(gateway: Arc<WalletGateway>, credentials: &Credentials) -> Result<Self> {
        let outcome = gateway.login(credentials).await?;
        let is_admin = outcome.user.as_ref().is_some_and(UserView::is_admin);
        if !is_admin {
            warn!(identity = %credentials.identifier, "non-admin login to admin console");
            gateway.logout();
            let err = GatewayError::Auth("access denied: not an admin".into());
            gateway.record_error(&err);
            return Err(err);
        }

        info!(identity = %credentials.identifier, "admin console opened");
        Ok(Self { gateway })
    }

    /// Resume an existing admin session.
    pub fn from_session(gateway: Arc<WalletGateway>) -> Result<Self> {
        let admin = Self { gateway };
        admin.ensure_admin()?;
        Ok(admin)
    }

    pub fn gateway(&self) -> &Arc<WalletGateway> {
        &self.gateway
    }

    fn ensure_admin(&self) -> Result<()> {
        let result = match self.gateway.session().current() {
            Some(session) if session.is_admin() => Ok(()),
            Some(_) => Err(GatewayError::Auth("admin session required".into())),
            None => Err(GatewayError::login_required()),
        };
        if let Err(e) = &result {
            self.gateway.record_error(e);
        }
        result
    }

    /// Every transaction in the system.
    pub async fn transactions(&self) -> Result<Vec<Transaction>> {
        self.ensure_admin()?;
        self.gateway.list_transactions().await
    }

    pub async fn find_user(&self, phone: &str) -> Result<UserView> {
        self.ensure_admin()?;
        self.gateway.get_user(phone).await
    }

    pub async fn add_bank_money(&self, account_number: &str, amount: Decimal) -> Result<()> {
        self.ensure_admin()?;
        self.gateway.add_bank_money(account_number, amount).await
    }

    /// Credit a user directly (`ADMIN_TO_USER`).
    pub async fn send_to_user(&self, receiver: &str, amount: Decimal) -> Result<Option<Transaction>> {
        self.ensure_admin()?;
        self.gateway
            .initiate_transaction(receiver, amount, TransactionMethod::AdminToUser)
            .await
    }
}
