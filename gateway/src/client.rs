use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::rest::GatewayHttpClient;
use crate::session::{Session, SessionHandle};
use crate::types::*;
use crate::utils::require_non_blank;

/// Façade over the wallet backends.
///
/// Every call goes through here: input is validated before any request,
/// protected calls carry the session's bearer token, and a 401 on a protected
/// call signs the session out. Each call resets [`last_error`]; a failure is
/// recorded there and then returned, nothing is swallowed.
///
/// Calls take `&self` and may run concurrently. Share the gateway with an
/// `Arc` when several tasks need it.
///
/// [`last_error`]: WalletGateway::last_error
#[derive(Debug)]
pub struct WalletGateway {
    http_client: GatewayHttpClient,
    session: SessionHandle,
    in_flight: AtomicUsize,
    last_error: Mutex<Option<String>>,
}

/// Decrements the in-flight counter when the call finishes, however it ends.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl WalletGateway {
    /// Gateway with an in-memory session.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        Self::with_session(config, SessionHandle::new())
    }

    /// Gateway bound to an existing session handle.
    pub fn with_session(config: &GatewayConfig, session: SessionHandle) -> Result<Self> {
        Ok(Self::from_parts(GatewayHttpClient::new(config)?, session))
    }

    pub fn from_parts(http_client: GatewayHttpClient, session: SessionHandle) -> Self {
        Self {
            http_client,
            session,
            in_flight: AtomicUsize::new(0),
            last_error: Mutex::new(None),
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn http_client(&self) -> &GatewayHttpClient {
        &self.http_client
    }

    /// True while at least one call is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Message of the failure of the most recent call, if it failed.
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear_error(&self) {
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    // --- Auth ---

    /// Log in and start a session for `credentials.identifier`.
    ///
    /// Any backend rejection, and a success response without a token, fail
    /// with [`GatewayError::Auth`].
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome> {
        self.track(async {
            credentials.validate()?;
            let response = self
                .http_client
                .login(credentials)
                .await
                .map_err(rejected_login)?;
            let outcome = match response {
                Some(response) => response.into_outcome()?,
                None => {
                    return Err(GatewayError::Auth(
                        "login failed: token not received".into(),
                    ))
                }
            };

            let user = outcome.user.as_ref();
            self.session.sign_in(Session {
                token: outcome.token.clone(),
                identity: credentials.identifier.clone(),
                user_id: user.map(|u| u.id.clone()),
                roles: user.map(|u| u.roles.clone()).unwrap_or_default(),
            })?;
            info!(identity = %credentials.identifier, "logged in");
            Ok(outcome)
        })
        .await
    }

    /// Create an account. `None` when the service acknowledges without a body.
    pub async fn register(&self, profile: &SignupProfile) -> Result<Option<UserView>> {
        self.track(async {
            profile.validate()?;
            let created = self.http_client.signup(profile).await?;
            info!(username = %profile.user_name, "registered user");
            Ok(created)
        })
        .await
    }

    /// Drop the session. Local only; never fails.
    pub fn logout(&self) {
        if self.session.sign_out() {
            info!("logged out");
        }
    }

    // --- Protected calls ---

    /// Look up a user by phone number or username.
    pub async fn get_user(&self, identifier: &str) -> Result<UserView> {
        self.track(self.protected(|token| async move {
            require_non_blank("identifier", identifier)?;
            let user = self.http_client.get_user(&token, identifier).await?;
            required(user, "user lookup")
        }))
        .await
    }

    pub async fn get_wallet_balance(&self) -> Result<Decimal> {
        self.track(self.protected(|token| async move {
            let balance = self.http_client.get_wallet_balance(&token).await?;
            required(balance, "wallet balance").map(BalanceResponse::amount)
        }))
        .await
    }

    pub async fn get_bank_balance(&self) -> Result<Decimal> {
        self.track(self.protected(|token| async move {
            let balance = self.http_client.get_bank_balance(&token).await?;
            required(balance, "bank balance").map(BalanceResponse::amount)
        }))
        .await
    }

    /// Credit `amount` to the bank account `account_ref`.
    pub async fn add_bank_money(&self, account_ref: &str, amount: Decimal) -> Result<()> {
        let request = AddMoneyRequest::new(account_ref, amount);
        self.track(self.protected(|token| async move {
            request.validate()?;
            self.http_client.add_money(&token, &request).await?;
            info!(account = %request.account_number, %amount, "added money to bank account");
            Ok(())
        }))
        .await
    }

    /// Send `amount` to `receiver`. Returns the created record when the
    /// service echoes it back.
    pub async fn initiate_transaction(
        &self,
        receiver: &str,
        amount: Decimal,
        method: TransactionMethod,
    ) -> Result<Option<Transaction>> {
        let request = TransferRequest::new(receiver, amount, method);
        self.track(self.protected(|token| async move {
            request.validate()?;
            let created = self
                .http_client
                .initiate_transaction(&token, &request)
                .await?;
            info!(receiver = %request.receiver, %amount, %method, "transaction initiated");
            Ok(created)
        }))
        .await
    }

    /// All transactions visible to the session.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.track(self.protected(|token| async move {
            let all = self.http_client.get_all_transactions(&token).await?;
            Ok(all.unwrap_or_default())
        }))
        .await
    }

    // --- Plumbing ---

    /// Run `call` with the current token. Without a session it fails before
    /// any request is made; a 401 expires the session the token belonged to.
    pub(crate) async fn protected<T, F, Fut>(&self, call: F) -> Result<T>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let token = self.session.token().ok_or_else(GatewayError::login_required)?;
        let result = call(token.clone()).await;
        if let Err(GatewayError::SessionExpired) = &result {
            if self.session.expire(&token) {
                warn!("signed out after 401");
            }
        }
        result
    }

    /// Mark the call in flight and record its failure, if any. A new call
    /// starts with no error.
    pub(crate) async fn track<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        self.clear_error();
        let _loading = LoadingGuard::new(&self.in_flight);
        let result = call.await;
        if let Err(e) = &result {
            self.record_error(e);
        }
        result
    }

    pub(crate) fn record_error(&self, error: &GatewayError) {
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = Some(error.to_string());
    }
}

/// The schema requires a body here; an empty success is a broken response.
fn required<T>(value: Option<T>, what: &str) -> Result<T> {
    value.ok_or_else(|| GatewayError::InvalidResponse(format!("{what}: empty response body")))
}

/// Backend status errors on login all mean the login was refused.
fn rejected_login(error: GatewayError) -> GatewayError {
    match error {
        GatewayError::Validation(message)
        | GatewayError::NotFound(message)
        | GatewayError::Conflict(message)
        | GatewayError::InsufficientFunds(message)
        | GatewayError::UnknownServer { message, .. } => GatewayError::Auth(message),
        other => other,
    }
}
