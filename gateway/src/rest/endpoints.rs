use serde::de::IgnoredAny;

use crate::config::Service;
use crate::error::Result;
use crate::rest::GatewayHttpClient;
use crate::types::*;

impl GatewayHttpClient {
    // --- User service ---

    /// POST /user/login - Exchange credentials for a bearer token.
    pub async fn login(&self, credentials: &Credentials) -> Result<Option<LoginResponse>> {
        self.post(Service::User, &["login"], credentials, None).await
    }

    /// POST /user/signup - Create a user. Some builds answer with no body.
    pub async fn signup(&self, profile: &SignupProfile) -> Result<Option<UserView>> {
        self.post(Service::User, &["signup"], profile, None).await
    }

    /// GET /user/get/{phone} - Look up a user by phone number or username.
    pub async fn get_user(&self, token: &str, phone: &str) -> Result<Option<UserView>> {
        self.get(Service::User, &["get", phone], Some(token)).await
    }

    // --- Wallet service ---

    /// GET /wallet/view/balance - Wallet balance of the token's owner.
    pub async fn get_wallet_balance(&self, token: &str) -> Result<Option<BalanceResponse>> {
        self.get(Service::Wallet, &["view", "balance"], Some(token))
            .await
    }

    // --- Bank service ---

    /// GET /bank/get/balance - Linked bank balance of the token's owner.
    pub async fn get_bank_balance(&self, token: &str) -> Result<Option<BalanceResponse>> {
        self.get(Service::Bank, &["get", "balance"], Some(token))
            .await
    }

    /// PUT /bank/add/money - Credit a bank account. The response body, if any,
    /// carries nothing the client uses.
    pub async fn add_money(&self, token: &str, request: &AddMoneyRequest) -> Result<()> {
        self.put::<_, IgnoredAny>(Service::Bank, &["add", "money"], request, Some(token))
            .await
            .map(|_| ())
    }

    // --- Transaction service ---

    /// POST /transaction/initiate - Create a transaction.
    pub async fn initiate_transaction(
        &self,
        token: &str,
        request: &TransferRequest,
    ) -> Result<Option<Transaction>> {
        self.post(Service::Transaction, &["initiate"], request, Some(token))
            .await
    }

    /// GET /transaction/get/all - Every transaction visible to the token.
    pub async fn get_all_transactions(&self, token: &str) -> Result<Option<Vec<Transaction>>> {
        self.get(Service::Transaction, &["get", "all"], Some(token))
            .await
    }
}
