use std::fmt;

use url::Url;

use crate::error::{GatewayError, Result};

/// Default base URL for the user service.
pub const DEFAULT_USER_URL: &str = "http://localhost:8082/user";
/// Default base URL for the wallet service.
pub const DEFAULT_WALLET_URL: &str = "http://localhost:8083/wallet";
/// Default base URL for the bank service.
pub const DEFAULT_BANK_URL: &str = "http://localhost:8085/bank";
/// Default base URL for the transaction service.
pub const DEFAULT_TRANSACTION_URL: &str = "http://localhost:8081/transaction";

/// One of the four backend services the gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    User,
    Wallet,
    Bank,
    Transaction,
}

impl Service {
    pub const ALL: [Service; 4] = [
        Service::User,
        Service::Wallet,
        Service::Bank,
        Service::Transaction,
    ];

    /// Environment variable that overrides this service's base URL.
    pub fn env_var(self) -> &'static str {
        match self {
            Service::User => "WALLET_USER_URL",
            Service::Wallet => "WALLET_WALLET_URL",
            Service::Bank => "WALLET_BANK_URL",
            Service::Transaction => "WALLET_TRANSACTION_URL",
        }
    }

    fn default_url(self) -> &'static str {
        match self {
            Service::User => DEFAULT_USER_URL,
            Service::Wallet => DEFAULT_WALLET_URL,
            Service::Bank => DEFAULT_BANK_URL,
            Service::Transaction => DEFAULT_TRANSACTION_URL,
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Service::User => "user",
            Service::Wallet => "wallet",
            Service::Bank => "bank",
            Service::Transaction => "transaction",
        };
        f.write_str(name)
    }
}

/// Configuration for the gateway client.
///
/// Holds the base URL of every backend service. Use
/// [`GatewayConfig::default`] for the local development origins, or
/// [`GatewayConfig::from_env`] to apply environment overrides on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL for the user service (e.g. `http://localhost:8082/user`).
    pub user_url: String,
    /// Base URL for the wallet service.
    pub wallet_url: String,
    /// Base URL for the bank service.
    pub bank_url: String,
    /// Base URL for the transaction service.
    pub transaction_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let mut config = Self {
            user_url: String::new(),
            wallet_url: String::new(),
            bank_url: String::new(),
            transaction_url: String::new(),
        };
        for service in Service::ALL {
            *config.url_mut(service) = service.default_url().into();
        }
        config
    }
}

impl GatewayConfig {
    /// Defaults, overridden by any `WALLET_*_URL` variables that are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        for service in Service::ALL {
            if let Some(value) = lookup(service.env_var()).filter(|v| !v.trim().is_empty()) {
                *config.url_mut(service) = value;
            }
        }
        config
    }

    /// Configuration pointing every service at one origin, each under its
    /// service-name path (`{origin}/user`, `{origin}/wallet`, ...).
    pub fn single_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            user_url: format!("{origin}/user"),
            wallet_url: format!("{origin}/wallet"),
            bank_url: format!("{origin}/bank"),
            transaction_url: format!("{origin}/transaction"),
        }
    }

    pub fn url(&self, service: Service) -> &str {
        match service {
            Service::User => &self.user_url,
            Service::Wallet => &self.wallet_url,
            Service::Bank => &self.bank_url,
            Service::Transaction => &self.transaction_url,
        }
    }

    fn url_mut(&mut self, service: Service) -> &mut String {
        match service {
            Service::User => &mut self.user_url,
            Service::Wallet => &mut self.wallet_url,
            Service::Bank => &mut self.bank_url,
            Service::Transaction => &mut self.transaction_url,
        }
    }
}

/// Parsed, validated base URLs for all services.
#[derive(Debug, Clone)]
pub struct ServiceUrls {
    user: Url,
    wallet: Url,
    bank: Url,
    transaction: Url,
}

impl ServiceUrls {
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        Ok(Self {
            user: parse_base(Service::User, config.url(Service::User))?,
            wallet: parse_base(Service::Wallet, config.url(Service::Wallet))?,
            bank: parse_base(Service::Bank, config.url(Service::Bank))?,
            transaction: parse_base(Service::Transaction, config.url(Service::Transaction))?,
        })
    }

    pub fn base(&self, service: Service) -> &Url {
        match service {
            Service::User => &self.user,
            Service::Wallet => &self.wallet,
            Service::Bank => &self.bank,
            Service::Transaction => &self.transaction,
        }
    }

    /// Build an endpoint URL by appending percent-encoded path segments to
    /// the service's base URL.
    pub fn endpoint(&self, service: Service, segments: &[&str]) -> Result<Url> {
        let mut url = self.base(service).clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::Config(format!("{service} base URL cannot have a path")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn parse_base(service: Service, raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| GatewayError::Config(format!("invalid {service} service URL {raw:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(GatewayError::Config(format!(
                "unsupported scheme {other:?} for {service} service URL"
            )))
        }
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(GatewayError::Config(format!(
            "{service} service URL must not carry a query or fragment"
        )));
    }
    Ok(url)
}
