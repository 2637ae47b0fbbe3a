pub mod endpoints;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{GatewayConfig, Service, ServiceUrls};
use crate::error::{GatewayError, Result};

/// HTTP client for the four wallet backends.
///
/// Stateless with respect to the session: callers pass the bearer token for
/// protected endpoints. Every response is normalized the same way:
///
/// - non-2xx becomes a [`GatewayError`] keyed by status, carrying the body's
///   `message` (or `error`) field when present;
/// - 2xx with a JSON body is decoded into `T`, a mismatch being
///   [`GatewayError::InvalidResponse`];
/// - 2xx without a JSON body yields `Ok(None)`.
#[derive(Debug, Clone)]
pub struct GatewayHttpClient {
    client: Client,
    urls: ServiceUrls,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl GatewayHttpClient {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build HTTP client: {e}")))?;
        Self::with_client(client, config)
    }

    /// Use a preconfigured reqwest client (proxies, custom TLS roots, ...).
    pub fn with_client(client: Client, config: &GatewayConfig) -> Result<Self> {
        Ok(Self {
            client,
            urls: ServiceUrls::from_config(config)?,
        })
    }

    pub fn urls(&self) -> &ServiceUrls {
        &self.urls
    }

    /// GET a JSON resource.
    pub async fn get<T: DeserializeOwned>(
        &self,
        service: Service,
        path: &[&str],
        bearer: Option<&str>,
    ) -> Result<Option<T>> {
        let req = self.request(Method::GET, service, path, bearer)?;
        self.execute(req, service, bearer.is_some()).await
    }

    /// POST a JSON body.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        service: Service,
        path: &[&str],
        body: &B,
        bearer: Option<&str>,
    ) -> Result<Option<T>> {
        let req = self.request(Method::POST, service, path, bearer)?.json(body);
        self.execute(req, service, bearer.is_some()).await
    }

    /// PUT a JSON body.
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        service: Service,
        path: &[&str],
        body: &B,
        bearer: Option<&str>,
    ) -> Result<Option<T>> {
        let req = self.request(Method::PUT, service, path, bearer)?.json(body);
        self.execute(req, service, bearer.is_some()).await
    }

    fn request(
        &self,
        method: Method,
        service: Service,
        path: &[&str],
        bearer: Option<&str>,
    ) -> Result<RequestBuilder> {
        let url = self.urls.endpoint(service, path)?;
        debug!(
            %service,
            %method,
            path = url.path(),
            authenticated = bearer.is_some(),
            "sending request"
        );

        let mut req = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        service: Service,
        authenticated: bool,
    ) -> Result<Option<T>> {
        let resp = req.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.bytes().await.unwrap_or_default();
            let message = error_message(&body);
            if status.as_u16() == 401 && authenticated {
                warn!(%service, "backend rejected bearer token");
            } else {
                debug!(%service, status = status.as_u16(), ?message, "request failed");
            }
            return Err(GatewayError::from_status(status, message, authenticated));
        }

        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"));
        let body = resp.bytes().await?;

        if !is_json || body.iter().all(u8::is_ascii_whitespace) {
            debug!(%service, status = status.as_u16(), "empty success response");
            return Ok(None);
        }

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| GatewayError::InvalidResponse(format!("{service} service: {e}")))
    }
}

/// Pull a human-readable message out of an error body, if it is JSON.
fn error_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
}
