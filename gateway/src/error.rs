use reqwest::StatusCode;
use thiserror::Error;

/// Every failure the gateway can report.
///
/// Variants carrying a backend message display that message verbatim so
/// callers can surface it to the user unchanged.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InsufficientFunds(String),

    #[error("session expired, please log in again")]
    SessionExpired,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    UnknownServer { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("session store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

impl GatewayError {
    /// Shorthand for a client-side input rejection.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Error for a protected call attempted without a session.
    pub fn login_required() -> Self {
        Self::Auth("authentication required, please log in".into())
    }

    /// Map a non-2xx status to its error kind.
    ///
    /// `message` is the backend-supplied message, if one could be read from the
    /// body. `authenticated` tells whether the request carried a bearer token:
    /// a 401 on such a request means the session expired, otherwise the
    /// credentials were rejected.
    pub fn from_status(status: StatusCode, message: Option<String>, authenticated: bool) -> Self {
        if status == StatusCode::UNAUTHORIZED && authenticated {
            return Self::SessionExpired;
        }

        let message = message.unwrap_or_else(|| fallback_message(status));
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::Validation(message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Auth(message),
            StatusCode::PAYMENT_REQUIRED => Self::InsufficientFunds(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::CONFLICT => Self::Conflict(message),
            _ => Self::UnknownServer {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// HTTP status behind this error, when it came from a backend response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnknownServer { status, .. } => Some(*status),
            Self::SessionExpired => Some(401),
            _ => None,
        }
    }
}

/// Generic message used when the backend sends no readable error body.
fn fallback_message(status: StatusCode) -> String {
    match status {
        StatusCode::BAD_REQUEST => "invalid request".into(),
        StatusCode::UNAUTHORIZED => "invalid credentials".into(),
        StatusCode::PAYMENT_REQUIRED => "insufficient funds".into(),
        StatusCode::FORBIDDEN => "access denied".into(),
        StatusCode::NOT_FOUND => "resource not found".into(),
        StatusCode::CONFLICT => "resource already exists".into(),
        StatusCode::UNPROCESSABLE_ENTITY => "request could not be processed".into(),
        s if s.is_server_error() => format!("server error (HTTP {})", s.as_u16()),
        s => format!("something went wrong (HTTP {})", s.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_with_token_is_session_expired() {
        let err = GatewayError::from_status(StatusCode::UNAUTHORIZED, Some("expired".into()), true);
        assert!(matches!(err, GatewayError::SessionExpired));
    }

    #[test]
    fn test_unauthorized_without_token_is_auth() {
        let err = GatewayError::from_status(StatusCode::UNAUTHORIZED, None, false);
        match err {
            GatewayError::Auth(msg) => assert_eq!(msg, "invalid credentials"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_backend_message_is_displayed_verbatim() {
        let err = GatewayError::from_status(
            StatusCode::PAYMENT_REQUIRED,
            Some("insufficient funds".into()),
            true,
        );
        assert!(matches!(err, GatewayError::InsufficientFunds(_)));
        assert_eq!(err.to_string(), "insufficient funds");
    }

    #[test]
    fn test_status_kinds() {
        let cases = [
            (StatusCode::BAD_REQUEST, "Validation"),
            (StatusCode::UNPROCESSABLE_ENTITY, "Validation"),
            (StatusCode::FORBIDDEN, "Auth"),
            (StatusCode::NOT_FOUND, "NotFound"),
            (StatusCode::CONFLICT, "Conflict"),
            (StatusCode::INTERNAL_SERVER_ERROR, "UnknownServer"),
            (StatusCode::IM_A_TEAPOT, "UnknownServer"),
        ];
        for (status, kind) in cases {
            let err = GatewayError::from_status(status, None, true);
            let got = format!("{err:?}");
            assert!(got.starts_with(kind), "{status}: got {got}");
        }
    }

    #[test]
    fn test_fallback_message_keyed_by_status() {
        let err = GatewayError::from_status(StatusCode::BAD_GATEWAY, None, true);
        assert_eq!(err.to_string(), "server error (HTTP 502)");
        assert_eq!(err.status(), Some(502));

        let err = GatewayError::from_status(StatusCode::IM_A_TEAPOT, None, true);
        assert_eq!(err.to_string(), "something went wrong (HTTP 418)");
    }
}
