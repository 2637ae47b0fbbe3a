use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};
use crate::utils::{require_min_len, require_non_blank, validate_email, validate_phone_number};

/// Role that grants access to the admin console.
pub const ADMIN_ROLE: &str = "ROLE_ADMIN";

/// Identifier as sent by the backends: some services use numeric ids, others
/// strings (UUIDs, account numbers).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{n}"),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Number(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

/// Login credentials. `identifier` is the phone number or username.
#[derive(Clone, Serialize)]
pub struct Credentials {
    #[serde(rename = "username")]
    pub identifier: String,
    pub password: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_non_blank("identifier", &self.identifier)?;
        require_non_blank("password", &self.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Shortest password the signup form accepts.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Signup form sent to the user service.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupProfile {
    pub name: String,
    pub user_name: String,
    pub email: String,
    pub country_code: String,
    pub phone_number: String,
    pub password: String,
}

impl SignupProfile {
    pub fn validate(&self) -> Result<()> {
        require_non_blank("name", &self.name)?;
        require_non_blank("username", &self.user_name)?;
        validate_phone_number(&self.phone_number)?;
        validate_email(&self.email)?;
        require_min_len("password", &self.password, MIN_PASSWORD_LEN)?;
        if !self.country_code.is_empty() && !is_country_code(&self.country_code) {
            return Err(GatewayError::validation("invalid country code"));
        }
        Ok(())
    }
}

impl fmt::Debug for SignupProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupProfile")
            .field("name", &self.name)
            .field("user_name", &self.user_name)
            .field("email", &self.email)
            .field("country_code", &self.country_code)
            .field("phone_number", &self.phone_number)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `+` followed by one to three digits.
fn is_country_code(code: &str) -> bool {
    code.strip_prefix('+')
        .is_some_and(|digits| (1..=3).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// User as returned by the user service.
///
/// Field names differ between service versions, so the common aliases are
/// accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: EntityId,
    #[serde(default, alias = "fullName")]
    pub name: Option<String>,
    #[serde(default, alias = "userName")]
    pub username: Option<String>,
    #[serde(default, alias = "phoneNumber")]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub balance: Option<Decimal>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserView {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ADMIN_ROLE)
    }

    /// Best name to show for this user.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .or(self.phone.as_deref())
    }
}

/// Raw `/login` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserView>,
}

impl LoginResponse {
    /// Require a non-empty token.
    pub fn into_outcome(self) -> Result<LoginOutcome> {
        match self.token {
            Some(token) if !token.trim().is_empty() => Ok(LoginOutcome {
                token,
                user: self.user,
            }),
            _ => Err(GatewayError::Auth("login failed: token not received".into())),
        }
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub user: Option<UserView>,
}
