use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::TransactionMethod;
use super::user::EntityId;
use crate::error::Result;
use crate::utils::{require_non_blank, require_positive_amount};

/// Transaction record from the transaction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub sender: Option<String>,
    pub receiver: String,
    pub amount: Decimal,
    #[serde(alias = "transactionMethod")]
    pub method: TransactionMethod,
    #[serde(default, alias = "date", with = "timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Body for `POST /transaction/initiate`.
#[derive(Debug, Clone, Serialize)]
pub struct TransferRequest {
    pub receiver: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub method: TransactionMethod,
}

impl TransferRequest {
    pub fn new(receiver: impl Into<String>, amount: Decimal, method: TransactionMethod) -> Self {
        Self {
            receiver: receiver.into(),
            amount,
            method,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_non_blank("receiver", &self.receiver)?;
        require_positive_amount(self.amount)
    }
}

/// Body for `PUT /bank/add/money`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMoneyRequest {
    pub account_number: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl AddMoneyRequest {
    pub fn new(account_number: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_number: account_number.into(),
            amount,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_non_blank("account number", &self.account_number)?;
        require_positive_amount(self.amount)
    }
}

/// Transaction timestamps come as RFC 3339, as a naive ISO date-time (taken
/// as UTC), or as epoch milliseconds depending on the service build.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Millis(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = match Option::<RawTimestamp>::deserialize(deserializer)? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        match raw {
            RawTimestamp::Millis(ms) => DateTime::from_timestamp_millis(ms)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {ms}"))),
            RawTimestamp::Text(text) => parse_text(&text)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("unrecognised timestamp: {text}"))),
        }
    }

    fn parse_text(text: &str) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}
