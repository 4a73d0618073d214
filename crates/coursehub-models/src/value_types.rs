//! Validated domain primitives.
//!
//! - [`Email`]: trimmed, lower-cased, syntactically valid address
//! - [`Price`]: non-negative amount held as integer cents
//!
//! Both bind to Postgres columns (`TEXT` and `BIGINT` respectively) and
//! validate on deserialization, so a handler never sees an invalid value.

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidateEmail;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueTypeError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
}

// ============================================================================
// Email
// ============================================================================

/// Stored and compared in lower case, so `Ada@Example.com` and
/// `ada@example.com` are the same account.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[schema(value_type = String, format = "email", example = "user@example.com")]
pub struct Email(String);

impl Email {
    pub fn new(email: impl AsRef<str>) -> Result<Self, ValueTypeError> {
        let email = email.as_ref().trim().to_lowercase();

        if email.is_empty() {
            return Err(ValueTypeError::InvalidEmail("email cannot be empty".into()));
        }
        if !email.validate_email() {
            return Err(ValueTypeError::InvalidEmail(format!(
                "'{}' is not a valid email address",
                email
            )));
        }

        Ok(Self(email))
    }

    /// Wraps a value read back from the database, which only ever holds
    /// addresses that went through [`Email::new`].
    #[inline]
    pub fn new_unchecked(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn domain(&self) -> &str {
        self.0.split('@').nth(1).unwrap_or("")
    }
}

impl fmt::Debug for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Email({})", self.0)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = ValueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Email {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Email> for String {
    fn from(email: Email) -> String {
        email.0
    }
}

impl Type<sqlx::Postgres> for Email {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for Email {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for Email {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self::new_unchecked(s))
    }
}

impl PgHasArrayType for Email {
    fn array_type_info() -> PgTypeInfo {
        <String as PgHasArrayType>::array_type_info()
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Price
// ============================================================================

/// A course price. Amounts are rounded to whole cents on construction and
/// serialized back as a decimal number (`19.99`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, ToSchema)]
#[schema(value_type = f64, example = 19.99)]
pub struct Price(i64);

impl Price {
    pub const FREE: Price = Price(0);

    /// Upper bound on accepted amounts, far above any real course price.
    pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

    pub fn from_cents(cents: i64) -> Result<Self, ValueTypeError> {
        if cents < 0 {
            return Err(ValueTypeError::InvalidPrice(format!(
                "price cannot be negative (got {cents} cents)"
            )));
        }
        Ok(Self(cents))
    }

    pub fn from_amount(amount: f64) -> Result<Self, ValueTypeError> {
        if !amount.is_finite() {
            return Err(ValueTypeError::InvalidPrice(
                "price must be a finite number".into(),
            ));
        }
        if amount < 0.0 {
            return Err(ValueTypeError::InvalidPrice(format!(
                "price cannot be negative (got {amount})"
            )));
        }
        if amount > Self::MAX_AMOUNT {
            return Err(ValueTypeError::InvalidPrice(format!(
                "price cannot exceed {}",
                Self::MAX_AMOUNT
            )));
        }
        Ok(Self((amount * 100.0).round() as i64))
    }

    #[inline]
    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn amount(self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn is_free(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.amount())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        let amount = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n,
            Raw::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("'{s}' is not a valid price")))?,
        };

        Self::from_amount(amount).map_err(serde::de::Error::custom)
    }
}

impl Type<sqlx::Postgres> for Price {
    fn type_info() -> PgTypeInfo {
        <i64 as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <i64 as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for Price {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let cents = <i64 as Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self::from_cents(cents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_normalized() {
        let email = Email::new("  Ada@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "ada@example.com");
        assert_eq!(email.domain(), "example.com");
    }

    #[test]
    fn test_email_rejects_invalid() {
        assert!(Email::new("").is_err());
        assert!(Email::new("not-an-email").is_err());
        assert!(serde_json::from_str::<Email>(r#""nope""#).is_err());
    }

    #[test]
    fn test_email_deserialize_lowercases() {
        let email: Email = serde_json::from_str(r#""Grace@Navy.mil""#).unwrap();
        assert_eq!(email.as_str(), "grace@navy.mil");
    }

    #[test]
    fn test_price_rounds_to_cents() {
        assert_eq!(Price::from_amount(19.999).unwrap().cents(), 2000);
        assert_eq!(Price::from_amount(10.004).unwrap().cents(), 1000);
        assert_eq!(Price::from_amount(0.125).unwrap().cents(), 13);
    }

    #[test]
    fn test_price_rejects_negative_and_non_finite() {
        assert!(Price::from_amount(-1.0).is_err());
        assert!(Price::from_amount(f64::NAN).is_err());
        assert!(Price::from_amount(f64::INFINITY).is_err());
        assert!(Price::from_cents(-5).is_err());
        assert!(Price::from_amount(Price::MAX_AMOUNT * 2.0).is_err());
    }

    #[test]
    fn test_price_free() {
        assert!(Price::FREE.is_free());
        assert!(Price::default().is_free());
        assert!(Price::from_amount(0.001).unwrap().is_free());
        assert!(!Price::from_amount(0.01).unwrap().is_free());
    }

    #[test]
    fn test_price_serde() {
        let price: Price = serde_json::from_str("49.5").unwrap();
        assert_eq!(price.cents(), 4950);
        assert_eq!(serde_json::to_string(&price).unwrap(), "49.5");

        let price: Price = serde_json::from_str(r#""12.30""#).unwrap();
        assert_eq!(price.cents(), 1230);

        assert!(serde_json::from_str::<Price>("-3").is_err());
        assert!(serde_json::from_str::<Price>(r#""free""#).is_err());
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_cents(1205).unwrap().to_string(), "12.05");
        assert_eq!(Price::FREE.to_string(), "0.00");
    }
}
