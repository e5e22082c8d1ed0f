//! Subscription domain model.
//!
//! # Responsibility
//! - Define the stored subscription record and its JSON shape.
//! - Define typed inputs for creation (`NewSubscription`) and partial
//!   update (`SubscriptionPatch`).
//! - Classify free-text billing cycles for monthly-cost normalization.
//!
//! # Invariants
//! - `id` is assigned by storage and never reused.
//! - `price` is finite and never negative.
//! - `cycle` is stored verbatim; only `yearly` (any case) is special.
//! - JSON creation treats a numeric `0` price as absent; a typed zero price
//!   (for example coerced from the string `"0"`) is stored as-is.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned row identifier.
pub type SubscriptionId = i64;

/// Normalized billing frequency derived from the free-text `cycle` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl BillingCycle {
    /// Classifies a stored cycle tag.
    ///
    /// Anything other than exactly `yearly` (case-insensitive) counts as
    /// monthly, including unknown tags such as `weekly` or ` yearly `.
    pub fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("yearly") {
            Self::Yearly
        } else {
            Self::Monthly
        }
    }

    /// Months covered by one billing period.
    pub fn months_per_period(self) -> f64 {
        match self {
            Self::Monthly => 1.0,
            Self::Yearly => 12.0,
        }
    }
}

/// Stored subscription row as exposed over the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: SubscriptionId,
    pub name: String,
    pub price: f64,
    pub cycle: String,
    #[serde(with = "iso_millis")]
    pub start_date: DateTime<Utc>,
    pub active: bool,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn billing_cycle(&self) -> BillingCycle {
        BillingCycle::from_tag(&self.cycle)
    }

    /// Price normalized to one month.
    pub fn monthly_equivalent(&self) -> f64 {
        self.price / self.billing_cycle().months_per_period()
    }
}

/// Fully-specified creation input.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub name: String,
    pub price: f64,
    pub cycle: String,
    pub start_date: DateTime<Utc>,
}

impl NewSubscription {
    pub fn new(
        name: impl Into<String>,
        price: f64,
        cycle: impl Into<String>,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            cycle: cycle.into(),
            start_date,
        }
    }

    /// Rejects empty strings and prices that break the row invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        validate_price(self.price)?;
        if self.cycle.is_empty() {
            return Err(ValidationError::MissingField("cycle"));
        }
        Ok(())
    }
}

/// Sparse update: every `None` field is left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub cycle: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub active: Option<bool>,
}

impl SubscriptionPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.cycle.is_none()
            && self.start_date.is_none()
            && self.active.is_none()
    }

    /// Rejects empty patches and prices that break the row invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyUpdate);
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }

    /// Applies present fields to an in-memory record.
    pub fn apply_to(&self, target: &mut Subscription) {
        if let Some(name) = &self.name {
            target.name = name.clone();
        }
        if let Some(price) = self.price {
            target.price = price;
        }
        if let Some(cycle) = &self.cycle {
            target.cycle = cycle.clone();
        }
        if let Some(start_date) = self.start_date {
            target.start_date = start_date;
        }
        if let Some(active) = self.active {
            target.active = active;
        }
    }
}

/// Input rejected before reaching storage.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required creation field absent or falsy.
    MissingField(&'static str),
    /// Field present with a JSON type that cannot be coerced.
    WrongType(&'static str),
    /// Price that does not coerce to a finite, non-negative number.
    InvalidPrice(String),
    /// Date text that is neither `YYYY-MM-DD` nor RFC 3339.
    InvalidDate(String),
    /// Update body without any recognized, correctly-typed field.
    EmptyUpdate,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(_) => {
                write!(f, "missing required fields: name, price, cycle, startDate")
            }
            Self::WrongType(field) => write!(f, "field `{field}` has an unsupported type"),
            Self::InvalidPrice(value) => write!(f, "invalid price: `{value}`"),
            Self::InvalidDate(value) => write!(f, "invalid date: `{value}`"),
            Self::EmptyUpdate => write!(f, "no updatable fields provided"),
        }
    }
}

impl Error for ValidationError {}

fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError::InvalidPrice(price.to_string()));
    }
    Ok(())
}

/// Parses a calendar date or date-time into a UTC instant.
///
/// Accepts `YYYY-MM-DD` (midnight UTC), RFC 3339, and zone-less
/// `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC).
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(parsed.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
        .ok_or_else(|| ValidationError::InvalidDate(trimmed.to_string()))
}

/// Renders an instant as `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

mod iso_millis {
    use super::{format_timestamp, parse_date};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_date(&text).map_err(serde::de::Error::custom)
    }
}
