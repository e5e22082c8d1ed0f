//! Subscription use-case service.
//!
//! # Responsibility
//! - Coerce JSON request bodies into `NewSubscription` / `SubscriptionPatch`.
//! - Parse textual path identifiers before any storage access.
//! - Collapse repository errors into the request-level `ServiceError`.
//!
//! # Invariants
//! - Creation uses truthiness: missing, `null`, `false`, `""` and `0` all
//!   count as absent. A truthy price string such as `"0"` is coerced and
//!   may yield a zero price.
//! - Partial update keeps only present, correctly-typed keys; wrongly-typed
//!   keys are dropped silently.
//! - Invalid ids fail with `ServiceError::InvalidId` in `parse_subscription_id`,
//!   which callers run before opening storage.

use crate::model::subscription::{
    parse_date, NewSubscription, Subscription, SubscriptionId, SubscriptionPatch, ValidationError,
};
use crate::repo::subscription_repo::{RepoError, SubscriptionRepository};
use log::debug;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Request-level error for subscription use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Path identifier is empty, non-numeric, zero or negative.
    InvalidId(String),
    /// Required fields missing or update body without recognized fields.
    Validation(ValidationError),
    /// Target row does not exist.
    NotFound(SubscriptionId),
    /// Storage failure or corrupt persisted data.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(value) => write!(f, "invalid subscription id: `{value}`"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "subscription not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::InvalidId(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Subscription service facade over repository implementations.
pub struct SubscriptionService<R: SubscriptionRepository> {
    repo: R,
}

impl<R: SubscriptionRepository> SubscriptionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all subscriptions, newest first.
    pub fn list(&self) -> ServiceResult<Vec<Subscription>> {
        Ok(self.repo.list_subscriptions()?)
    }

    pub fn create(&self, input: &NewSubscription) -> ServiceResult<Subscription> {
        let created = self.repo.create_subscription(input)?;
        debug!(
            "event=subscription_create module=service status=ok id={}",
            created.id
        );
        Ok(created)
    }

    /// Creates a subscription from a JSON request body.
    pub fn create_from_json(&self, body: &Value) -> ServiceResult<Subscription> {
        let input = new_subscription_from_json(body)?;
        self.create(&input)
    }

    pub fn update(
        &self,
        id: SubscriptionId,
        patch: &SubscriptionPatch,
    ) -> ServiceResult<Subscription> {
        let updated = self.repo.update_subscription(id, patch)?;
        debug!("event=subscription_update module=service status=ok id={id}");
        Ok(updated)
    }

    /// Applies a sparse JSON update to an already-parsed id.
    ///
    /// The body is filtered and validated before storage is touched.
    pub fn update_from_json(
        &self,
        id: SubscriptionId,
        body: &Value,
    ) -> ServiceResult<Subscription> {
        let patch = patch_from_json(body)?;
        self.update(id, &patch)
    }

    pub fn delete(&self, id: SubscriptionId) -> ServiceResult<Subscription> {
        let deleted = self.repo.delete_subscription(id)?;
        debug!("event=subscription_delete module=service status=ok id={id}");
        Ok(deleted)
    }
}

/// Parses a path identifier into a positive row id.
pub fn parse_subscription_id(value: &str) -> ServiceResult<SubscriptionId> {
    match value.trim().parse::<SubscriptionId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ServiceError::InvalidId(value.to_string())),
    }
}

/// Builds a creation input from an untyped JSON body.
///
/// All four fields are checked for truthiness before any is coerced, so the
/// error for a body missing several fields is always `MissingField`.
pub fn new_subscription_from_json(body: &Value) -> Result<NewSubscription, ValidationError> {
    let name = body.get("name");
    let price = body.get("price");
    let cycle = body.get("cycle");
    let start_date = body.get("startDate");

    for (field, value) in [
        ("name", name),
        ("price", price),
        ("cycle", cycle),
        ("startDate", start_date),
    ] {
        if !is_truthy(value) {
            return Err(ValidationError::MissingField(field));
        }
    }

    let name = required_string(name, "name")?;
    let price = coerce_price(price)?;
    let cycle = required_string(cycle, "cycle")?;
    let start_date = parse_date(required_string(start_date, "startDate")?.as_str())?;

    Ok(NewSubscription::new(name, price, cycle, start_date))
}

/// Builds a sparse update from an untyped JSON body.
///
/// Keys with the wrong JSON type are ignored. A body left without any
/// recognized key is rejected with `ValidationError::EmptyUpdate`.
pub fn patch_from_json(body: &Value) -> Result<SubscriptionPatch, ValidationError> {
    let patch = SubscriptionPatch {
        name: body.get("name").and_then(Value::as_str).map(str::to_string),
        price: body.get("price").and_then(Value::as_f64),
        cycle: body.get("cycle").and_then(Value::as_str).map(str::to_string),
        start_date: body
            .get("startDate")
            .and_then(Value::as_str)
            .map(parse_date)
            .transpose()?,
        active: body.get("active").and_then(Value::as_bool),
    };
    patch.validate()?;
    Ok(patch)
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn required_string(value: Option<&Value>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(Value::String(text)) => Ok(text.clone()),
        _ => Err(ValidationError::WrongType(field)),
    }
}

fn coerce_price(value: Option<&Value>) -> Result<f64, ValidationError> {
    let price = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => return Err(ValidationError::WrongType("price")),
    };
    match price {
        Some(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(ValidationError::InvalidPrice(
            value.map(Value::to_string).unwrap_or_default(),
        )),
    }
}
