//! Client-side state for the subscription front end.
//!
//! # Responsibility
//! - Define the transport-neutral `SubscriptionApi` contract.
//! - Hold the fetched list, the create/edit draft and the last error.
//!
//! # Invariants
//! - Local state is never patched after a mutation; the full list is
//!   re-fetched instead.
//! - One draft serves both create and edit; `editing` picks the target.

pub mod board;

pub use board::{SubscriptionBoard, SubscriptionDraft};

use crate::model::subscription::{Subscription, SubscriptionId};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fallback shown when the server reply carries no readable message.
pub const GENERIC_ERROR_MESSAGE: &str = "request failed";

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Non-success HTTP status with the message to show the user.
    Api { status: u16, message: String },
    /// Connection or protocol failure before a status was received.
    Transport(String),
    /// Success status with a body that is not the expected JSON.
    Decode(String),
}

impl ClientError {
    /// Message suitable for display next to the form.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Api { message, .. } => message.as_str(),
            Self::Transport(_) | Self::Decode(_) => GENERIC_ERROR_MESSAGE,
        }
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Api { status, message } => write!(f, "api error {status}: {message}"),
            Self::Transport(message) => write!(f, "transport error: {message}"),
            Self::Decode(message) => write!(f, "invalid response body: {message}"),
        }
    }
}

impl Error for ClientError {}

/// Remote operations the front end needs.
pub trait SubscriptionApi {
    fn list(&self) -> ClientResult<Vec<Subscription>>;
    fn create(&self, body: &Value) -> ClientResult<Subscription>;
    fn update(&self, id: SubscriptionId, body: &Value) -> ClientResult<Subscription>;
    fn delete(&self, id: SubscriptionId) -> ClientResult<Subscription>;
}

/// Extracts the server `error` message, or returns `fallback`.
pub fn error_message_from_body(body: &str, fallback: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("error")?.as_str().map(str::to_string))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
