//! Blocking HTTP implementation of `SubscriptionApi`.

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use subtrack_core::{
    error_message_from_body, ClientError, ClientResult, Subscription, SubscriptionApi,
    SubscriptionId,
};

const LIST_FAILED: &str = "failed to load subscriptions";
const CREATE_FAILED: &str = "failed to create subscription";
const UPDATE_FAILED: &str = "failed to update subscription";
const DELETE_FAILED: &str = "failed to delete subscription";

pub struct HttpSubscriptionApi {
    client: Client,
    base_url: String,
}

impl HttpSubscriptionApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/subscriptions", self.base_url)
    }

    fn item_url(&self, id: SubscriptionId) -> String {
        format!("{}/subscriptions/{id}", self.base_url)
    }
}

impl SubscriptionApi for HttpSubscriptionApi {
    fn list(&self) -> ClientResult<Vec<Subscription>> {
        send(self.client.get(self.collection_url()), LIST_FAILED)
    }

    fn create(&self, body: &Value) -> ClientResult<Subscription> {
        send(
            self.client.post(self.collection_url()).json(body),
            CREATE_FAILED,
        )
    }

    fn update(&self, id: SubscriptionId, body: &Value) -> ClientResult<Subscription> {
        send(self.client.patch(self.item_url(id)).json(body), UPDATE_FAILED)
    }

    fn delete(&self, id: SubscriptionId) -> ClientResult<Subscription> {
        send(self.client.delete(self.item_url(id)), DELETE_FAILED)
    }
}

fn send<T: DeserializeOwned>(request: RequestBuilder, fallback: &str) -> ClientResult<T> {
    let response = request
        .send()
        .map_err(|err| ClientError::Transport(err.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .map_err(|err| ClientError::Transport(err.to_string()))?;

    if !status.is_success() {
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: error_message_from_body(&body, fallback),
        });
    }
    serde_json::from_str(&body).map_err(|err| ClientError::Decode(err.to_string()))
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}
