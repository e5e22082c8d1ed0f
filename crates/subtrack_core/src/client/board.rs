//! List-and-form state driven through a `SubscriptionApi`.

use super::{ClientError, ClientResult, SubscriptionApi};
use crate::metrics::monthly_cost::{monthly_total, CostLevel};
use crate::model::subscription::{Subscription, SubscriptionId};
use log::warn;
use serde_json::{json, Map, Value};

const DEFAULT_CYCLE: &str = "monthly";

/// Form fields as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionDraft {
    pub name: String,
    pub price: String,
    pub cycle: String,
    /// `YYYY-MM-DD`.
    pub start_date: String,
}

impl Default for SubscriptionDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            price: String::new(),
            cycle: DEFAULT_CYCLE.to_string(),
            start_date: String::new(),
        }
    }
}

impl SubscriptionDraft {
    /// Pre-fills the form from a stored row.
    pub fn from_subscription(subscription: &Subscription) -> Self {
        Self {
            name: subscription.name.clone(),
            price: subscription.price.to_string(),
            cycle: subscription.cycle.clone(),
            start_date: subscription.start_date.format("%Y-%m-%d").to_string(),
        }
    }

    /// Request body for create or update.
    ///
    /// `price` is sent as a number when it parses, otherwise as the raw text
    /// so the server can reject it with its own message.
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("name".to_string(), json!(self.name));
        let price = match self.price.trim().parse::<f64>() {
            Ok(price) if price.is_finite() => json!(price),
            _ => json!(self.price),
        };
        body.insert("price".to_string(), price);
        body.insert("cycle".to_string(), json!(self.cycle));
        body.insert("startDate".to_string(), json!(self.start_date));
        Value::Object(body)
    }
}

/// Client state: fetched rows, one draft, optional edit selection.
pub struct SubscriptionBoard<A: SubscriptionApi> {
    api: A,
    subscriptions: Vec<Subscription>,
    draft: SubscriptionDraft,
    editing: Option<SubscriptionId>,
    last_error: Option<String>,
}

impl<A: SubscriptionApi> SubscriptionBoard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            subscriptions: Vec::new(),
            draft: SubscriptionDraft::default(),
            editing: None,
            last_error: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    pub fn draft(&self) -> &SubscriptionDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut SubscriptionDraft {
        &mut self.draft
    }

    pub fn editing(&self) -> Option<SubscriptionId> {
        self.editing
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replaces the local list with a fresh server copy.
    pub fn refresh(&mut self) -> ClientResult<()> {
        self.last_error = None;
        match self.api.list() {
            Ok(subscriptions) => {
                self.subscriptions = subscriptions;
                Ok(())
            }
            Err(err) => Err(self.record_error(err)),
        }
    }

    /// Selects a fetched row for editing and copies it into the draft.
    ///
    /// Returns `false` when the id is not in the local list.
    pub fn begin_edit(&mut self, id: SubscriptionId) -> bool {
        let Some(subscription) = self.subscriptions.iter().find(|item| item.id == id) else {
            return false;
        };
        self.draft = SubscriptionDraft::from_subscription(subscription);
        self.editing = Some(id);
        true
    }

    pub fn cancel_edit(&mut self) {
        self.draft = SubscriptionDraft::default();
        self.editing = None;
    }

    /// Sends the draft to update when editing, create otherwise, then
    /// refetches. The draft and edit selection are cleared on success.
    pub fn submit(&mut self) -> ClientResult<Subscription> {
        self.last_error = None;
        let body = self.draft.to_json();
        let result = match self.editing {
            Some(id) => self.api.update(id, &body),
            None => self.api.create(&body),
        };
        let saved = result.map_err(|err| self.record_error(err))?;

        self.cancel_edit();
        self.refresh()?;
        Ok(saved)
    }

    /// Deletes a row and refetches.
    pub fn remove(&mut self, id: SubscriptionId) -> ClientResult<Subscription> {
        self.last_error = None;
        let deleted = self.api.delete(id).map_err(|err| self.record_error(err))?;

        if self.editing == Some(id) {
            self.cancel_edit();
        }
        self.refresh()?;
        Ok(deleted)
    }

    /// Monthly-equivalent total of the current local list.
    pub fn monthly_total(&self) -> f64 {
        monthly_total(&self.subscriptions)
    }

    pub fn cost_level(&self) -> CostLevel {
        CostLevel::for_total(self.monthly_total())
    }

    fn record_error(&mut self, err: ClientError) -> ClientError {
        warn!("event=client_request module=client status=error error={err}");
        self.last_error = Some(err.user_message().to_string());
        err
    }
}
