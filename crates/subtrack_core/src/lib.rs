//! Core domain logic for SubTrack, a personal subscription tracker.
//! This crate is the single source of truth for subscription invariants.

pub mod client;
pub mod db;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use client::{
    error_message_from_body, ClientError, ClientResult, SubscriptionApi, SubscriptionBoard,
    SubscriptionDraft, GENERIC_ERROR_MESSAGE,
};
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget,
};
pub use metrics::monthly_cost::{format_amount, monthly_total, CostLevel, HIGH_COST_THRESHOLD};
pub use model::subscription::{
    format_timestamp, parse_date, BillingCycle, NewSubscription, Subscription, SubscriptionId,
    SubscriptionPatch, ValidationError,
};
pub use repo::subscription_repo::{
    RepoError, RepoResult, SqliteSubscriptionRepository, SubscriptionRepository,
};
pub use seed::{demo_subscriptions, seed_demo_subscriptions};
pub use service::subscription_service::{
    new_subscription_from_json, parse_subscription_id, patch_from_json, ServiceError,
    ServiceResult, SubscriptionService,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
