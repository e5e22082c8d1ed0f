//! Demo rows for first-run databases.

use crate::model::subscription::{parse_date, NewSubscription, ValidationError};
use crate::repo::subscription_repo::{RepoResult, SubscriptionRepository};
use log::info;

const DEMO_ROWS: &[(&str, f64, &str, &str)] = &[
    ("Netflix", 15.99, "monthly", "2023-01-01"),
    ("Spotify", 9.99, "monthly", "2023-02-01"),
    ("iCloud", 0.99, "monthly", "2023-03-01"),
];

/// Returns the demo subscriptions in insertion order.
pub fn demo_subscriptions() -> Result<Vec<NewSubscription>, ValidationError> {
    DEMO_ROWS
        .iter()
        .map(|(name, price, cycle, start)| {
            Ok(NewSubscription::new(*name, *price, *cycle, parse_date(start)?))
        })
        .collect()
}

/// Inserts the demo rows when the table is empty.
///
/// Returns the number of inserted rows; `0` when data already exists.
pub fn seed_demo_subscriptions<R: SubscriptionRepository>(repo: &R) -> RepoResult<usize> {
    if repo.count_subscriptions()? > 0 {
        return Ok(0);
    }

    let rows = demo_subscriptions()?;
    for row in &rows {
        repo.create_subscription(row)?;
    }
    info!(
        "event=seed_demo module=seed status=ok inserted={}",
        rows.len()
    );
    Ok(rows.len())
}
