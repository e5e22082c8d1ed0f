//! Monthly-cost aggregation over a subscription list.
//!
//! # Invariants
//! - A tag equal to `yearly` (any case, no padding) contributes
//!   `price / 12`; every other tag, including unknown ones, contributes the
//!   full `price`.
//! - Inactive rows are counted like active ones.

use crate::model::subscription::Subscription;

/// Totals above this value are shown with the high-cost style.
pub const HIGH_COST_THRESHOLD: f64 = 100.0;

/// Display class for a monthly total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostLevel {
    Normal,
    High,
}

impl CostLevel {
    pub fn for_total(total: f64) -> Self {
        if total > HIGH_COST_THRESHOLD {
            Self::High
        } else {
            Self::Normal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

/// Sums monthly-equivalent prices.
pub fn monthly_total<'a, I>(subscriptions: I) -> f64
where
    I: IntoIterator<Item = &'a Subscription>,
{
    subscriptions
        .into_iter()
        .map(Subscription::monthly_equivalent)
        .sum()
}

/// Formats an amount with two decimals.
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}
