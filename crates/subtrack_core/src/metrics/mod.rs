//! Derived spending metrics.
//!
//! Nothing here is persisted; callers recompute from the latest fetched list.

pub mod monthly_cost;
