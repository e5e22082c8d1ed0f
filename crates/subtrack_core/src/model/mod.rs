//! Domain model for tracked subscriptions.
//!
//! # Responsibility
//! - Define the canonical subscription record and its typed write inputs.
//! - Own the date parsing/formatting rules shared by storage and JSON.
//!
//! # Invariants
//! - Every subscription is identified by a storage-assigned `SubscriptionId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod subscription;
