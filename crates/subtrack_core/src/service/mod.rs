//! Core use-case services.
//!
//! # Responsibility
//! - Turn untyped request input into typed repository calls.
//! - Keep HTTP/CLI layers decoupled from storage details.

pub mod subscription_service;
