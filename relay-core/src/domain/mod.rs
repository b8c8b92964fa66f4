//! Core domain types
//!
//! These types describe what the orchestrator submits, what it observes
//! while polling, and the lifecycle record it hands to persistence.

pub mod build;
pub mod job;
pub mod notification;
