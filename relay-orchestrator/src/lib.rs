//! Relay Orchestrator
//!
//! Triggers a job on a remote CI server and follows it to completion.
//!
//! Architecture:
//! - Configuration: CI server connection and polling cadence
//! - Repositories: the CI server, build record storage, notifications
//! - Scheduler: the queue and build polling phases, each in its own task
//! - Services: lifecycle record assembly and the end-to-end run

pub mod config;
pub mod db;
pub mod error;
pub mod repository;
pub mod scheduler;
pub mod service;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{OrchestratorError, Result};
pub use service::Orchestrator;
