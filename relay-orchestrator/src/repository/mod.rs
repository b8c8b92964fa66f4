//! Repository layer
//!
//! Repositories wrap everything the orchestrator talks to: the CI server,
//! build record storage and the notification channel. They hold no
//! business logic.
//!
//! All repositories are trait-based to enable testing and mocking.

mod build;
mod jenkins;
mod notification;

// Re-export traits
pub use build::BuildRepository;
pub use jenkins::JenkinsRepository;
pub use notification::Notifier;

// Re-export implementations
pub use build::{InMemoryBuildRepository, PgBuildRepository};
pub use jenkins::HttpJenkinsRepository;
pub use notification::{LogNotifier, SlackNotifier};
