//! Service layer
//!
//! Business logic of a run: assembling the lifecycle record and sequencing
//! the whole orchestration over the repositories and pollers.

pub mod lifecycle;
pub mod orchestrator;

pub use orchestrator::Orchestrator;
