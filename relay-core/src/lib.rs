//! Relay Core
//!
//! Core types shared by the Relay build orchestration crates.
//!
//! This crate contains:
//! - Domain types: jobs, builds and their lifecycle records, notifications
//! - DTOs: the Jenkins JSON payloads read while polling

pub mod domain;
pub mod dto;
