//! Data Transfer Objects
//!
//! Payloads returned by the remote CI server's JSON API.

pub mod jenkins;
