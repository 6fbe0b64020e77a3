//! Core domain types
//!
//! These types are shared between the HTTP client (which produces handles)
//! and the poller (which resolves them to outcomes).

pub mod job;
pub mod outcome;
