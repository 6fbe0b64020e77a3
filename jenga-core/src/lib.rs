//! Jenga Core
//!
//! Core types shared by the Jenga estimate client crates.
//!
//! This crate contains:
//! - Domain types: job handles and terminal poll outcomes
//! - DTOs: request/response bodies of the estimates API

pub mod domain;
pub mod dto;
