//! Data Transfer Objects for the estimates API
//!
//! Request and response bodies exchanged with the server. Status bodies are
//! intentionally not modelled here: their shape varies by job type and is
//! interpreted by the poller's classifier instead.

pub mod job;
