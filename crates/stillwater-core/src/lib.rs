//! Cross-cutting HTTP plumbing: response envelopes, health checks,
//! request ids, tracing setup, and sea-orm helpers.

pub mod envelope;
pub mod error;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
