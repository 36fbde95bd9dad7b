//! Test utilities for the Stillwater API.
//!
//! Token minting, credential headers and response body helpers.
//! Import from tests only, never from production code.

pub mod auth;
pub mod body;
