//! Auth types shared across Stillwater crates.
//!
//! Provides the token codec, the admin session cookie builders, and
//! credential extraction from request headers.

pub mod cookie;
pub mod credential;
pub mod token;
