//! Domain types shared across Stillwater crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod answer;
pub mod content;
pub mod notification;
pub mod pagination;
pub mod post;
pub mod query;
