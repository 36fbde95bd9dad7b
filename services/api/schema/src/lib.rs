//! sea-orm entities for the Stillwater API database.

pub mod admins;
pub mod app_users;
pub mod content_items;
pub mod notifications;
pub mod one_time_codes;
pub mod outbox_events;
pub mod post_flags;
pub mod posts;
pub mod questions;
