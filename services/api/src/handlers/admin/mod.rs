pub mod auth;
pub mod content;
pub mod notifications;
pub mod posts;
pub mod questions;
pub mod submissions;
pub mod upload;
pub mod users;
