pub mod auth;
pub mod checkin;
pub mod content;
pub mod me;
pub mod notifications;
pub mod posts;
