pub mod auth;
pub mod content;
pub mod credential;
pub mod notification;
pub mod password_reset;
pub mod post;
pub mod question;
pub mod social;
pub mod submission;
pub mod upload;
pub mod user;
