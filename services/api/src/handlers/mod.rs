pub mod admin;
pub mod app;
pub mod extract;
pub mod views;
