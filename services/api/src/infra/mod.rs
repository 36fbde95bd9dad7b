pub mod db;
pub mod mailer;
pub mod social;
pub mod storage;
