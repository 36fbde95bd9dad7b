#![allow(dead_code)]

mod checkin_test;
mod content_test;
mod helpers;
mod jobs_test;
mod notification_test;
mod password_reset_test;
mod question_test;
mod social_test;
mod user_test;
