pub mod config;
pub mod database;
pub mod gravatar;
pub mod logging;
pub mod security;
pub mod telegram;
