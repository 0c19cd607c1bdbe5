pub mod config;
pub mod content_loader;
pub mod error;
pub mod hot_reload;
pub mod mailer;
pub mod markdown;
pub mod models;
pub mod render;
pub mod routes;
pub mod state;
pub mod views;
