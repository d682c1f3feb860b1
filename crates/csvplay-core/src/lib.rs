pub mod config;
pub mod error;
pub mod logging;

pub mod cache;
pub mod catalog;
pub mod fetch;
pub mod launcher;
pub mod loader;
pub mod platform;
pub mod queue;
pub mod record;
pub mod resolver;
pub mod url_model;
