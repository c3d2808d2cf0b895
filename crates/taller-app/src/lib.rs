//! Application service layer - use cases, config, bootstrap

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod repository;

pub use app::Services;
pub use config::Config;
