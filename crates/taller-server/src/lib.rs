//! HTTP front of taller: router, handlers and logging setup

pub mod http;
pub mod telemetry;

pub use http::{build_router, AppState};
