//! HTTP facade over a REST-exposed `registrations` table.

pub mod backend;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registrations;

pub use config::FacadeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
