//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, metrics)
//!     → cors.rs (preflight short-circuit, CORS headers)
//!     → registrations::handlers (verb dispatch)
//!     → error.rs / response.rs (JSON envelope)
//!     → Send to client
//! ```

pub mod cors;
pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use error::FacadeError;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
