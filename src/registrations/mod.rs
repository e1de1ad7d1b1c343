//! Registration records: model, write validation, endpoints.
//!
//! # Data Flow
//! ```text
//! request body / path / query
//!     → validation.rs (parse, whitelist, trim & cap, status enum)
//!     → handlers.rs (verb dispatch, backend calls)
//!     → http::response (JSON envelope)
//! ```

pub mod handlers;
pub mod model;
pub mod validation;

pub use model::{NewRegistration, Status};
pub use validation::InputError;
