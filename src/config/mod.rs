//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → SUPABASE_URL / SUPABASE_ANON_KEY overrides
//!     → validation.rs (semantic checks)
//!     → FacadeConfig (validated, immutable)
//!     → shared via Arc with request handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Missing backend credentials are not a startup failure; requests report them

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{BackendConfig, CorsConfig, FacadeConfig, ListenerConfig, LogFormat, ObservabilityConfig};
