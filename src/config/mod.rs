//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → FailoverSettings (validated, immutable)
//!     → RegionConfig per endpoint → Connector → EndpointPool
//!     → FailoverConfig → FailoverManager
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the endpoint list never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::FailoverConfig;
pub use schema::FailoverSettings;
pub use schema::ObservabilityConfig;
pub use schema::RegionConfig;
