pub mod config;
pub mod container;
pub mod errors;

// Re-export key types for convenience
pub use config::{ConfigError, ConfigSource, ContainerConfig, LogFormat};
pub use container::{
    Dependency, Injectable, IocContainer, Multiplicity, Resolver, ServiceBinder, ServiceId,
    ServiceRegistry,
};
pub use errors::CoreError;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get crate version
pub fn version() -> &'static str {
    VERSION
}
