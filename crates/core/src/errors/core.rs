use thiserror::Error;

/// Core error type for registration and resolution
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unregistered capability: {service_type}")]
    UnregisteredCapability { service_type: String },

    #[error("Circular dependency detected: {path} (cycle at: {cycle_service})")]
    CircularDependency { path: String, cycle_service: String },

    #[error("Resolution depth {depth} exceeded while resolving: {path}")]
    ResolutionDepthExceeded { depth: usize, path: String },

    #[error("Producer for '{service_type}' returned an instance of the wrong type")]
    InstanceTypeMismatch { service_type: String },

    #[error("Dependency resolution failed for '{service_type}': {message}")]
    DependencyResolutionFailed {
        service_type: String,
        message: String,
    },

    #[error("Service initialization failed for '{service_type}': {source}")]
    ServiceInitializationFailed {
        service_type: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Configuration error: {0}")]
    Configuration(#[from] crate::config::ConfigError),
}

impl CoreError {
    /// Create a new unregistered capability error
    pub fn unregistered(service_type: impl Into<String>) -> Self {
        Self::UnregisteredCapability {
            service_type: service_type.into(),
        }
    }

    /// Create a new circular dependency error
    pub fn circular(path: impl Into<String>, cycle_service: impl Into<String>) -> Self {
        Self::CircularDependency {
            path: path.into(),
            cycle_service: cycle_service.into(),
        }
    }

    /// Wrap a producer's own failure
    pub fn initialization_failed<E>(service_type: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::ServiceInitializationFailed {
            service_type: service_type.into(),
            source: source.into(),
        }
    }

    /// Check if the error is an unregistered capability error
    pub fn is_unregistered(&self) -> bool {
        matches!(self, Self::UnregisteredCapability { .. })
    }

    /// Check if the error is a circular dependency error
    pub fn is_circular(&self) -> bool {
        matches!(self, Self::CircularDependency { .. })
    }
}
