use crate::config::ContainerConfig;
use crate::container::registry::ServiceRegistry;
use crate::container::report::ContainerReport;
use crate::container::resolver::Resolver;
use crate::errors::CoreError;

/// Built container: a frozen registry plus the settings resolutions run with.
///
/// Owning the registry means no binding can be added once the container
/// exists. Each call gets a fresh [`Resolver`], so calls never share
/// instances or resolution state.
#[derive(Debug)]
pub struct IocContainer {
    registry: ServiceRegistry,
    config: ContainerConfig,
}

impl IocContainer {
    /// Build the container, validating configuration and declared dependencies
    pub fn build(registry: ServiceRegistry, config: ContainerConfig) -> Result<Self, CoreError> {
        config.validate()?;
        registry.validate()?;

        tracing::info!(
            "Container built with {} service(s) and {} binding(s)",
            registry.service_count(),
            registry.binding_count()
        );

        Ok(Self { registry, config })
    }

    /// Build with the default configuration
    pub fn from_registry(registry: ServiceRegistry) -> Result<Self, CoreError> {
        Self::build(registry, ContainerConfig::default())
    }

    /// A resolver for one resolution chain
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::with_config(&self.registry, &self.config)
    }

    /// Resolve one instance of `T`
    pub fn resolve<T: ?Sized + 'static>(&self) -> Result<Box<T>, CoreError> {
        self.resolver().resolve::<T>()
    }

    /// Resolve every registered `T`, in registration order
    pub fn resolve_all<T: ?Sized + 'static>(&self) -> Result<Vec<Box<T>>, CoreError> {
        self.resolver().resolve_all::<T>()
    }

    /// Resolve `T` if bound, `None` otherwise
    pub fn resolve_optional<T: ?Sized + 'static>(&self) -> Result<Option<Box<T>>, CoreError> {
        self.resolver().resolve_optional::<T>()
    }

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.registry.contains::<T>()
    }

    pub fn service_count(&self) -> usize {
        self.registry.service_count()
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Serializable description of every binding
    pub fn report(&self) -> ContainerReport {
        ContainerReport::from_registry(&self.registry, self.config.max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::container::binding::ServiceBinder;
    use crate::container::descriptor::{Multiplicity, ServiceDescriptor};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counter {
        id: usize,
    }

    struct Missing;
    struct NeedsMissing;

    #[test]
    fn test_every_resolution_is_transient() {
        let created = Arc::new(AtomicUsize::new(0));
        let mut registry = ServiceRegistry::new();
        let counter = created.clone();
        registry.bind::<Counter, _>(move |_| {
            Ok(Box::new(Counter {
                id: counter.fetch_add(1, Ordering::SeqCst),
            }))
        });

        let container = IocContainer::from_registry(registry).unwrap();
        let first = container.resolve::<Counter>().unwrap();
        let second = container.resolve::<Counter>().unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(created.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = ContainerConfig::default().with_max_depth(0);
        let result = IocContainer::build(ServiceRegistry::new(), config);

        assert!(matches!(
            result,
            Err(CoreError::Configuration(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_build_rejects_missing_declared_dependency() {
        let mut registry = ServiceRegistry::new();
        registry.add_descriptor(
            ServiceDescriptor::new::<NeedsMissing, _>(Multiplicity::Single, |resolver| {
                resolver.resolve::<Missing>()?;
                Ok(Box::new(NeedsMissing))
            })
            .depends_on::<Missing>(),
        );

        let result = IocContainer::from_registry(registry);
        assert!(matches!(result, Err(CoreError::DependencyResolutionFailed { .. })));
    }

    #[test]
    fn test_build_rejects_declared_cycle() {
        struct Publisher;
        struct Subscriber;

        let mut registry = ServiceRegistry::new();
        registry
            .add_descriptor(
                ServiceDescriptor::new::<Publisher, _>(Multiplicity::Single, |_| {
                    Ok(Box::new(Publisher))
                })
                .depends_on::<Subscriber>(),
            )
            .add_descriptor(
                ServiceDescriptor::new::<Subscriber, _>(Multiplicity::Multi, |_| {
                    Ok(Box::new(Subscriber))
                })
                .depends_on_all::<Publisher>(),
            );

        match IocContainer::from_registry(registry) {
            Err(CoreError::CircularDependency { path, cycle_service }) => {
                let steps: Vec<&str> = path.split(" -> ").collect();
                assert_eq!(steps.len(), 3);
                assert!(steps[0].ends_with("Publisher"));
                assert!(steps[1].ends_with("Subscriber"));
                assert!(steps[2].ends_with("Publisher"));
                assert!(cycle_service.ends_with("Publisher"));
            }
            other => panic!("expected CircularDependency, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_optional_and_contains() {
        let mut registry = ServiceRegistry::new();
        registry.bind::<Counter, _>(|_| Ok(Box::new(Counter { id: 7 })));
        let container = IocContainer::from_registry(registry).unwrap();

        assert!(container.contains::<Counter>());
        assert!(!container.contains::<Missing>());
        assert_eq!(container.service_count(), 1);
        assert!(container.resolve_optional::<Missing>().unwrap().is_none());
        assert_eq!(container.resolve_optional::<Counter>().unwrap().unwrap().id, 7);
        assert!(container.resolve_all::<Missing>().unwrap().is_empty());
    }
}
