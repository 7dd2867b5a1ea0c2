use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use tracing::span::EnteredSpan;
use uuid::Uuid;

use crate::config::ContainerConfig;
use crate::container::descriptor::{Dependency, ServiceId};
use crate::container::registry::ServiceRegistry;
use crate::errors::CoreError;

/// Chain of capabilities currently under construction
#[derive(Debug, Clone, Default)]
pub struct ResolutionPath {
    pub services: Vec<ServiceId>,
}

impl ResolutionPath {
    /// Create a new resolution path
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service to the resolution path
    pub fn push(&mut self, service_id: ServiceId) {
        self.services.push(service_id);
    }

    /// Remove the last service from the resolution path
    pub fn pop(&mut self) -> Option<ServiceId> {
        self.services.pop()
    }

    /// Check if the path contains a service (for cycle detection)
    pub fn contains(&self, service_id: &ServiceId) -> bool {
        self.services.contains(service_id)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Get the path as a string for error messages
    pub fn path_string(&self) -> String {
        self.services
            .iter()
            .map(|id| id.type_name())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Dependency graph node
#[derive(Debug)]
pub struct DependencyNode {
    pub service_id: ServiceId,
    pub dependencies: Vec<Dependency>,
}

/// Graph of declared dependencies, used to validate a registry up front
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<DependencyNode>,
    index: HashMap<ServiceId, usize>,
}

impl DependencyGraph {
    /// Create a new dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from every binding's declared dependencies
    pub fn from_registry(registry: &ServiceRegistry) -> Self {
        let mut graph = Self::new();

        for service_id in registry.capabilities() {
            let mut dependencies = Vec::new();
            for descriptor in registry.lookup(service_id) {
                for dependency in &descriptor.dependencies {
                    if !dependencies.contains(dependency) {
                        dependencies.push(*dependency);
                    }
                }
            }
            graph.add_service(*service_id, dependencies);
        }

        graph
    }

    /// Add a service to the graph
    pub fn add_service(&mut self, service_id: ServiceId, dependencies: Vec<Dependency>) {
        match self.index.get(&service_id) {
            Some(&position) => self.nodes[position].dependencies = dependencies,
            None => {
                self.index.insert(service_id, self.nodes.len());
                self.nodes.push(DependencyNode {
                    service_id,
                    dependencies,
                });
            }
        }
    }

    /// Get declared dependencies for a service
    pub fn get_dependencies(&self, service_id: &ServiceId) -> Option<&[Dependency]> {
        self.index
            .get(service_id)
            .map(|&position| self.nodes[position].dependencies.as_slice())
    }

    /// Every required dependency must have a binding; collections may be empty
    pub fn validate_dependencies(&self, registry: &ServiceRegistry) -> Result<(), CoreError> {
        for node in &self.nodes {
            for dependency in &node.dependencies {
                if dependency.is_required() && !registry.contains_id(&dependency.service_id) {
                    return Err(CoreError::DependencyResolutionFailed {
                        service_type: node.service_id.type_name().to_string(),
                        message: format!(
                            "requires unregistered capability {}",
                            dependency.service_id
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Detect circular dependencies
    pub fn detect_cycles(&self) -> Result<(), CoreError> {
        let mut visited = HashSet::new();
        let mut in_progress = HashSet::new();

        for node in &self.nodes {
            if !visited.contains(&node.service_id) {
                let mut path = ResolutionPath::new();
                self.detect_cycle_dfs(&node.service_id, &mut visited, &mut in_progress, &mut path)?;
            }
        }

        Ok(())
    }

    /// DFS-based cycle detection
    fn detect_cycle_dfs(
        &self,
        service_id: &ServiceId,
        visited: &mut HashSet<ServiceId>,
        in_progress: &mut HashSet<ServiceId>,
        path: &mut ResolutionPath,
    ) -> Result<(), CoreError> {
        if in_progress.contains(service_id) {
            path.push(*service_id);
            return Err(CoreError::circular(path.path_string(), service_id.type_name()));
        }

        if visited.contains(service_id) {
            return Ok(());
        }

        in_progress.insert(*service_id);
        path.push(*service_id);

        if let Some(dependencies) = self.get_dependencies(service_id) {
            for dependency in dependencies {
                self.detect_cycle_dfs(&dependency.service_id, visited, in_progress, path)?;
            }
        }

        path.pop();
        in_progress.remove(service_id);
        visited.insert(*service_id);

        Ok(())
    }
}

/// Builds instances from a registry, one resolution chain at a time.
///
/// Every call produces fresh instances. The resolver tracks the chain of
/// capabilities being built so a producer that asks for a capability already
/// on the chain fails with [`CoreError::CircularDependency`].
#[derive(Debug)]
pub struct Resolver<'r> {
    registry: &'r ServiceRegistry,
    path: RefCell<ResolutionPath>,
    max_depth: usize,
}

/// Pops the resolution path when a producer finishes, on success or failure
struct PathGuard<'a> {
    path: &'a RefCell<ResolutionPath>,
}

impl Drop for PathGuard<'_> {
    fn drop(&mut self) {
        self.path.borrow_mut().pop();
    }
}

impl<'r> Resolver<'r> {
    /// Create a resolver with the default configuration
    pub fn new(registry: &'r ServiceRegistry) -> Self {
        Self::with_config(registry, &ContainerConfig::default())
    }

    pub fn with_config(registry: &'r ServiceRegistry, config: &ContainerConfig) -> Self {
        Self {
            registry,
            path: RefCell::new(ResolutionPath::new()),
            max_depth: config.max_depth,
        }
    }

    /// The registry this resolver reads from
    pub fn registry(&self) -> &'r ServiceRegistry {
        self.registry
    }

    /// Current nesting depth; zero outside of any producer
    pub fn depth(&self) -> usize {
        self.path.borrow().len()
    }

    /// Resolve one instance of `T` from its last-registered binding
    pub fn resolve<T: ?Sized + 'static>(&self) -> Result<Box<T>, CoreError> {
        let service_id = ServiceId::of::<T>();
        let _span = self.root_span("resolve", &service_id);
        let _guard = self.enter(&service_id)?;

        let descriptor = self
            .registry
            .lookup(&service_id)
            .last()
            .ok_or_else(|| CoreError::unregistered(service_id.type_name()))?;

        tracing::trace!(
            "Resolving {} via {} at depth {}",
            service_id,
            descriptor.implementation_name,
            self.depth()
        );
        descriptor.activate::<T>(self)
    }

    /// Resolve `T` if it has a binding, `None` otherwise.
    ///
    /// Failures other than a missing binding still propagate.
    pub fn resolve_optional<T: ?Sized + 'static>(&self) -> Result<Option<Box<T>>, CoreError> {
        if !self.registry.contains::<T>() {
            return Ok(None);
        }
        self.resolve::<T>().map(Some)
    }

    /// Resolve every binding of `T`, in registration order
    pub fn resolve_all<T: ?Sized + 'static>(&self) -> Result<Vec<Box<T>>, CoreError> {
        let service_id = ServiceId::of::<T>();
        let _span = self.root_span("resolve_all", &service_id);
        let _guard = self.enter(&service_id)?;

        let bindings = self.registry.lookup(&service_id);
        tracing::trace!(
            "Resolving {} binding(s) of {} at depth {}",
            bindings.len(),
            service_id,
            self.depth()
        );

        bindings
            .map(|descriptor| descriptor.activate::<T>(self))
            .collect()
    }

    /// Top-level calls get their own span so nested steps share a resolution id
    fn root_span(&self, operation: &'static str, service_id: &ServiceId) -> Option<EnteredSpan> {
        if self.depth() > 0 {
            return None;
        }
        let span = tracing::debug_span!(
            "resolution",
            operation,
            service = service_id.type_name(),
            resolution_id = %Uuid::new_v4()
        );
        Some(span.entered())
    }

    fn enter(&self, service_id: &ServiceId) -> Result<PathGuard<'_>, CoreError> {
        let mut path = self.path.borrow_mut();

        if path.contains(service_id) {
            let mut cycle = path.clone();
            cycle.push(*service_id);
            let error = CoreError::circular(cycle.path_string(), service_id.type_name());
            tracing::warn!("{}", error);
            return Err(error);
        }

        if path.len() >= self.max_depth {
            return Err(CoreError::ResolutionDepthExceeded {
                depth: self.max_depth,
                path: path.path_string(),
            });
        }

        path.push(*service_id);
        Ok(PathGuard { path: &self.path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::descriptor::{Multiplicity, ServiceDescriptor};

    #[derive(Debug)]
    struct Leaf;

    #[derive(Debug)]
    struct Branch {
        #[allow(dead_code)]
        leaf: Box<Leaf>,
    }

    #[test]
    fn test_resolution_path() {
        let mut path = ResolutionPath::new();
        let service_a = ServiceId::of::<u8>();
        let service_b = ServiceId::of::<u16>();

        path.push(service_a);
        path.push(service_b);

        assert!(path.contains(&service_a));
        assert!(path.contains(&service_b));
        assert_eq!(path.path_string(), "u8 -> u16");

        let popped = path.pop();
        assert_eq!(popped, Some(service_b));
        assert!(!path.contains(&service_b));
        assert!(path.contains(&service_a));
    }

    #[test]
    fn test_dependency_graph_cycle_detection() {
        let mut graph = DependencyGraph::new();

        // u8 -> u16 -> u32 -> u8
        graph.add_service(ServiceId::of::<u8>(), vec![Dependency::one::<u16>()]);
        graph.add_service(ServiceId::of::<u16>(), vec![Dependency::one::<u32>()]);
        graph.add_service(ServiceId::of::<u32>(), vec![Dependency::all::<u8>()]);

        let result = graph.detect_cycles();
        match result {
            Err(CoreError::CircularDependency { path, cycle_service }) => {
                assert_eq!(path, "u8 -> u16 -> u32 -> u8");
                assert_eq!(cycle_service, "u8");
            }
            other => panic!("expected a cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_dependency_graph_accepts_dag() {
        let mut graph = DependencyGraph::new();

        graph.add_service(
            ServiceId::of::<u8>(),
            vec![Dependency::one::<u16>(), Dependency::one::<u32>()],
        );
        graph.add_service(ServiceId::of::<u16>(), vec![Dependency::one::<u32>()]);
        graph.add_service(ServiceId::of::<u32>(), vec![]);

        assert!(graph.detect_cycles().is_ok());
        assert_eq!(graph.get_dependencies(&ServiceId::of::<u8>()).map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_registry_validation_reports_missing_required_dependency() {
        let mut registry = ServiceRegistry::new();
        registry.add_descriptor(
            ServiceDescriptor::new::<Branch, _>(Multiplicity::Single, |resolver| {
                Ok(Box::new(Branch {
                    leaf: resolver.resolve::<Leaf>()?,
                }))
            })
            .depends_on::<Leaf>()
            .depends_on_all::<String>(),
        );

        let result = registry.validate();
        match result {
            Err(CoreError::DependencyResolutionFailed { service_type, message }) => {
                assert!(service_type.contains("Branch"));
                assert!(message.contains("Leaf"));
            }
            other => panic!("expected missing dependency, got {:?}", other),
        }

        registry.register::<Leaf, _>(Multiplicity::Single, |_| Ok(Box::new(Leaf)));
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_path_is_cleared_after_failure() {
        let mut registry = ServiceRegistry::new();
        registry.register::<Branch, _>(Multiplicity::Single, |resolver| {
            Ok(Box::new(Branch {
                leaf: resolver.resolve::<Leaf>()?,
            }))
        });

        let resolver = Resolver::new(&registry);
        assert!(resolver.resolve::<Branch>().unwrap_err().is_unregistered());
        assert_eq!(resolver.depth(), 0);

        assert!(resolver.resolve::<Leaf>().unwrap_err().is_unregistered());
        assert_eq!(resolver.depth(), 0);
    }

    #[test]
    fn test_depth_limit() {
        let mut registry = ServiceRegistry::new();
        registry.register::<Leaf, _>(Multiplicity::Single, |_| Ok(Box::new(Leaf)));
        registry.register::<Branch, _>(Multiplicity::Single, |resolver| {
            Ok(Box::new(Branch {
                leaf: resolver.resolve::<Leaf>()?,
            }))
        });

        let shallow = ContainerConfig::default().with_max_depth(1);
        let resolver = Resolver::with_config(&registry, &shallow);

        assert!(resolver.resolve::<Leaf>().is_ok());
        match resolver.resolve::<Branch>() {
            Err(CoreError::ResolutionDepthExceeded { depth, path }) => {
                assert_eq!(depth, 1);
                assert!(path.contains("Branch"));
            }
            other => panic!("expected depth error, got {:?}", other.map(|_| ())),
        }
    }
}
