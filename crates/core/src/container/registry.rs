use std::collections::HashMap;

use crate::container::descriptor::{Multiplicity, ServiceDescriptor, ServiceId};
use crate::container::resolver::{DependencyGraph, Resolver};
use crate::errors::CoreError;

/// Lazy view over the bindings of one capability, in registration order.
/// Clone it to walk the same bindings again.
pub type Bindings<'a> = std::slice::Iter<'a, ServiceDescriptor>;

/// Capability → bindings map, populated during composition
#[derive(Debug, Default)]
pub struct ServiceRegistry {
    bindings: HashMap<ServiceId, Vec<ServiceDescriptor>>,
    /// Capabilities in first-registration order
    order: Vec<ServiceId>,
}

impl ServiceRegistry {
    /// Create a new service registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a producer for capability `T`
    pub fn register<T, F>(&mut self, multiplicity: Multiplicity, producer: F) -> &mut Self
    where
        T: ?Sized + 'static,
        F: Fn(&Resolver<'_>) -> Result<Box<T>, CoreError> + Send + Sync + 'static,
    {
        self.add_descriptor(ServiceDescriptor::new::<T, F>(multiplicity, producer))
    }

    /// Add a prepared binding.
    ///
    /// `Multi` bindings accumulate. A `Single` binding replaces every earlier
    /// binding of its capability.
    pub fn add_descriptor(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        let service_id = descriptor.service_id;
        if !self.bindings.contains_key(&service_id) {
            self.order.push(service_id);
        }
        let entries = self.bindings.entry(service_id).or_default();

        if descriptor.multiplicity.is_single() && !entries.is_empty() {
            tracing::debug!(
                "Replacing {} earlier binding(s) for {}",
                entries.len(),
                service_id
            );
            entries.clear();
        }

        tracing::debug!(
            "Registered {} -> {} ({})",
            service_id,
            descriptor.implementation_name,
            descriptor.multiplicity
        );
        entries.push(descriptor);
        self
    }

    /// All bindings for a capability, oldest first; empty if none
    pub fn lookup(&self, service_id: &ServiceId) -> Bindings<'_> {
        self.bindings
            .get(service_id)
            .map(|entries| entries.as_slice())
            .unwrap_or(&[])
            .iter()
    }

    /// Typed form of [`ServiceRegistry::lookup`]
    pub fn lookup_of<T: ?Sized + 'static>(&self) -> Bindings<'_> {
        self.lookup(&ServiceId::of::<T>())
    }

    /// Check if a capability has at least one binding
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.contains_id(&ServiceId::of::<T>())
    }

    pub fn contains_id(&self, service_id: &ServiceId) -> bool {
        self.bindings
            .get(service_id)
            .is_some_and(|entries| !entries.is_empty())
    }

    /// Number of capabilities with at least one binding
    pub fn service_count(&self) -> usize {
        self.bindings.values().filter(|entries| !entries.is_empty()).count()
    }

    /// Number of bindings across all capabilities
    pub fn binding_count(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    /// Registered capabilities in first-registration order
    pub fn capabilities(&self) -> impl Iterator<Item = &ServiceId> + '_ {
        self.order.iter().filter(move |id| self.contains_id(id))
    }

    /// Check declared dependencies without invoking any producer
    pub fn validate(&self) -> Result<(), CoreError> {
        let graph = DependencyGraph::from_registry(self);
        graph.validate_dependencies(self)?;
        graph.detect_cycles()
    }
}
