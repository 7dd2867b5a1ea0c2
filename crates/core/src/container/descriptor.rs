use std::any::{Any, TypeId};

use crate::container::resolver::Resolver;
use crate::errors::CoreError;

/// Identifier for a capability: the `TypeId` of the requested type plus its name
#[derive(Debug, Clone, Copy)]
pub struct ServiceId {
    pub type_id: TypeId,
    pub type_name: &'static str,
}

impl ServiceId {
    /// Create a new service ID for a type
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

// Identity is the TypeId alone; type names are not guaranteed unique.
impl PartialEq for ServiceId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ServiceId {}

impl std::hash::Hash for ServiceId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name)
    }
}

/// How repeated registrations of one capability combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Multiplicity {
    /// The latest registration replaces earlier ones
    #[default]
    Single,
    /// Every registration is kept, in insertion order
    Multi,
}

impl Multiplicity {
    pub fn is_single(&self) -> bool {
        matches!(self, Multiplicity::Single)
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Multiplicity::Multi)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Multiplicity::Single => "single",
            Multiplicity::Multi => "multi",
        }
    }
}

impl std::fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dependency a binding declares up front, used by static validation.
///
/// `Single` dependencies must have at least one binding. `Multi` dependencies
/// are resolved as a collection and may legitimately be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    pub service_id: ServiceId,
    pub multiplicity: Multiplicity,
}

impl Dependency {
    /// Dependency on exactly one instance of `T`
    pub fn one<T: ?Sized + 'static>() -> Self {
        Self {
            service_id: ServiceId::of::<T>(),
            multiplicity: Multiplicity::Single,
        }
    }

    /// Dependency on every registered `T`
    pub fn all<T: ?Sized + 'static>() -> Self {
        Self {
            service_id: ServiceId::of::<T>(),
            multiplicity: Multiplicity::Multi,
        }
    }

    pub fn is_required(&self) -> bool {
        self.multiplicity.is_single()
    }
}

/// Type-erased producer. The returned `Any` always holds a `Box<T>` for the
/// descriptor's capability `T`, which lets `T` be an unsized trait object.
pub type ServiceFactory =
    Box<dyn Fn(&Resolver<'_>) -> Result<Box<dyn Any>, CoreError> + Send + Sync>;

fn into_factory<F>(factory: F) -> ServiceFactory
where
    F: Fn(&Resolver<'_>) -> Result<Box<dyn Any>, CoreError> + Send + Sync + 'static,
{
    Box::new(factory)
}

/// A binding: capability, producer and multiplicity
pub struct ServiceDescriptor {
    /// The capability this binding satisfies
    pub service_id: ServiceId,
    /// Name of the concrete type the producer builds, when known
    pub implementation_name: &'static str,
    pub multiplicity: Multiplicity,
    /// Dependencies declared for validation; the producer is still the authority
    pub dependencies: Vec<Dependency>,
    factory: ServiceFactory,
}

impl std::fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("service_id", &self.service_id)
            .field("implementation_name", &self.implementation_name)
            .field("multiplicity", &self.multiplicity)
            .field("dependencies", &self.dependencies)
            .field("factory", &"<factory_fn>")
            .finish()
    }
}

impl ServiceDescriptor {
    /// Create a descriptor for capability `T` from a producer
    pub fn new<T, F>(multiplicity: Multiplicity, producer: F) -> Self
    where
        T: ?Sized + 'static,
        F: Fn(&Resolver<'_>) -> Result<Box<T>, CoreError> + Send + Sync + 'static,
    {
        let factory = into_factory(move |resolver| {
            let instance = producer(resolver)?;
            Ok(Box::new(instance) as Box<dyn Any>)
        });

        Self {
            service_id: ServiceId::of::<T>(),
            implementation_name: std::any::type_name::<T>(),
            multiplicity,
            dependencies: Vec::new(),
            factory,
        }
    }

    /// Record the concrete type name for reports and logs
    pub fn with_implementation<TImpl: ?Sized + 'static>(mut self) -> Self {
        self.implementation_name = std::any::type_name::<TImpl>();
        self
    }

    /// Declare a dependency on one instance of `T`
    pub fn depends_on<T: ?Sized + 'static>(mut self) -> Self {
        self.dependencies.push(Dependency::one::<T>());
        self
    }

    /// Declare a dependency on every registered `T`
    pub fn depends_on_all<T: ?Sized + 'static>(mut self) -> Self {
        self.dependencies.push(Dependency::all::<T>());
        self
    }

    /// Declare several dependencies at once
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = Dependency>) -> Self {
        self.dependencies.extend(dependencies);
        self
    }

    /// Run the producer and recover the typed instance
    pub(crate) fn activate<T: ?Sized + 'static>(
        &self,
        resolver: &Resolver<'_>,
    ) -> Result<Box<T>, CoreError> {
        if self.service_id != ServiceId::of::<T>() {
            return Err(CoreError::InstanceTypeMismatch {
                service_type: std::any::type_name::<T>().to_string(),
            });
        }

        let instance = (self.factory)(resolver)?;
        instance
            .downcast::<Box<T>>()
            .map(|boxed| *boxed)
            .map_err(|_| CoreError::InstanceTypeMismatch {
                service_type: self.service_id.type_name().to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::registry::ServiceRegistry;

    trait Greeter {
        fn greet(&self) -> String;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[test]
    fn test_service_id_identity() {
        let id1 = ServiceId::of::<English>();
        let id2 = ServiceId::of::<dyn Greeter>();

        assert_eq!(id1, ServiceId::of::<English>());
        assert_ne!(id1, id2);
        assert!(id1.type_name().contains("English"));
        assert!(id2.type_name().contains("Greeter"));
        assert_eq!(ServiceId::of::<String>().to_string(), "alloc::string::String");
    }

    #[test]
    fn test_descriptor_metadata() {
        let descriptor = ServiceDescriptor::new::<dyn Greeter, _>(Multiplicity::Multi, |_| {
            Ok(Box::new(English) as Box<dyn Greeter>)
        })
        .with_implementation::<English>()
        .depends_on::<String>()
        .depends_on_all::<u32>();

        assert_eq!(descriptor.service_id, ServiceId::of::<dyn Greeter>());
        assert!(descriptor.implementation_name.contains("English"));
        assert!(descriptor.multiplicity.is_multi());
        assert_eq!(
            descriptor.dependencies,
            vec![Dependency::one::<String>(), Dependency::all::<u32>()]
        );
        assert!(descriptor.dependencies[0].is_required());
        assert!(!descriptor.dependencies[1].is_required());
    }

    #[test]
    fn test_activate_unsized_capability() {
        let registry = ServiceRegistry::new();
        let resolver = Resolver::new(&registry);
        let descriptor = ServiceDescriptor::new::<dyn Greeter, _>(Multiplicity::Single, |_| {
            Ok(Box::new(English) as Box<dyn Greeter>)
        });

        let greeter = descriptor.activate::<dyn Greeter>(&resolver).unwrap();
        assert_eq!(greeter.greet(), "hello");
    }

    #[test]
    fn test_activate_with_wrong_type_is_rejected() {
        let registry = ServiceRegistry::new();
        let resolver = Resolver::new(&registry);
        let descriptor =
            ServiceDescriptor::new::<English, _>(Multiplicity::Single, |_| Ok(Box::new(English)));

        let result = descriptor.activate::<dyn Greeter>(&resolver);
        assert!(matches!(result, Err(CoreError::InstanceTypeMismatch { .. })));
    }
}
