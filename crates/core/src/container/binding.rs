use crate::container::autowiring::Injectable;
use crate::container::descriptor::{Multiplicity, ServiceDescriptor};
use crate::container::registry::ServiceRegistry;
use crate::container::resolver::Resolver;
use crate::errors::CoreError;

/// Binding API for composing a registry
pub trait ServiceBinder {
    /// Bind a single implementation of `T`; later calls override earlier ones
    fn bind<T, F>(&mut self, producer: F) -> &mut Self
    where
        T: ?Sized + 'static,
        F: Fn(&Resolver<'_>) -> Result<Box<T>, CoreError> + Send + Sync + 'static;

    /// Add one implementation of `T` to its collection
    fn bind_many<T, F>(&mut self, producer: F) -> &mut Self
    where
        T: ?Sized + 'static,
        F: Fn(&Resolver<'_>) -> Result<Box<T>, CoreError> + Send + Sync + 'static;

    /// Bind a concrete `Injectable` type as its own capability
    fn bind_injectable<T: Injectable>(&mut self) -> &mut Self;

    /// Bind an `Injectable` implementation behind an interface.
    ///
    /// `upcast` turns the concrete box into the interface box, usually
    /// `|service| service as Box<dyn Interface>`.
    fn bind_injectable_as<TInterface, TImpl, U>(
        &mut self,
        multiplicity: Multiplicity,
        upcast: U,
    ) -> &mut Self
    where
        TInterface: ?Sized + 'static,
        TImpl: Injectable,
        U: Fn(Box<TImpl>) -> Box<TInterface> + Send + Sync + 'static;
}

impl ServiceBinder for ServiceRegistry {
    fn bind<T, F>(&mut self, producer: F) -> &mut Self
    where
        T: ?Sized + 'static,
        F: Fn(&Resolver<'_>) -> Result<Box<T>, CoreError> + Send + Sync + 'static,
    {
        self.register::<T, F>(Multiplicity::Single, producer)
    }

    fn bind_many<T, F>(&mut self, producer: F) -> &mut Self
    where
        T: ?Sized + 'static,
        F: Fn(&Resolver<'_>) -> Result<Box<T>, CoreError> + Send + Sync + 'static,
    {
        self.register::<T, F>(Multiplicity::Multi, producer)
    }

    fn bind_injectable<T: Injectable>(&mut self) -> &mut Self {
        let descriptor = ServiceDescriptor::new::<T, _>(Multiplicity::Single, |resolver| {
            T::create(resolver).map(Box::new)
        })
        .with_dependencies(T::dependencies());
        self.add_descriptor(descriptor)
    }

    fn bind_injectable_as<TInterface, TImpl, U>(
        &mut self,
        multiplicity: Multiplicity,
        upcast: U,
    ) -> &mut Self
    where
        TInterface: ?Sized + 'static,
        TImpl: Injectable,
        U: Fn(Box<TImpl>) -> Box<TInterface> + Send + Sync + 'static,
    {
        let descriptor = ServiceDescriptor::new::<TInterface, _>(multiplicity, move |resolver| {
            TImpl::create(resolver).map(|service| upcast(Box::new(service)))
        })
        .with_implementation::<TImpl>()
        .with_dependencies(TImpl::dependencies());
        self.add_descriptor(descriptor)
    }
}
