use crate::container::descriptor::Dependency;
use crate::container::resolver::Resolver;
use crate::errors::CoreError;

/// Trait for services that build themselves from the container.
///
/// `create` pulls each constructor argument out of the resolver, so the
/// resolver sees the dependencies in the order they are needed. The list
/// returned by `dependencies` is metadata for validation and reports; it
/// should match what `create` resolves.
pub trait Injectable: Sized + 'static {
    /// Dependencies this service requires
    fn dependencies() -> Vec<Dependency> {
        Vec::new()
    }

    /// Create an instance of this service, resolving dependencies from the container
    fn create(resolver: &Resolver<'_>) -> Result<Self, CoreError>;
}
