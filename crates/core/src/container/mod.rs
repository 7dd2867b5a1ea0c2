pub mod autowiring;
pub mod binding;
pub mod descriptor;
pub mod ioc_container;
pub mod registry;
pub mod report;
pub mod resolver;

pub use autowiring::Injectable;
pub use binding::ServiceBinder;
pub use descriptor::{Dependency, Multiplicity, ServiceDescriptor, ServiceFactory, ServiceId};
pub use ioc_container::IocContainer;
pub use registry::{Bindings, ServiceRegistry};
pub use report::{ContainerReport, ServiceReport};
pub use resolver::{DependencyGraph, ResolutionPath, Resolver};
