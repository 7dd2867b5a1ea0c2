use serde::Serialize;

use crate::container::registry::ServiceRegistry;

/// Serializable snapshot of a container's bindings
#[derive(Debug, Clone, Serialize)]
pub struct ContainerReport {
    pub service_count: usize,
    pub binding_count: usize,
    pub max_depth: usize,
    pub services: Vec<ServiceReport>,
}

/// One capability and what is bound to it
#[derive(Debug, Clone, Serialize)]
pub struct ServiceReport {
    pub service_type: String,
    /// Multiplicity of the binding `resolve` would pick
    pub multiplicity: String,
    pub binding_count: usize,
    pub implementations: Vec<String>,
    pub dependencies: Vec<String>,
}

impl ContainerReport {
    pub fn from_registry(registry: &ServiceRegistry, max_depth: usize) -> Self {
        let services = registry
            .capabilities()
            .map(|service_id| {
                let bindings = registry.lookup(service_id);
                let multiplicity = bindings
                    .clone()
                    .last()
                    .map(|descriptor| descriptor.multiplicity.to_string())
                    .unwrap_or_default();

                let mut dependencies: Vec<String> = Vec::new();
                for descriptor in bindings.clone() {
                    for dependency in &descriptor.dependencies {
                        let rendered = if dependency.is_required() {
                            dependency.service_id.type_name().to_string()
                        } else {
                            format!("[{}]", dependency.service_id.type_name())
                        };
                        if !dependencies.contains(&rendered) {
                            dependencies.push(rendered);
                        }
                    }
                }

                ServiceReport {
                    service_type: service_id.type_name().to_string(),
                    multiplicity,
                    binding_count: bindings.len(),
                    implementations: bindings
                        .map(|descriptor| descriptor.implementation_name.to_string())
                        .collect(),
                    dependencies,
                }
            })
            .collect();

        Self {
            service_count: registry.service_count(),
            binding_count: registry.binding_count(),
            max_depth,
            services,
        }
    }

    /// Find the entry for a capability by (possibly partial) type name
    pub fn service(&self, type_name: &str) -> Option<&ServiceReport> {
        self.services
            .iter()
            .find(|service| service.service_type.contains(type_name))
    }
}
