//! Exported service providers and the service-descriptor lookup path.

pub mod exported;
pub mod registry;

pub use exported::{ExportedService, ServiceDescriptorWriter};
pub use registry::{ExportedServiceProvider, ServiceProviderRegistry};

/// Resource path fragment that marks a service-descriptor lookup.
pub const SERVICE_DESCRIPTOR_PREFIX: &str = "META-INF/services/";

/// Service interface named by a descriptor lookup.
///
/// Matches the first occurrence of [`SERVICE_DESCRIPTOR_PREFIX`] anywhere in
/// `name` and returns the remainder untouched. `None` when the prefix is
/// absent or nothing follows it.
pub fn service_interface_of(name: &str) -> Option<&str> {
    let start = name.find(SERVICE_DESCRIPTOR_PREFIX)? + SERVICE_DESCRIPTOR_PREFIX.len();
    let service_interface = &name[start..];
    (!service_interface.is_empty()).then_some(service_interface)
}
