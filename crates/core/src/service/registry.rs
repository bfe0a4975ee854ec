//! Ordered table of exported service providers.

use artiscope_api::{LoaderError, LoaderResult, ResourceLocator};

/// Binds a service interface to the descriptor advertising its implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedServiceProvider {
    service_interface: String,
    resource: ResourceLocator,
}

impl ExportedServiceProvider {
    pub fn new(service_interface: impl Into<String>, resource: ResourceLocator) -> LoaderResult<Self> {
        let service_interface = service_interface.into();
        if service_interface.is_empty() {
            return Err(LoaderError::IllegalArgument(
                "Service interface cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            service_interface,
            resource,
        })
    }

    pub fn service_interface(&self) -> &str {
        &self.service_interface
    }

    pub fn resource(&self) -> &ResourceLocator {
        &self.resource
    }
}

/// Immutable, insertion-ordered provider bindings.
///
/// Lookups compare interface names byte-for-byte. Several bindings may share
/// an interface; `find_first` returns the earliest one.
#[derive(Debug, Clone, Default)]
pub struct ServiceProviderRegistry {
    providers: Vec<ExportedServiceProvider>,
}

impl ServiceProviderRegistry {
    pub fn new(providers: Vec<ExportedServiceProvider>) -> Self {
        Self { providers }
    }

    pub fn find_first(&self, service_interface: &str) -> Option<&ResourceLocator> {
        self.providers
            .iter()
            .find(|provider| provider.service_interface == service_interface)
            .map(|provider| &provider.resource)
    }

    pub fn find_all(&self, service_interface: &str) -> Vec<ResourceLocator> {
        self.providers
            .iter()
            .filter(|provider| provider.service_interface == service_interface)
            .map(|provider| provider.resource.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExportedServiceProvider> {
        self.providers.iter()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl FromIterator<ExportedServiceProvider> for ServiceProviderRegistry {
    fn from_iter<T: IntoIterator<Item = ExportedServiceProvider>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
