//! Artifact isolation core: visibility filters, exported service providers
//! and the filtering loader that puts them in front of a backing loader.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod service;

pub use config::ClassLoadingConfig;
pub use error::{ArtiscopeError, Result};
pub use filter::{ArtifactClassLoaderFilter, ClassLoaderFilterFactory};
pub use loader::{FilteringArtifactClassLoader, InMemoryArtifactClassLoader};
pub use service::{
    ExportedService, ExportedServiceProvider, SERVICE_DESCRIPTOR_PREFIX, ServiceDescriptorWriter,
    ServiceProviderRegistry,
};
