//! Filtering view over an artifact's backing loader.

use crate::config::ClassLoadingConfig;
use crate::diagnostics::{ClassLoadingTracer, Decision, LookupKind};
use crate::service::{ExportedServiceProvider, ServiceProviderRegistry, service_interface_of};
use artiscope_api::{
    ArtifactClassLoader, ArtifactDescriptor, ClassLoader, ClassLoaderFilter,
    ClassLoaderLookupPolicy, ClassRef, LoaderError, LoaderId, LoaderResult, ResourceLocator,
    ShutdownListener,
};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Restricts which classes and resources of an artifact are visible.
///
/// Class lookups and resource lookups are screened by the filter before being
/// delegated. Service-descriptor lookups (`META-INF/services/<interface>`)
/// are answered from the exported service registry first, bypassing the
/// filter; a registry miss falls back to the filtered path.
///
/// The wrapper takes no locks. Disposing it never disposes the delegate.
pub struct FilteringArtifactClassLoader {
    id: LoaderId,
    delegate: Arc<dyn ArtifactClassLoader>,
    filter: Arc<dyn ClassLoaderFilter>,
    exported_services: ServiceProviderRegistry,
    tracer: ClassLoadingTracer,
    disposed: AtomicBool,
}

impl FilteringArtifactClassLoader {
    /// Wraps `delegate` using the process-wide class-loading settings.
    pub fn new(
        delegate: Arc<dyn ArtifactClassLoader>,
        filter: Arc<dyn ClassLoaderFilter>,
        exported_services: Vec<ExportedServiceProvider>,
    ) -> Self {
        Self::with_config(
            delegate,
            filter,
            exported_services,
            ClassLoadingConfig::global(),
        )
    }

    pub fn with_config(
        delegate: Arc<dyn ArtifactClassLoader>,
        filter: Arc<dyn ClassLoaderFilter>,
        exported_services: Vec<ExportedServiceProvider>,
        config: ClassLoadingConfig,
    ) -> Self {
        Self {
            id: LoaderId::next(),
            delegate,
            filter,
            exported_services: ServiceProviderRegistry::new(exported_services),
            tracer: ClassLoadingTracer::new(config.verbose_classloading),
            disposed: AtomicBool::new(false),
        }
    }

    pub fn filter(&self) -> &Arc<dyn ClassLoaderFilter> {
        &self.filter
    }

    pub fn exported_services(&self) -> &ServiceProviderRegistry {
        &self.exported_services
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    fn exported_service(&self, name: &str) -> Option<ResourceLocator> {
        let service_interface = service_interface_of(name)?;
        match self.exported_services.find_first(service_interface) {
            Some(locator) => {
                self.tracer.outcome(
                    self.artifact_id(),
                    LookupKind::ServiceDescriptor,
                    service_interface,
                    Decision::ServiceHit,
                    locator,
                );
                Some(locator.clone())
            }
            None => {
                self.tracer.decision(
                    self.artifact_id(),
                    LookupKind::ServiceDescriptor,
                    service_interface,
                    Decision::ServiceMiss,
                );
                None
            }
        }
    }

    fn exported_services_for(&self, name: &str) -> Option<Vec<ResourceLocator>> {
        let service_interface = service_interface_of(name)?;
        let providers = self.exported_services.find_all(service_interface);
        if providers.is_empty() {
            self.tracer.decision(
                self.artifact_id(),
                LookupKind::ServiceDescriptor,
                service_interface,
                Decision::ServiceMiss,
            );
            return None;
        }
        self.tracer.outcome(
            self.artifact_id(),
            LookupKind::ServiceDescriptor,
            service_interface,
            Decision::ServiceHit,
            &providers,
        );
        Some(providers)
    }
}

impl ClassLoader for FilteringArtifactClassLoader {
    fn id(&self) -> LoaderId {
        self.id
    }

    fn load_class(&self, name: &str) -> LoaderResult<ClassRef> {
        if self.filter.exports_class(name) {
            self.tracer
                .decision(self.artifact_id(), LookupKind::Class, name, Decision::Exported);
            self.delegate.class_loader().load_class(name)
        } else {
            self.tracer
                .decision(self.artifact_id(), LookupKind::Class, name, Decision::Filtered);
            Err(LoaderError::NotExported {
                class_name: name.to_string(),
                artifact_id: self.artifact_id().to_string(),
                filter: Arc::clone(&self.filter),
            })
        }
    }

    fn get_resource(&self, name: &str) -> Option<ResourceLocator> {
        if let Some(locator) = self.exported_service(name) {
            return Some(locator);
        }

        if self.filter.exports_resource(name) {
            // Local lookup only; the delegate's own parent chain is not ours to expose.
            let resource = self.delegate.find_resource(name);
            self.tracer.outcome(
                self.artifact_id(),
                LookupKind::Resource,
                name,
                Decision::Exported,
                &resource,
            );
            resource
        } else {
            self.tracer
                .decision(self.artifact_id(), LookupKind::Resource, name, Decision::Filtered);
            None
        }
    }

    fn get_resources(&self, name: &str) -> LoaderResult<Vec<ResourceLocator>> {
        if let Some(providers) = self.exported_services_for(name) {
            return Ok(providers);
        }

        if self.filter.exports_resource(name) {
            let resources = self.delegate.find_resources(name)?;
            self.tracer.outcome(
                self.artifact_id(),
                LookupKind::Resources,
                name,
                Decision::Exported,
                &resources,
            );
            Ok(resources)
        } else {
            self.tracer.decision(
                self.artifact_id(),
                LookupKind::Resources,
                name,
                Decision::Filtered,
            );
            Ok(Vec::new())
        }
    }
}

impl ArtifactClassLoader for FilteringArtifactClassLoader {
    fn class_loader(&self) -> &dyn ClassLoader {
        self
    }

    fn artifact_id(&self) -> &str {
        self.delegate.artifact_id()
    }

    fn artifact_descriptor(&self) -> &ArtifactDescriptor {
        self.delegate.artifact_descriptor()
    }

    fn find_resource(&self, name: &str) -> Option<ResourceLocator> {
        self.delegate.find_resource(name)
    }

    fn find_resources(&self, name: &str) -> LoaderResult<Vec<ResourceLocator>> {
        self.delegate.find_resources(name)
    }

    fn find_local_class(&self, name: &str) -> LoaderResult<ClassRef> {
        self.delegate.find_local_class(name)
    }

    fn find_local_resource(&self, name: &str) -> Option<ResourceLocator> {
        self.delegate.find_local_resource(name)
    }

    fn add_shutdown_listener(&self, listener: Arc<dyn ShutdownListener>) {
        if self.is_disposed() {
            warn!(
                artifact = self.artifact_id(),
                "Ignoring shutdown listener registered on disposed filtering loader"
            );
            return;
        }
        self.delegate.add_shutdown_listener(listener);
    }

    fn lookup_policy(&self) -> Arc<ClassLoaderLookupPolicy> {
        self.delegate.lookup_policy()
    }

    fn dispose(&self) {
        // Passive wrapper: the delegate keeps its own lifecycle.
        self.disposed.store(true, Ordering::Release);
    }
}

impl fmt::Display for FilteringArtifactClassLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FilteringArtifactClassLoader[{}]@{:x}",
            self.delegate.artifact_id(),
            self.id
        )
    }
}

impl fmt::Debug for FilteringArtifactClassLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteringArtifactClassLoader")
            .field("id", &self.id)
            .field("artifact_id", &self.delegate.artifact_id())
            .field("filter", &self.filter)
            .field("exported_services", &self.exported_services.len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
