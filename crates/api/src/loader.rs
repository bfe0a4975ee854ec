use crate::error::LoaderResult;
use crate::lifecycle::ShutdownListener;
use crate::models::{
    ArtifactDescriptor, ClassLoaderLookupPolicy, ClassRef, LoaderId, ResourceLocator,
};
use std::sync::Arc;

/// Symbol resolution entry points seen by code running inside an artifact.
///
/// `get_resource` and `get_resources` may walk a parent chain according to the
/// loader's policy; the `find_*` methods on [`ArtifactClassLoader`] never do.
pub trait ClassLoader: Send + Sync {
    /// Stable identity of this loader.
    fn id(&self) -> LoaderId;

    fn load_class(&self, name: &str) -> LoaderResult<ClassRef>;

    fn get_resource(&self, name: &str) -> Option<ResourceLocator>;

    fn get_resources(&self, name: &str) -> LoaderResult<Vec<ResourceLocator>>;
}

/// A loader that owns (or fronts) the classes and resources of one artifact.
pub trait ArtifactClassLoader: ClassLoader {
    /// The effective loader for code inside the artifact.
    ///
    /// Wrappers return themselves here so that lookups made through this handle
    /// go through the wrapper and never reach the wrapped loader directly.
    fn class_loader(&self) -> &dyn ClassLoader;

    fn artifact_id(&self) -> &str;

    fn artifact_descriptor(&self) -> &ArtifactDescriptor;

    /// Local resource lookup; no parent delegation.
    fn find_resource(&self, name: &str) -> Option<ResourceLocator>;

    /// Every local occurrence of `name`; no parent delegation.
    fn find_resources(&self, name: &str) -> LoaderResult<Vec<ResourceLocator>>;

    /// Defines (or returns the already defined) class from local bytes only.
    fn find_local_class(&self, name: &str) -> LoaderResult<ClassRef>;

    fn find_local_resource(&self, name: &str) -> Option<ResourceLocator>;

    fn add_shutdown_listener(&self, listener: Arc<dyn ShutdownListener>);

    fn lookup_policy(&self) -> Arc<ClassLoaderLookupPolicy>;

    fn dispose(&self);
}
