use std::fmt::Debug;

/// Decides which classes and resources an artifact makes visible to others.
///
/// Implementations must be pure: the same name always yields the same answer
/// for the lifetime of the loader that owns the filter. `Debug` output is used
/// to describe the policy when a lookup is rejected.
pub trait ClassLoaderFilter: Debug + Send + Sync {
    /// Whether the fully-qualified class `name` is visible.
    fn exports_class(&self, name: &str) -> bool;

    /// Whether the resource path `name` is visible.
    fn exports_resource(&self, name: &str) -> bool;
}
