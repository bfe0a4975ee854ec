pub mod class;
pub mod descriptor;
pub mod identity;
pub mod locator;
pub mod policy;

pub use class::{ClassRef, LoadedClass, class_resource_name, package_of};
pub use descriptor::ArtifactDescriptor;
pub use identity::LoaderId;
pub use locator::ResourceLocator;
pub use policy::{ClassLoaderLookupPolicy, LookupStrategy};
