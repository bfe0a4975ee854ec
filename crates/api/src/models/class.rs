use super::identity::LoaderId;
use super::locator::ResourceLocator;
use std::sync::Arc;

/// A class definition produced by a backing loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedClass {
    pub name: String,
    /// Loader that defined the class (not necessarily the one asked).
    pub defining_loader: LoaderId,
    pub artifact_id: String,
    pub source: ResourceLocator,
    pub bytes: Arc<[u8]>,
}

impl LoadedClass {
    pub fn new(
        name: impl Into<String>,
        defining_loader: LoaderId,
        artifact_id: impl Into<String>,
        source: ResourceLocator,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            defining_loader,
            artifact_id: artifact_id.into(),
            source,
            bytes: bytes.into(),
        }
    }

    /// Package part of the class name; empty for the default package.
    pub fn package(&self) -> &str {
        package_of(&self.name)
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

pub type ClassRef = Arc<LoadedClass>;

/// Package part of a fully-qualified class name.
pub fn package_of(class_name: &str) -> &str {
    class_name
        .rfind('.')
        .map(|idx| &class_name[..idx])
        .unwrap_or("")
}

/// Archive entry path holding the bytes of `class_name` (`a.b.C` -> `a/b/C.class`).
pub fn class_resource_name(class_name: &str) -> String {
    class_name.replace('.', "/") + ".class"
}
