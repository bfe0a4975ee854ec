//! Classpath-backed artifact loader: resolves classes and resources from an
//! ordered list of jar archives and class directories.

pub mod classpath;
pub mod inspect;
pub mod loader;

pub use classpath::{ClasspathEntry, JarArchive};
pub use inspect::{CLASS_MAGIC, ClassKind, check_magic, inspect_class};
pub use loader::{JarArtifactClassLoader, JarArtifactClassLoaderBuilder};
