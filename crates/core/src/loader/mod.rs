pub mod delegation;
pub mod filtering;
pub mod memory;

pub use delegation::{ListenerSet, ParentDelegation};
pub use filtering::FilteringArtifactClassLoader;
pub use memory::{InMemoryArtifactClassLoader, InMemoryArtifactClassLoaderBuilder};
