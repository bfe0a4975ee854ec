pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod loader;
pub mod models;

// Re-export commonly used types
pub use error::{LoaderError, LoaderResult};
pub use filter::ClassLoaderFilter;
pub use lifecycle::ShutdownListener;
pub use loader::{ArtifactClassLoader, ClassLoader};
pub use models::*;
