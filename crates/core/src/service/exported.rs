//! Exported services declared in configuration and their descriptor files.

use super::SERVICE_DESCRIPTOR_PREFIX;
use super::registry::ExportedServiceProvider;
use crate::error::{ArtiscopeError, Result};
use artiscope_api::{LoaderError, ResourceLocator};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A service implementation an artifact advertises to other artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawExportedService")]
pub struct ExportedService {
    service_interface: String,
    service_implementation: String,
}

#[derive(Deserialize)]
struct RawExportedService {
    service_interface: String,
    service_implementation: String,
}

impl TryFrom<RawExportedService> for ExportedService {
    type Error = LoaderError;

    fn try_from(raw: RawExportedService) -> std::result::Result<Self, Self::Error> {
        ExportedService::new(raw.service_interface, raw.service_implementation)
    }
}

impl ExportedService {
    pub fn new(
        service_interface: impl Into<String>,
        service_implementation: impl Into<String>,
    ) -> std::result::Result<Self, LoaderError> {
        let service_interface = service_interface.into();
        let service_implementation = service_implementation.into();
        if service_interface.is_empty() {
            return Err(LoaderError::IllegalArgument(
                "Service interface cannot be empty".to_string(),
            ));
        }
        if !is_file_name(&service_interface) {
            return Err(LoaderError::IllegalArgument(format!(
                "Service interface '{}' must be a plain file name",
                service_interface
            )));
        }
        if service_implementation.is_empty() {
            return Err(LoaderError::IllegalArgument(format!(
                "Service implementation for '{}' cannot be empty",
                service_interface
            )));
        }
        Ok(Self {
            service_interface,
            service_implementation,
        })
    }

    pub fn service_interface(&self) -> &str {
        &self.service_interface
    }

    pub fn service_implementation(&self) -> &str {
        &self.service_implementation
    }
}

/// Descriptor files are named after the interface, so the name must stay a
/// single path segment inside the descriptor directory.
fn is_file_name(name: &str) -> bool {
    !name.contains(['/', '\\']) && name != "." && name != ".."
}

/// Materializes descriptor files for exported services.
///
/// Each service gets its own `<root>/<n>/META-INF/services/<interface>` file
/// containing the implementation name, so two services for the same
/// interface never overwrite each other.
pub struct ServiceDescriptorWriter {
    root: PathBuf,
}

impl ServiceDescriptorWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write one descriptor per service, returning providers in input order.
    pub fn write_all(&self, services: &[ExportedService]) -> Result<Vec<ExportedServiceProvider>> {
        fs::create_dir_all(&self.root)?;
        let root = fs::canonicalize(&self.root)?;

        services
            .iter()
            .enumerate()
            .map(|(index, service)| Self::write_descriptor(&root.join(index.to_string()), service))
            .collect()
    }

    fn write_descriptor(dir: &Path, service: &ExportedService) -> Result<ExportedServiceProvider> {
        let path = dir
            .join(SERVICE_DESCRIPTOR_PREFIX)
            .join(&service.service_interface);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, format!("{}\n", service.service_implementation))?;

        let locator = ResourceLocator::from_file_path(&path).ok_or_else(|| {
            ArtiscopeError::Config(format!("Cannot build locator for {}", path.display()))
        })?;
        debug!(
            "Wrote service descriptor for {} at {}",
            service.service_interface, locator
        );
        Ok(ExportedServiceProvider::new(
            service.service_interface.clone(),
            locator,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_rejects_empty_fields() {
        assert!(matches!(
            ExportedService::new("", "impl.Foo"),
            Err(LoaderError::IllegalArgument(_))
        ));
        assert!(matches!(
            ExportedService::new("com.svc.Driver", ""),
            Err(LoaderError::IllegalArgument(_))
        ));
    }

    #[test]
    fn test_rejects_interface_names_that_leave_the_descriptor_dir() {
        for name in ["/tmp/outside.txt", "../../../../escaped", "com/svc/Driver", "a\\b", "..", "."] {
            assert!(
                matches!(
                    ExportedService::new(name, "com.impl.FastDriver"),
                    Err(LoaderError::IllegalArgument(_))
                ),
                "accepted {name}"
            );
        }
        assert!(ExportedService::new("com.svc.Driver$Inner", "com.impl.FastDriver").is_ok());

        let err = serde_json::from_str::<ExportedService>(
            r#"{"service_interface":"../escaped","service_implementation":"com.impl.FastDriver"}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_write_all_stays_inside_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("descriptors");
        let writer = ServiceDescriptorWriter::new(&root);

        let providers = writer
            .write_all(&[ExportedService::new("com.svc.Driver", "com.impl.FastDriver").unwrap()])
            .unwrap();
        let path = providers[0].resource().to_file_path().unwrap();
        assert!(path.starts_with(fs::canonicalize(&root).unwrap()));
        assert!(!dir.path().join("escaped").exists());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: ExportedService = serde_json::from_str(
            r#"{"service_interface":"com.svc.Driver","service_implementation":"com.impl.FastDriver"}"#,
        )
        .unwrap();
        assert_eq!(ok.service_interface(), "com.svc.Driver");

        let err = serde_json::from_str::<ExportedService>(
            r#"{"service_interface":"","service_implementation":"com.impl.FastDriver"}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_write_all_creates_descriptor_files_in_order() {
        let dir = tempdir().unwrap();
        let writer = ServiceDescriptorWriter::new(dir.path().join("descriptors"));

        let services = vec![
            ExportedService::new("com.svc.Driver", "com.impl.FastDriver").unwrap(),
            ExportedService::new("com.svc.Driver", "com.impl.SlowDriver").unwrap(),
        ];
        let providers = writer.write_all(&services).unwrap();

        assert_eq!(providers.len(), 2);
        assert_ne!(providers[0].resource(), providers[1].resource());

        let first = providers[0].resource().to_file_path().unwrap();
        assert!(first.ends_with("META-INF/services/com.svc.Driver"));
        assert_eq!(fs::read_to_string(first).unwrap(), "com.impl.FastDriver\n");

        let second = providers[1].resource().to_file_path().unwrap();
        assert_eq!(fs::read_to_string(second).unwrap(), "com.impl.SlowDriver\n");
    }
}
