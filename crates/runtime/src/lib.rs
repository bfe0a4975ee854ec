pub mod config;

pub use config::ArtifactConfig;

use artiscope_api::{ArtifactClassLoader, LoaderResult, ResourceLocator};
use artiscope_core::{
    ArtifactClassLoaderFilter, ClassLoadingConfig, FilteringArtifactClassLoader, Result,
    ServiceDescriptorWriter,
};
use artiscope_jar::JarArtifactClassLoader;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// A filtering loader together with the classpath loader behind it.
pub struct IsolatedArtifact {
    backing: Arc<JarArtifactClassLoader>,
    loader: FilteringArtifactClassLoader,
}

impl IsolatedArtifact {
    /// The view other artifacts get.
    pub fn loader(&self) -> &FilteringArtifactClassLoader {
        &self.loader
    }

    pub fn backing(&self) -> &Arc<JarArtifactClassLoader> {
        &self.backing
    }

    /// Read the bytes behind a locator returned by [`Self::loader`].
    ///
    /// Service descriptors written for exported services live outside the
    /// classpath and are read from disk directly.
    pub fn read(&self, locator: &ResourceLocator) -> LoaderResult<Vec<u8>> {
        let exported = self
            .loader
            .exported_services()
            .iter()
            .any(|provider| provider.resource() == locator);
        match locator.to_file_path() {
            Some(path) if exported => Ok(std::fs::read(path)?),
            _ => self.backing.read_resource(locator),
        }
    }

    /// Dispose the wrapper, then the classpath loader it fronts.
    pub fn dispose(&self) {
        self.loader.dispose();
        self.backing.dispose();
    }
}

/// Bootstraps an isolated artifact from its configuration.
///
/// Opens the classpath, builds the visibility filter, writes one service
/// descriptor per exported service under `descriptor_dir` and puts the
/// filtering loader in front of the classpath loader.
pub fn build_filtering_loader(
    config: &ArtifactConfig,
    descriptor_dir: &Path,
) -> Result<IsolatedArtifact> {
    config.validate()?;

    let backing = Arc::new(
        JarArtifactClassLoader::builder(config.artifact_id.clone())
            .descriptor(config.descriptor())
            .classpath(config.classpath.iter().cloned())
            .lookup_policy(config.lookup_policy.clone())
            .build()?,
    );

    let filter = Arc::new(ArtifactClassLoaderFilter::new(
        config.exported_packages.iter().cloned(),
        config.exported_resources.iter().cloned(),
    ));

    let providers = ServiceDescriptorWriter::new(descriptor_dir).write_all(&config.exported_services)?;

    let class_loading = match config.verbose_classloading {
        Some(verbose_classloading) => ClassLoadingConfig {
            verbose_classloading,
        },
        None => ClassLoadingConfig::global(),
    };

    info!(
        artifact = %config.artifact_id,
        classpath = config.classpath.len(),
        services = providers.len(),
        "Assembled isolated artifact {}",
        backing.artifact_descriptor()
    );

    let loader = FilteringArtifactClassLoader::with_config(
        backing.clone(),
        filter,
        providers,
        class_loading,
    );
    Ok(IsolatedArtifact { backing, loader })
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(artiscope_core::logging::init_logging(component, to_stderr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use artiscope_api::{ClassLoader, LoaderError};
    use artiscope_core::ExportedService;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    fn create_jar(path: &Path) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();

        zip.start_file("com/api/Client.class", options).unwrap();
        zip.write_all(&[0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x34])
            .unwrap();
        zip.start_file("com/impl/Hidden.class", options).unwrap();
        zip.write_all(&[0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x34])
            .unwrap();
        zip.start_file("cfg/app.xml", options).unwrap();
        zip.write_all(b"<app/>").unwrap();

        zip.finish().unwrap();
    }

    fn config(jar: PathBuf) -> ArtifactConfig {
        ArtifactConfig {
            artifact_id: "plugin/demo".to_string(),
            name: "demo".to_string(),
            version: Some("1.0.0".to_string()),
            classpath: vec![jar],
            exported_packages: vec!["com.api".to_string()],
            exported_resources: vec!["cfg/app.xml".to_string()],
            exported_services: vec![
                ExportedService::new("com.svc.Driver", "com.impl.Driver").unwrap(),
            ],
            lookup_policy: Default::default(),
            verbose_classloading: Some(false),
        }
    }

    #[test]
    fn test_build_filtering_loader() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("demo.jar");
        create_jar(&jar);

        let artifact = build_filtering_loader(&config(jar), &dir.path().join("services")).unwrap();
        let loader = artifact.loader();

        assert_eq!(loader.artifact_id(), "plugin/demo");
        assert_eq!(loader.artifact_descriptor().to_string(), "demo:1.0.0");
        assert!(loader.load_class("com.api.Client").is_ok());
        assert!(matches!(
            loader.load_class("com.impl.Hidden"),
            Err(LoaderError::NotExported { .. })
        ));

        let app = loader.get_resource("cfg/app.xml").unwrap();
        assert_eq!(artifact.read(&app).unwrap(), b"<app/>");

        let driver = loader
            .get_resource("META-INF/services/com.svc.Driver")
            .unwrap();
        assert_eq!(artifact.read(&driver).unwrap(), b"com.impl.Driver\n");
        assert_ne!(loader.class_loader().id(), artifact.backing().id());

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        loader.add_shutdown_listener(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        artifact.dispose();
        assert!(loader.is_disposed());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_build_fails_on_missing_classpath() {
        let dir = tempdir().unwrap();
        let result = build_filtering_loader(
            &config(dir.path().join("missing.jar")),
            &dir.path().join("services"),
        );
        assert!(matches!(
            result,
            Err(artiscope_core::ArtiscopeError::Loader(LoaderError::Io(_)))
        ));
    }
}
