use crate::classpath::ClasspathEntry;
use crate::inspect::check_magic;
use artiscope_api::{
    ArtifactClassLoader, ArtifactDescriptor, ClassLoader, ClassLoaderLookupPolicy, ClassRef,
    LoadedClass, LoaderError, LoaderId, LoaderResult, ResourceLocator, ShutdownListener,
    class_resource_name,
};
use artiscope_core::loader::{ListenerSet, ParentDelegation};
use dashmap::DashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Backing loader over an ordered classpath of jars and directories.
pub struct JarArtifactClassLoader {
    id: LoaderId,
    artifact_id: String,
    descriptor: ArtifactDescriptor,
    classpath: Vec<ClasspathEntry>,
    defined: DashMap<String, ClassRef>,
    delegation: ParentDelegation,
    listeners: ListenerSet,
}

impl JarArtifactClassLoader {
    pub fn builder(artifact_id: impl Into<String>) -> JarArtifactClassLoaderBuilder {
        JarArtifactClassLoaderBuilder::new(artifact_id)
    }

    pub fn classpath(&self) -> impl Iterator<Item = &Path> {
        self.classpath.iter().map(ClasspathEntry::path)
    }

    /// Every entry name visible on the classpath, in classpath order.
    pub fn entries(&self) -> Vec<String> {
        self.classpath
            .iter()
            .flat_map(ClasspathEntry::entry_names)
            .collect()
    }

    /// Read the bytes behind a locator produced by this loader.
    pub fn read_resource(&self, locator: &ResourceLocator) -> LoaderResult<Vec<u8>> {
        if let Some((archive, entry)) = locator.jar_parts() {
            if let Some(owner) = self
                .classpath
                .iter()
                .find(|cp| matches!(cp, ClasspathEntry::Archive(_)) && cp.path() == archive)
            {
                return Ok(owner.read(&entry)?);
            }
        } else if let Some(path) = locator.to_file_path() {
            for cp in &self.classpath {
                if let (ClasspathEntry::Directory(root), Ok(relative)) =
                    (cp, path.strip_prefix(cp.path()))
                {
                    debug!(root = %root.display(), "Reading resource from directory");
                    return Ok(cp.read(&to_entry_name(relative))?);
                }
            }
        }

        Err(LoaderError::IllegalArgument(format!(
            "Locator {} does not belong to artifact '{}'",
            locator, self.artifact_id
        )))
    }

    fn locator_for(cp: &ClasspathEntry, name: &str) -> Option<ResourceLocator> {
        match cp {
            ClasspathEntry::Archive(_) => ResourceLocator::jar_entry(cp.path(), name),
            ClasspathEntry::Directory(root) => ResourceLocator::from_file_path(&root.join(name)),
        }
    }

    fn define(&self, name: &str) -> LoaderResult<ClassRef> {
        let resource = class_resource_name(name);
        let Some(cp) = self.classpath.iter().find(|cp| cp.contains(&resource)) else {
            return Err(LoaderError::class_not_found(name, &self.artifact_id));
        };

        let bytes = cp.read(&resource)?;
        check_magic(name, &bytes)?;
        let source = Self::locator_for(cp, &resource).ok_or_else(|| {
            LoaderError::Io(io::Error::other(format!(
                "Cannot build locator for {} in {}",
                resource,
                cp.path().display()
            )))
        })?;

        debug!(artifact = %self.artifact_id, class = name, %source, "Defining class");
        Ok(Arc::new(LoadedClass::new(
            name,
            self.id,
            self.artifact_id.clone(),
            source,
            bytes,
        )))
    }
}

fn strip_leading_slash(name: &str) -> &str {
    name.strip_prefix('/').unwrap_or(name)
}

fn to_entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

impl ClassLoader for JarArtifactClassLoader {
    fn id(&self) -> LoaderId {
        self.id
    }

    fn load_class(&self, name: &str) -> LoaderResult<ClassRef> {
        self.delegation
            .load_class(name, &self.artifact_id, || self.find_local_class(name))
    }

    fn get_resource(&self, name: &str) -> Option<ResourceLocator> {
        self.delegation
            .get_resource(name, || self.find_resource(name))
    }

    fn get_resources(&self, name: &str) -> LoaderResult<Vec<ResourceLocator>> {
        self.delegation
            .get_resources(name, || self.find_resources(name))
    }
}

impl ArtifactClassLoader for JarArtifactClassLoader {
    fn class_loader(&self) -> &dyn ClassLoader {
        self
    }

    fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    fn artifact_descriptor(&self) -> &ArtifactDescriptor {
        &self.descriptor
    }

    fn find_resource(&self, name: &str) -> Option<ResourceLocator> {
        let name = strip_leading_slash(name);
        self.classpath
            .iter()
            .find(|cp| cp.contains(name))
            .and_then(|cp| Self::locator_for(cp, name))
    }

    fn find_resources(&self, name: &str) -> LoaderResult<Vec<ResourceLocator>> {
        let name = strip_leading_slash(name);
        Ok(self
            .classpath
            .iter()
            .filter(|cp| cp.contains(name))
            .filter_map(|cp| Self::locator_for(cp, name))
            .collect())
    }

    fn find_local_class(&self, name: &str) -> LoaderResult<ClassRef> {
        if let Some(class) = self.defined.get(name) {
            return Ok(Arc::clone(class.value()));
        }

        // Concurrent definers of the same name may both read the bytes; the
        // first insert wins and everyone gets that definition.
        let class = self.define(name)?;
        Ok(self
            .defined
            .entry(name.to_string())
            .or_insert(class)
            .value()
            .clone())
    }

    fn find_local_resource(&self, name: &str) -> Option<ResourceLocator> {
        self.find_resource(name)
    }

    fn add_shutdown_listener(&self, listener: Arc<dyn ShutdownListener>) {
        self.listeners.add(listener);
    }

    fn lookup_policy(&self) -> Arc<ClassLoaderLookupPolicy> {
        self.delegation.policy()
    }

    fn dispose(&self) {
        self.listeners.run_once(&self.artifact_id);
        self.defined.clear();
    }
}

impl fmt::Display for JarArtifactClassLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JarArtifactClassLoader[{}]@{:x}", self.artifact_id, self.id)
    }
}

pub struct JarArtifactClassLoaderBuilder {
    artifact_id: String,
    descriptor: Option<ArtifactDescriptor>,
    classpath: Vec<PathBuf>,
    parent: Option<Arc<dyn ClassLoader>>,
    policy: ClassLoaderLookupPolicy,
}

impl JarArtifactClassLoaderBuilder {
    pub fn new(artifact_id: impl Into<String>) -> Self {
        Self {
            artifact_id: artifact_id.into(),
            descriptor: None,
            classpath: Vec::new(),
            parent: None,
            policy: ClassLoaderLookupPolicy::default(),
        }
    }

    pub fn descriptor(mut self, descriptor: ArtifactDescriptor) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    pub fn classpath_entry(mut self, path: impl Into<PathBuf>) -> Self {
        self.classpath.push(path.into());
        self
    }

    pub fn classpath(mut self, paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.classpath.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn parent(mut self, parent: Arc<dyn ClassLoader>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn lookup_policy(mut self, policy: ClassLoaderLookupPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Open every classpath entry. Fails on the first unreadable entry.
    pub fn build(self) -> LoaderResult<JarArtifactClassLoader> {
        let mut classpath = Vec::with_capacity(self.classpath.len());
        for path in &self.classpath {
            match ClasspathEntry::open(path) {
                Ok(entry) => {
                    if let ClasspathEntry::Archive(jar) = &entry {
                        debug!("Indexed {} entries in {}", jar.len(), path.display());
                    }
                    classpath.push(entry);
                }
                Err(e) => {
                    warn!("Failed to open classpath entry {:?}: {}", path, e);
                    return Err(e.into());
                }
            }
        }

        let descriptor = self
            .descriptor
            .unwrap_or_else(|| ArtifactDescriptor::new(self.artifact_id.clone()));
        Ok(JarArtifactClassLoader {
            id: LoaderId::next(),
            artifact_id: self.artifact_id,
            descriptor,
            classpath,
            defined: DashMap::new(),
            delegation: ParentDelegation::new(self.parent, Arc::new(self.policy)),
            listeners: ListenerSet::default(),
        })
    }
}
