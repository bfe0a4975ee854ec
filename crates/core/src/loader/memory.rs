//! Table-backed artifact loader.
//!
//! Holds class bytes and resource locators in memory. Used to assemble
//! artifacts programmatically and as the reference backing loader in tests.

use super::delegation::{ListenerSet, ParentDelegation};
use artiscope_api::{
    ArtifactClassLoader, ArtifactDescriptor, ClassLoader, ClassLoaderLookupPolicy, ClassRef,
    LoadedClass, LoaderError, LoaderId, LoaderResult, ResourceLocator, ShutdownListener,
};
use dashmap::DashMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

struct ClassEntry {
    source: ResourceLocator,
    bytes: Arc<[u8]>,
}

pub struct InMemoryArtifactClassLoader {
    id: LoaderId,
    artifact_id: String,
    descriptor: ArtifactDescriptor,
    classes: HashMap<String, ClassEntry>,
    resources: HashMap<String, Vec<ResourceLocator>>,
    defined: DashMap<String, ClassRef>,
    delegation: ParentDelegation,
    listeners: ListenerSet,
}

impl InMemoryArtifactClassLoader {
    pub fn builder(artifact_id: impl Into<String>) -> InMemoryArtifactClassLoaderBuilder {
        InMemoryArtifactClassLoaderBuilder::new(artifact_id)
    }

    /// Number of classes defined so far.
    pub fn defined_class_count(&self) -> usize {
        self.defined.len()
    }

    fn strip_leading_slash(name: &str) -> &str {
        name.strip_prefix('/').unwrap_or(name)
    }
}

impl ClassLoader for InMemoryArtifactClassLoader {
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

impl ArtifactClassLoader for InMemoryArtifactClassLoader {
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
        self.resources
            .get(Self::strip_leading_slash(name))
            .and_then(|locators| locators.first().cloned())
    }

    fn find_resources(&self, name: &str) -> LoaderResult<Vec<ResourceLocator>> {
        Ok(self
            .resources
            .get(Self::strip_leading_slash(name))
            .cloned()
            .unwrap_or_default())
    }

    fn find_local_class(&self, name: &str) -> LoaderResult<ClassRef> {
        if let Some(class) = self.defined.get(name) {
            return Ok(Arc::clone(class.value()));
        }

        let entry = self
            .classes
            .get(name)
            .ok_or_else(|| LoaderError::class_not_found(name, &self.artifact_id))?;

        // The entry guard locks only this name's shard; racing definers get the first winner.
        let class = self
            .defined
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!(artifact = %self.artifact_id, class = name, "Defining class");
                Arc::new(LoadedClass::new(
                    name,
                    self.id,
                    self.artifact_id.clone(),
                    entry.source.clone(),
                    Arc::clone(&entry.bytes),
                ))
            })
            .value()
            .clone();
        Ok(class)
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

impl fmt::Display for InMemoryArtifactClassLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InMemoryArtifactClassLoader[{}]@{:x}", self.artifact_id, self.id)
    }
}

pub struct InMemoryArtifactClassLoaderBuilder {
    artifact_id: String,
    descriptor: Option<ArtifactDescriptor>,
    classes: HashMap<String, ClassEntry>,
    resources: HashMap<String, Vec<ResourceLocator>>,
    parent: Option<Arc<dyn ClassLoader>>,
    policy: ClassLoaderLookupPolicy,
}

impl InMemoryArtifactClassLoaderBuilder {
    pub fn new(artifact_id: impl Into<String>) -> Self {
        Self {
            artifact_id: artifact_id.into(),
            descriptor: None,
            classes: HashMap::new(),
            resources: HashMap::new(),
            parent: None,
            policy: ClassLoaderLookupPolicy::default(),
        }
    }

    pub fn descriptor(mut self, descriptor: ArtifactDescriptor) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    /// Register class bytes under a fully-qualified name.
    pub fn class(
        mut self,
        name: impl Into<String>,
        source: ResourceLocator,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        self.classes.insert(
            name.into(),
            ClassEntry {
                source,
                bytes: bytes.into(),
            },
        );
        self
    }

    /// Register a resource; repeated names accumulate in order.
    pub fn resource(mut self, name: impl Into<String>, locator: ResourceLocator) -> Self {
        let name: String = name.into();
        self.resources
            .entry(InMemoryArtifactClassLoader::strip_leading_slash(&name).to_string())
            .or_default()
            .push(locator);
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

    pub fn build(self) -> InMemoryArtifactClassLoader {
        let descriptor = self
            .descriptor
            .unwrap_or_else(|| ArtifactDescriptor::new(self.artifact_id.clone()));
        InMemoryArtifactClassLoader {
            id: LoaderId::next(),
            artifact_id: self.artifact_id,
            descriptor,
            classes: self.classes,
            resources: self.resources,
            defined: DashMap::new(),
            delegation: ParentDelegation::new(self.parent, Arc::new(self.policy)),
            listeners: ListenerSet::default(),
        }
    }
}
