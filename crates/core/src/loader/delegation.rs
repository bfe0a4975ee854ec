//! Building blocks shared by backing loaders: parent delegation and shutdown
//! listener bookkeeping.

use artiscope_api::{
    ClassLoader, ClassLoaderLookupPolicy, ClassRef, LoaderError, LoaderResult, LookupStrategy,
    ResourceLocator, ShutdownListener,
};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Applies a [`ClassLoaderLookupPolicy`] between a loader and its parent.
pub struct ParentDelegation {
    parent: Option<Arc<dyn ClassLoader>>,
    policy: Arc<ClassLoaderLookupPolicy>,
}

impl ParentDelegation {
    pub fn new(parent: Option<Arc<dyn ClassLoader>>, policy: Arc<ClassLoaderLookupPolicy>) -> Self {
        Self { parent, policy }
    }

    pub fn parent(&self) -> Option<&Arc<dyn ClassLoader>> {
        self.parent.as_ref()
    }

    pub fn policy(&self) -> Arc<ClassLoaderLookupPolicy> {
        Arc::clone(&self.policy)
    }

    /// Resolve `name` through the parent and `local` in policy order.
    ///
    /// Only "not found" failures move the search on; any other error is
    /// returned as is.
    pub fn load_class(
        &self,
        name: &str,
        artifact_id: &str,
        local: impl Fn() -> LoaderResult<ClassRef>,
    ) -> LoaderResult<ClassRef> {
        let strategy = self.policy.strategy_for(name);
        let parent = match (&self.parent, strategy) {
            (Some(parent), LookupStrategy::ParentFirst | LookupStrategy::ChildFirst) => parent,
            _ => return local(),
        };

        match strategy {
            LookupStrategy::ParentFirst => {
                Self::first_found(name, artifact_id, strategy, || parent.load_class(name), &local)
            }
            _ => Self::first_found(name, artifact_id, strategy, &local, || {
                parent.load_class(name)
            }),
        }
    }

    fn first_found(
        name: &str,
        artifact_id: &str,
        strategy: LookupStrategy,
        first: impl FnOnce() -> LoaderResult<ClassRef>,
        second: impl FnOnce() -> LoaderResult<ClassRef>,
    ) -> LoaderResult<ClassRef> {
        match first() {
            Err(err) if err.is_not_found() => {
                debug!(artifact = artifact_id, class = name, ?strategy, "Delegating class lookup");
                second().map_err(|err| {
                    if err.is_not_found() {
                        LoaderError::class_not_found(name, artifact_id)
                    } else {
                        err
                    }
                })
            }
            result => result,
        }
    }

    /// Parent resource first, then `local`.
    pub fn get_resource(
        &self,
        name: &str,
        local: impl FnOnce() -> Option<ResourceLocator>,
    ) -> Option<ResourceLocator> {
        self.parent
            .as_ref()
            .and_then(|parent| parent.get_resource(name))
            .or_else(local)
    }

    /// Parent resources followed by local ones.
    pub fn get_resources(
        &self,
        name: &str,
        local: impl FnOnce() -> LoaderResult<Vec<ResourceLocator>>,
    ) -> LoaderResult<Vec<ResourceLocator>> {
        let mut resources = match &self.parent {
            Some(parent) => parent.get_resources(name)?,
            None => Vec::new(),
        };
        resources.extend(local()?);
        Ok(resources)
    }
}

/// Shutdown listeners run once, in registration order, on dispose.
#[derive(Default)]
pub struct ListenerSet {
    listeners: Mutex<Vec<Arc<dyn ShutdownListener>>>,
}

impl ListenerSet {
    pub fn add(&self, listener: Arc<dyn ShutdownListener>) {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain and run the registered listeners. Later calls run only listeners
    /// registered since the previous drain.
    pub fn run_once(&self, artifact_id: &str) {
        let drained = {
            let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *listeners)
        };
        if drained.is_empty() {
            return;
        }
        debug!(
            artifact = artifact_id,
            count = drained.len(),
            "Running shutdown listeners"
        );
        for listener in drained {
            listener.execute();
        }
    }
}
