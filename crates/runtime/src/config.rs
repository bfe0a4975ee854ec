//! Artifact configuration documents.

use artiscope_api::{ArtifactDescriptor, ClassLoaderLookupPolicy};
use artiscope_core::{ArtiscopeError, ExportedService, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything needed to assemble one isolated artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactConfig {
    pub artifact_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub classpath: Vec<PathBuf>,
    #[serde(default)]
    pub exported_packages: Vec<String>,
    #[serde(default)]
    pub exported_resources: Vec<String>,
    #[serde(default)]
    pub exported_services: Vec<ExportedService>,
    #[serde(default)]
    pub lookup_policy: ClassLoaderLookupPolicy,
    /// Overrides the process-wide verbose flag when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose_classloading: Option<bool>,
}

impl ArtifactConfig {
    /// Read and validate a JSON document. Relative classpath entries are
    /// resolved against the directory holding the file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: ArtifactConfig = serde_json::from_str(&content)?;

        if let Some(base) = path.parent() {
            config.classpath = config
                .classpath
                .into_iter()
                .map(|entry| {
                    if entry.is_relative() {
                        base.join(entry)
                    } else {
                        entry
                    }
                })
                .collect();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.artifact_id.trim().is_empty() {
            return Err(ArtiscopeError::Config(
                "artifact_id cannot be empty".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(ArtiscopeError::Config(format!(
                "Artifact '{}' has an empty name",
                self.artifact_id
            )));
        }
        if self.classpath.is_empty() {
            return Err(ArtiscopeError::Config(format!(
                "Artifact '{}' has an empty classpath",
                self.artifact_id
            )));
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = self.classpath.iter().find(|entry| !seen.insert(*entry)) {
            return Err(ArtiscopeError::Config(format!(
                "Classpath entry {} is listed twice",
                duplicate.display()
            )));
        }

        if let Some(package) = self
            .exported_packages
            .iter()
            .find(|package| package.trim().is_empty() || package.ends_with('.'))
        {
            return Err(ArtiscopeError::Config(format!(
                "Invalid exported package '{}'",
                package
            )));
        }
        Ok(())
    }

    pub fn descriptor(&self) -> ArtifactDescriptor {
        let descriptor = ArtifactDescriptor::new(self.name.clone());
        match &self.version {
            Some(version) => descriptor.with_version(version.clone()),
            None => descriptor,
        }
    }
}
