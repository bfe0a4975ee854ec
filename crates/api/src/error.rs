use crate::filter::ClassLoaderFilter;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("Class '{class_name}' not found in classloader for artifact '{artifact_id}'")]
    ClassNotFound {
        class_name: String,
        artifact_id: String,
    },
    #[error(
        "Class '{class_name}' not found in classloader for artifact '{artifact_id}' (not exported by filter {filter:?})"
    )]
    NotExported {
        class_name: String,
        artifact_id: String,
        filter: Arc<dyn ClassLoaderFilter>,
    },
    #[error("Invalid class definition for '{class_name}': {reason}")]
    InvalidClass { class_name: String, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid argument: {0}")]
    IllegalArgument(String),
}

impl LoaderError {
    /// True for failures that callers should treat as "no such class".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LoaderError::ClassNotFound { .. } | LoaderError::NotExported { .. }
        )
    }

    pub fn class_not_found(class_name: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        LoaderError::ClassNotFound {
            class_name: class_name.into(),
            artifact_id: artifact_id.into(),
        }
    }
}

pub type LoaderResult<T> = std::result::Result<T, LoaderError>;
