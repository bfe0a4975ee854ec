use artiscope_api::LoaderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtiscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ArtiscopeError>;
