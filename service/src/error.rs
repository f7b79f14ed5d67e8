use thiserror::Error;
use verinum_registry::RegistryError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("configuration error: {0}")]
    Config(String),

    /// The service task has stopped; no further commands can be applied.
    #[error("registry service is not running")]
    NotRunning,

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
