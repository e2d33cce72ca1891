use thiserror::Error;
use crate::catalog::CatalogError;
use super::ConfigError;

/// Failures starting or stopping the market system.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("Actor task failed: {0}")]
    ActorFailed(String),
}
