//! Error types for loading a knowledge base.

use crate::engine::MIN_LOAD_FACTOR;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid [`Options`](crate::Options).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("initial capacity must be at least 1")]
    ZeroCapacity,

    #[error("max load factor must lie strictly between 0 and 1, got {0}")]
    LoadFactor(f64),

    #[error("max load factor must be at least {min}, got {0}", min = MIN_LOAD_FACTOR)]
    LoadFactorTooSmall(f64),
}

/// Failure to build a [`Session`](crate::Session) from a file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source file could not be opened or read.
    #[error("could not open {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
