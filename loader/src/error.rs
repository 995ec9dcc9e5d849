//! Errors from reading a system file.

use simulator::SimError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not parse system file: {0}")]
    Parse(#[from] json5::Error),

    #[error("No star entry in solar system file")]
    MissingStar,

    #[error("No bodies entry in solar system file")]
    MissingBodies,

    #[error("No prefab body named {0}")]
    UnknownPrefab(String),

    #[error("Could not build the system: {0}")]
    Build(#[from] SimError),
}
