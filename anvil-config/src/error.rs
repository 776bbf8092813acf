//! Configuration loading errors.

use anvil_common::{LocatedError, NodeKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] LocatedError),

    #[error("configuration root must be a map, found a {0}")]
    NotAMap(NodeKind),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
