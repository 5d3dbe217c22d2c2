//! Error types for the simulation.

use crate::types::Vec3;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("position out of bounds: {position:?}")]
    OutOfBounds { position: Vec3 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no free spawn cell found after {attempts} attempts")]
    SpawnExhausted { attempts: u32 },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("other error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
