// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PartitionError {
    #[error("Could not create a valid partition in {iterations} tries: {reason}")]
    GenerationExhausted { iterations: usize, reason: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Unsupported geometry type: {kind}")]
    UnsupportedGeometry { kind: String },

    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    #[error("Triangulation failed: {reason}")]
    Triangulation { reason: String },

    #[error("GeoJSON could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<spade::InsertionError> for PartitionError {
    fn from(err: spade::InsertionError) -> Self {
        PartitionError::Triangulation {
            reason: format!("{:?}", err),
        }
    }
}

pub type PartitionResult<T> = Result<T, PartitionError>;
