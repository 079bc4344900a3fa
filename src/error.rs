//! Error types for place loading and resolution.

use thiserror::Error;

/// Errors raised while loading a place dataset or resolving a coordinate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// A polygon with fewer than 3 vertices reached the containment test
    #[error("polygon must have at least 3 points, got {vertices}")]
    InvalidGeometry { vertices: usize },

    /// The dataset resource could not be found or read
    #[error("dataset {dataset} unavailable: {reason}")]
    DatasetUnavailable { dataset: String, reason: String },

    /// The dataset resource was read but is not a valid place list
    #[error("failed to parse dataset {dataset}: {reason}")]
    ParseError { dataset: String, reason: String },

    /// A single dataset entry was rejected; the rest of the load continues
    #[error("skipping entry #{index} ({name:?}): {reason}")]
    MalformedEntry {
        index: usize,
        name: String,
        reason: String,
    },

    /// Caller supplied a NaN or infinite coordinate
    #[error("coordinate ({x}, {y}) is not finite")]
    InvalidInput { x: f64, y: f64 },
}

pub type Result<T> = std::result::Result<T, GeoError>;
