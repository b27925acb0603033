//! Error types for the velo library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading a graph or planning a route.
#[derive(Error, Debug)]
pub enum VeloError {
    /// IO error when reading graph files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// One of the graph resources is missing from the graph directory.
    #[error("Graph file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// An attribute mask has a bit set above the known attribute count.
    #[error("Invalid attribute set: {bits:#018x} sets an unknown attribute bit")]
    InvalidAttributeSet { bits: u64 },

    /// Coordinates lie outside the bounding region covered by the graph.
    #[error("Coordinates out of bounds: e={e}, n={n}")]
    OutOfBounds { e: f64, n: f64 },

    /// A required configuration value was not provided.
    #[error("Missing configuration: {name} is not set")]
    MissingConfig { name: &'static str },

    /// A configuration value is outside its valid range.
    #[error("Invalid configuration: {name} cannot be {value}")]
    InvalidConfig { name: &'static str, value: f64 },

    /// A cost model name that matches no known model.
    #[error("Unknown cost model: {name}")]
    UnknownCostModel { name: String },
}

/// Result type alias using [`VeloError`].
pub type Result<T> = std::result::Result<T, VeloError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VeloError::InvalidAttributeSet { bits: 1 << 63 };
        assert!(err.to_string().contains("0x8000000000000000"));

        let err = VeloError::OutOfBounds { e: 0.0, n: 1.5 };
        assert!(err.to_string().contains("n=1.5"));

        let err = VeloError::FileNotFound {
            path: PathBuf::from("graph/nodes.bin"),
        };
        assert!(err.to_string().contains("nodes.bin"));

        let err = VeloError::MissingConfig {
            name: "VELO_GRAPH_DIR",
        };
        assert!(err.to_string().contains("VELO_GRAPH_DIR"));

        let err = VeloError::InvalidConfig {
            name: "VELO_PROFILE_STEP",
            value: -3.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration: VELO_PROFILE_STEP cannot be -3"
        );

        let err = VeloError::UnknownCostModel {
            name: "tandem".into(),
        };
        assert_eq!(err.to_string(), "Unknown cost model: tandem");
    }
}
