//! Error types for the simulation library and its configuration.

use thiserror::Error;

/// Rejected mutation of the cluster model. The model is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("cluster index {index} is out of range ({len} clusters)")]
    ClusterOutOfRange { index: usize, len: usize },
    #[error("rule index {index} is out of range ({len} rules)")]
    RuleOutOfRange { index: usize, len: usize },
}

/// Invalid command line or startup configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("window size must be positive, got {width}x{height}")]
    InvalidWindowSize { width: u32, height: u32 },
    #[error("{what} count must be at least 1")]
    EmptyPopulation { what: &'static str },
    #[error("maximum time step must be positive, got {0}")]
    InvalidMaxStep(f32),
}
