//! Error types for dakota-core

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building, serializing or running a Dakota experiment
#[derive(Error, Debug)]
pub enum DakotaError {
    /// The parameters file has no analysis-component line
    #[error("no configuration file marker (AC_1) in parameters file: {0}")]
    ConfigNotFound(PathBuf),

    /// The configuration record could not be read or parsed
    #[error("failed to load configuration file {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    /// The configuration record is inconsistent
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A block setter rejected a value
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// No block implementation with this name
    #[error("unknown {block} type: {name}")]
    UnknownBlock { block: String, name: String },

    /// The parameters file does not follow Dakota's standard layout
    #[error("malformed parameters file: {0}")]
    ParametersFormat(String),

    /// Number of response values differs from the number of descriptors
    #[error("{values} response values for {descriptors} response descriptors")]
    ResultsMismatch { values: usize, descriptors: usize },

    /// Statistic name is not one of the supported reductions
    #[error("unknown statistic: {0}")]
    UnknownStatistic(String),

    /// Dakota executable could not be found
    #[error("Dakota is not installed or not in PATH")]
    DakotaNotFound,

    /// Dakota exited with a failure status
    #[error("Dakota exited with status {code:?}: {output}")]
    ToolkitFailed { code: Option<i32>, output: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl DakotaError {
    pub(crate) fn invalid_value(field: &str, reason: impl Into<String>) -> Self {
        DakotaError::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_block(block: &str, name: &str) -> Self {
        DakotaError::UnknownBlock {
            block: block.to_string(),
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_display() {
        let err = DakotaError::ConfigNotFound(PathBuf::from("params.in"));
        let msg = err.to_string();
        assert!(msg.contains("AC_1"));
        assert!(msg.contains("params.in"));
    }

    #[test]
    fn test_invalid_value_display() {
        let err = DakotaError::invalid_value("samples", "must be positive");
        assert_eq!(err.to_string(), "invalid value for samples: must be positive");
    }

    #[test]
    fn test_results_mismatch_display() {
        let err = DakotaError::ResultsMismatch {
            values: 2,
            descriptors: 3,
        };
        assert_eq!(err.to_string(), "2 response values for 3 response descriptors");
    }

    #[test]
    fn test_unknown_block_display() {
        let err = DakotaError::unknown_block("method", "simplex");
        assert_eq!(err.to_string(), "unknown method type: simplex");
    }
}
