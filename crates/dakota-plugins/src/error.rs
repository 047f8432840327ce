//! Error types for dakota-plugins

use dakota_core::DakotaError;
use thiserror::Error;

/// Errors raised while brokering one Dakota evaluation
#[derive(Error, Debug)]
pub enum PluginError {
    /// The configuration record names no plugin, or one not in the registry
    #[error("cannot resolve plugin: {0}")]
    PluginResolution(String),

    /// A plugin with this name is already registered
    #[error("plugin already registered: {0}")]
    DuplicatePlugin(String),

    /// The plugin's capability probe failed
    #[error("plugin {0} is not available (capability probe failed)")]
    PluginUnavailable(String),

    /// The configuration record does not satisfy the plugin
    #[error("invalid plugin configuration: {0}")]
    InvalidConfig(String),

    /// Template and model input file differ in line count
    #[error("template has {template_lines} lines but input file has {input_lines}")]
    TemplateMismatch {
        template_lines: usize,
        input_lines: usize,
    },

    /// External model command exited with a failure status
    #[error("command {command} failed with status {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parameters, configuration, statistics or results error
    #[error(transparent)]
    Core(#[from] DakotaError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_core_errors_pass_through() {
        let err: PluginError = DakotaError::ConfigNotFound(PathBuf::from("params.in")).into();
        assert!(err.to_string().contains("AC_1"));
    }

    #[test]
    fn test_command_failed_display() {
        let err = PluginError::CommandFailed {
            command: "hydrotrend".to_string(),
            code: Some(2),
            stderr: "missing HYDRO.IN".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "command hydrotrend failed with status Some(2): missing HYDRO.IN"
        );
    }
}
