//! Analysis-driver broker
//!
//! Dakota runs `dakota_run_plugin <params> <results>` once per evaluation.
//! The broker finds the configuration record named in the parameters
//! file, resolves the plugin it names, and drives that plugin through
//! one evaluation.

use crate::error::PluginError;
use crate::registry::PluginRegistry;
use crate::Result;
use dakota_core::{params, ConfigRecord};
use std::path::Path;
use tracing::{debug, info};

/// Dispatches evaluations to plugins from a registry.
pub struct Broker {
    registry: PluginRegistry,
}

impl Default for Broker {
    fn default() -> Self {
        Broker::new(PluginRegistry::builtin())
    }
}

impl Broker {
    pub fn new(registry: PluginRegistry) -> Self {
        Broker { registry }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Run one evaluation and write its results file.
    ///
    /// Nothing is written to `results_file` unless every step succeeds.
    pub fn run_evaluation(&self, params_file: &Path, results_file: &Path) -> Result<()> {
        let config_file = params::configuration_file(params_file)?;
        debug!(
            params = %params_file.display(),
            config = %config_file.display(),
            "Found configuration file"
        );

        let mut config = ConfigRecord::load(&config_file)?;
        let name = config
            .plugin_name()
            .map(str::to_string)
            .ok_or_else(|| {
                PluginError::PluginResolution(format!(
                    "no plugin named in {}",
                    config_file.display()
                ))
            })?;
        let entry = self
            .registry
            .get(&name)
            .ok_or_else(|| PluginError::PluginResolution(format!("unknown plugin '{name}'")))?;

        if !(entry.probe)() {
            return Err(PluginError::PluginUnavailable(name));
        }
        let mut plugin = (entry.factory)();
        info!(plugin = %name, params = %params_file.display(), "Starting evaluation");

        config.parameters_file = Some(params_file.to_path_buf());
        config.results_file = Some(results_file.to_path_buf());

        plugin.setup(&config)?;
        debug!(plugin = %name, "Setup complete");
        plugin.call()?;
        debug!(plugin = %name, "Model run complete");
        plugin.calculate()?;
        plugin.write(params_file, results_file)?;

        info!(plugin = %name, results = %results_file.display(), "Evaluation complete");
        Ok(())
    }
}

/// Run one evaluation with the built-in plugins.
pub fn run_evaluation(params_file: &Path, results_file: &Path) -> Result<()> {
    Broker::default().run_evaluation(params_file, results_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dakota_core::DakotaError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_parameters_file() {
        let dir = TempDir::new().unwrap();
        let err = run_evaluation(&dir.path().join("params.in"), &dir.path().join("results.out"))
            .unwrap_err();
        assert!(matches!(err, PluginError::Core(DakotaError::Io(_))));
    }

    #[test]
    fn test_record_without_plugin() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("dakota.yaml");
        fs::write(&config, "method: sampling\n").unwrap();
        let params = dir.path().join("params.in");
        fs::write(&params, format!("{} AC_1:x\n", config.display())).unwrap();

        let err = run_evaluation(&params, &dir.path().join("results.out")).unwrap_err();
        assert!(matches!(err, PluginError::PluginResolution(_)));
    }

    #[test]
    fn test_record_with_empty_plugin_and_component() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("dakota.yaml");
        fs::write(&config, "plugin: ''\ncomponent: ''\n").unwrap();
        let params = dir.path().join("params.in");
        fs::write(&params, format!("{} AC_1:x\n", config.display())).unwrap();

        let err = run_evaluation(&params, &dir.path().join("results.out")).unwrap_err();
        assert!(matches!(err, PluginError::PluginResolution(_)));
    }

    #[test]
    fn test_missing_configuration_record() {
        let dir = TempDir::new().unwrap();
        let params = dir.path().join("params.in");
        fs::write(&params, "/nonexistent/dakota.yaml AC_1:hydrotrend\n").unwrap();

        let err = run_evaluation(&params, &dir.path().join("results.out")).unwrap_err();
        assert!(matches!(err, PluginError::Core(DakotaError::ConfigLoad { .. })));
    }
}
