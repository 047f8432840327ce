//! YAML configuration record
//!
//! The record is the flat mapping written next to a Dakota input file. It
//! names the plugin and block kinds, carries every block setting at the top
//! level, and is read back by `dakota_run_plugin` for each evaluation.
//! Every key is optional so hand-written partial files load.

use crate::blocks::Levels;
use crate::error::DakotaError;
use crate::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIGURATION_FILE: &str = "dakota.yaml";
pub const DEFAULT_INPUT_FILE: &str = "dakota.in";
pub const DEFAULT_OUTPUT_FILE: &str = "dakota.out";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigRecord {
    // Run settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    /// Older name for `plugin`; records often carry both, one left empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_directory: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_file: Option<PathBuf>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub auxiliary_files: Option<Vec<PathBuf>>,

    // Block selectors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<String>,

    // Environment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<String>,

    // Method
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub convergence_tolerance: Option<f64>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub final_point: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_steps: Option<u32>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub steps_per_variable: Option<Vec<u32>>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub step_vector: Option<Vec<f64>>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub partitions: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability_levels: Option<Levels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_levels: Option<Levels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variance_based_decomp: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basis_polynomial_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quadrature_order: Option<u32>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub dimension_preference: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_pointer: Option<String>,

    // Variables
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub descriptors: Option<Vec<String>>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub initial_point: Option<Vec<f64>>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub lower_bounds: Option<Vec<f64>>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub upper_bounds: Option<Vec<f64>>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub means: Option<Vec<f64>>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub std_deviations: Option<Vec<f64>>,

    // Interface
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_driver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asynchronous: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_concurrency: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_directory: Option<String>,

    // Responses
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub response_descriptors: Option<Vec<String>>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub response_files: Option<Vec<String>>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub response_statistics: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradients: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hessians: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

/// Accept either a scalar or a sequence, producing a sequence.
fn one_or_many<'de, D, T>(deserializer: D) -> std::result::Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value = Option::<OneOrMany<T>>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        OneOrMany::One(item) => vec![item],
        OneOrMany::Many(items) => items,
    }))
}

impl ConfigRecord {
    /// Parse a record from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a record from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let load_error = |reason: String| DakotaError::ConfigLoad {
            path: path.to_path_buf(),
            reason,
        };

        let text = fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        let record = serde_yaml::from_str(&text).map_err(|e| load_error(e.to_string()))?;
        debug!(path = %path.display(), "Loaded configuration record");
        Ok(record)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the record as YAML, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_yaml_string()?)?;
        debug!(path = %path.display(), "Wrote configuration record");
        Ok(())
    }

    /// Plugin named by the record: `plugin`, else `component`, ignoring
    /// empty values.
    pub fn plugin_name(&self) -> Option<&str> {
        [&self.plugin, &self.component]
            .into_iter()
            .filter_map(|name| name.as_deref())
            .find(|name| !name.is_empty())
    }

    /// Response files, or an empty list when unset.
    pub fn response_files(&self) -> &[String] {
        self.response_files.as_deref().unwrap_or_default()
    }

    /// Response statistics, or an empty list when unset.
    pub fn response_statistics(&self) -> &[String] {
        self.response_statistics.as_deref().unwrap_or_default()
    }

    pub fn auxiliary_files(&self) -> &[PathBuf] {
        self.auxiliary_files.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_record_loads_with_defaults() {
        let record = ConfigRecord::from_yaml_str("method: sampling\nsamples: 20\n").unwrap();
        assert_eq!(record.method.as_deref(), Some("sampling"));
        assert_eq!(record.samples, Some(20));
        assert!(record.plugin.is_none());
        assert!(record.response_files().is_empty());
    }

    #[test]
    fn test_scalar_strings_coerced_to_sequences() {
        let record = ConfigRecord::from_yaml_str(
            "descriptors: T\nresponse_descriptors: Qs_median\nresponse_files: HYDROASCII.QS\nresponse_statistics: median\nauxiliary_files: HYDRO0.HYPS\n",
        )
        .unwrap();
        assert_eq!(record.descriptors, Some(vec!["T".to_string()]));
        assert_eq!(record.response_descriptors, Some(vec!["Qs_median".to_string()]));
        assert_eq!(record.response_files(), ["HYDROASCII.QS".to_string()]);
        assert_eq!(record.response_statistics(), ["median".to_string()]);
        assert_eq!(record.auxiliary_files(), [PathBuf::from("HYDRO0.HYPS")]);
    }

    #[test]
    fn test_scalar_numbers_coerced_to_sequences() {
        let record = ConfigRecord::from_yaml_str("partitions: 5\nfinal_point: 2\n").unwrap();
        assert_eq!(record.partitions, Some(vec![5]));
        assert_eq!(record.final_point, Some(vec![2.0]));
    }

    #[test]
    fn test_component_names_plugin() {
        let record = ConfigRecord::from_yaml_str("component: hydrotrend\n").unwrap();
        assert!(record.plugin.is_none());
        assert_eq!(record.plugin_name(), Some("hydrotrend"));
    }

    #[test]
    fn test_plugin_and_empty_component_both_present() {
        let record = ConfigRecord::from_yaml_str("component: ''\nplugin: hydrotrend\n").unwrap();
        assert_eq!(record.plugin_name(), Some("hydrotrend"));

        let record = ConfigRecord::from_yaml_str("plugin: ''\ncomponent: hydrotrend\n").unwrap();
        assert_eq!(record.plugin_name(), Some("hydrotrend"));
    }

    #[test]
    fn test_plugin_name_empty_values() {
        let record = ConfigRecord::from_yaml_str("plugin: ''\ncomponent: ''\n").unwrap();
        assert_eq!(record.plugin_name(), None);
        assert_eq!(ConfigRecord::default().plugin_name(), None);
    }

    #[test]
    fn test_nested_levels() {
        let record =
            ConfigRecord::from_yaml_str("probability_levels: [[0.1, 0.9], [0.2, 0.8]]\n").unwrap();
        assert_eq!(
            record.probability_levels,
            Some(Levels::PerResponse(vec![vec![0.1, 0.9], vec![0.2, 0.8]]))
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dakota.yaml");

        let record = ConfigRecord {
            plugin: Some("hydrotrend".to_string()),
            response_descriptors: Some(vec!["Qs_median".to_string()]),
            seed: Some(17),
            ..Default::default()
        };
        record.save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("plugin: hydrotrend"));
        assert!(!text.contains("method"));

        let loaded = ConfigRecord::load(&path).unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConfigRecord::load(Path::new("/nonexistent/dakota.yaml")).unwrap_err();
        assert!(matches!(err, DakotaError::ConfigLoad { .. }));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dakota.yaml");
        fs::write(&path, "samples: [unterminated\n").unwrap();
        let err = ConfigRecord::load(&path).unwrap_err();
        assert!(matches!(err, DakotaError::ConfigLoad { .. }));
    }
}
