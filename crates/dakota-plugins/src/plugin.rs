//! Plugin lifecycle and shared response handling

use crate::error::PluginError;
use crate::Result;
use dakota_core::{params, results, ConfigRecord, Statistic};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A model that Dakota evaluates through `dakota_run_plugin`.
///
/// The broker creates one plugin per evaluation and drives it through
/// `setup`, `call`, `calculate` and `write`, in that order.
pub trait Plugin {
    /// Configure model inputs from the configuration record.
    ///
    /// `config.parameters_file` holds the evaluation's parameters file.
    fn setup(&mut self, config: &ConfigRecord) -> Result<()>;

    /// Run the model.
    fn call(&mut self) -> Result<()>;

    /// Read one model output series; `None` if absent or unreadable.
    fn load(&self, output_file: &Path) -> Option<Vec<f64>>;

    /// Reduce model output to one value per response, reading each
    /// response file through `load`.
    fn calculate(&mut self) -> Result<()>;

    /// Write the Dakota results file for this evaluation.
    fn write(&self, params_file: &Path, results_file: &Path) -> Result<()>;
}

/// Read whitespace-separated numbers, skipping `header_lines` lines.
///
/// Returns `None` when the file cannot be read or any token is not a number.
pub fn load_series(path: &Path, header_lines: usize) -> Option<Vec<f64>> {
    let text = fs::read_to_string(path).ok()?;
    text.lines()
        .skip(header_lines)
        .flat_map(str::split_whitespace)
        .map(|token| token.parse::<f64>().ok())
        .collect()
}

/// Response files, their statistics, and the computed values.
#[derive(Debug, Clone, Default)]
pub struct ResponseSet {
    files: Vec<PathBuf>,
    statistics: Vec<Statistic>,
    values: Vec<f64>,
}

impl ResponseSet {
    /// Pair each response file with its statistic.
    ///
    /// Statistic names are checked here so a bad name fails before the
    /// model runs. When the record lists response descriptors, all three
    /// lists must have the same length.
    pub fn from_config(config: &ConfigRecord) -> Result<Self> {
        let files = config.response_files();
        let names = config.response_statistics();

        if files.len() != names.len() {
            return Err(PluginError::InvalidConfig(format!(
                "{} response files but {} response statistics",
                files.len(),
                names.len()
            )));
        }
        if let Some(descriptors) = &config.response_descriptors {
            if descriptors.len() != files.len() {
                return Err(PluginError::InvalidConfig(format!(
                    "{} response descriptors but {} response files",
                    descriptors.len(),
                    files.len()
                )));
            }
        }

        let statistics = names
            .iter()
            .map(|name| name.parse::<Statistic>())
            .collect::<dakota_core::Result<Vec<_>>>()?;

        Ok(ResponseSet {
            files: files.iter().map(PathBuf::from).collect(),
            statistics,
            values: Vec::new(),
        })
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn statistics(&self) -> &[Statistic] {
        &self.statistics
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Paths of the response files under `output_dir`, in response order.
    pub fn paths(&self, output_dir: &Path) -> Vec<PathBuf> {
        self.files.iter().map(|file| output_dir.join(file)).collect()
    }

    /// Reduce one loaded series per response, in response order.
    ///
    /// A response whose series is `None` (or absent) becomes NaN; the
    /// others are unaffected.
    pub fn reduce(&mut self, output_dir: &Path, series: Vec<Option<Vec<f64>>>) {
        let mut series = series.into_iter();
        self.values = self
            .files
            .iter()
            .zip(&self.statistics)
            .map(|(file, statistic)| {
                let path = output_dir.join(file);
                match series.next().flatten() {
                    Some(series) => {
                        let value = statistic.compute(&series);
                        debug!(file = %path.display(), %statistic, value, "Computed response");
                        value
                    }
                    None => {
                        warn!(file = %path.display(), "Model output missing or unreadable, reporting NaN");
                        f64::NAN
                    }
                }
            })
            .collect();
    }

    /// Write computed values under the descriptors in `params_file`.
    pub fn write(&self, params_file: &Path, results_file: &Path) -> Result<()> {
        let descriptors = params::response_descriptors(params_file)?;
        results::write_results(results_file, &self.values, &descriptors)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dakota_core::DakotaError;
    use tempfile::TempDir;

    fn record(files: &[&str], stats: &[&str]) -> ConfigRecord {
        ConfigRecord {
            response_files: Some(files.iter().map(|s| s.to_string()).collect()),
            response_statistics: Some(stats.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn test_load_series_skips_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "h1\nh2\n0\n1\n2\n").unwrap();
        assert_eq!(load_series(&path, 2), Some(vec![0.0, 1.0, 2.0]));
    }

    #[test]
    fn test_load_series_multiple_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "header\n1.5 2.5\n3.5 4.5\n").unwrap();
        assert_eq!(load_series(&path, 1), Some(vec![1.5, 2.5, 3.5, 4.5]));
    }

    #[test]
    fn test_load_series_soft_failures() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_series(&dir.path().join("missing.txt"), 2), None);

        let path = dir.path().join("bad.txt");
        fs::write(&path, "h1\nh2\n1.0\nnot-a-number\n").unwrap();
        assert_eq!(load_series(&path, 2), None);
    }

    #[test]
    fn test_unknown_statistic_fails_at_setup() {
        let err = ResponseSet::from_config(&record(&["a.txt"], &["mode"])).unwrap_err();
        assert!(matches!(
            err,
            PluginError::Core(DakotaError::UnknownStatistic(_))
        ));
    }

    #[test]
    fn test_mismatched_lists_rejected() {
        assert!(matches!(
            ResponseSet::from_config(&record(&["a.txt", "b.txt"], &["mean"])),
            Err(PluginError::InvalidConfig(_))
        ));

        let mut config = record(&["a.txt"], &["mean"]);
        config.response_descriptors = Some(vec!["y1".to_string(), "y2".to_string()]);
        assert!(matches!(
            ResponseSet::from_config(&config),
            Err(PluginError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_output_is_nan_for_that_response_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "h1\nh2\n1\n3\n").unwrap();

        let mut responses =
            ResponseSet::from_config(&record(&["a.txt", "missing.txt"], &["mean", "max"])).unwrap();
        let series = responses
            .paths(dir.path())
            .iter()
            .map(|p| load_series(p, 2))
            .collect();
        responses.reduce(dir.path(), series);

        assert_eq!(responses.values()[0], 2.0);
        assert!(responses.values()[1].is_nan());
    }

    #[test]
    fn test_short_series_list_pads_with_nan() {
        let mut responses =
            ResponseSet::from_config(&record(&["a.txt", "b.txt"], &["sum", "sum"])).unwrap();
        responses.reduce(Path::new("."), vec![Some(vec![1.0, 2.0])]);

        assert_eq!(responses.values()[0], 3.0);
        assert!(responses.values()[1].is_nan());
    }

    #[test]
    fn test_write_uses_parameters_file_descriptors() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("out.txt"), "h1\nh2\n0\n1\n2\n").unwrap();
        let params = dir.path().join("params.in");
        fs::write(&params, "1 variables\n1.0 x1\n1 functions\n1 ASV_1:y1\n").unwrap();
        let results = dir.path().join("results.out");

        let mut responses = ResponseSet::from_config(&record(&["out.txt"], &["mean"])).unwrap();
        let series = vec![load_series(&dir.path().join("out.txt"), 2)];
        responses.reduce(dir.path(), series);
        responses.write(&params, &results).unwrap();

        assert_eq!(fs::read_to_string(&results).unwrap(), "1.0\ty1\n");
    }
}
