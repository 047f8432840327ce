//! HydroTrend plugin
//!
//! Runs the HydroTrend river-basin model for one evaluation. The input
//! file `HYDRO.IN` is built from the configured template, and HydroTrend
//! reads it with the hypsometry file from `HYDRO_IN/`, writing output
//! series to `HYDRO_OUTPUT/`. Both directories live in the evaluation's
//! work directory.

use crate::error::PluginError;
use crate::plugin::{load_series, Plugin, ResponseSet};
use crate::template::expand_template_file;
use crate::Result;
use dakota_core::{params, ConfigRecord};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Registry name of this plugin.
pub const PLUGIN_NAME: &str = "hydrotrend";

const PROGRAM: &str = "hydrotrend";
const INPUT_DIR: &str = "HYDRO_IN";
const OUTPUT_DIR: &str = "HYDRO_OUTPUT";
const INPUT_FILE: &str = "HYDRO.IN";

/// Header lines at the top of each HydroTrend ASCII output file.
const OUTPUT_HEADER_LINES: usize = 2;

/// Whether `hydrotrend --version` runs successfully.
pub fn is_installed() -> bool {
    Command::new(PROGRAM)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[derive(Debug, Clone)]
pub struct HydroTrend {
    program: String,
    work_dir: PathBuf,
    responses: ResponseSet,
}

impl Default for HydroTrend {
    fn default() -> Self {
        HydroTrend {
            program: PROGRAM.to_string(),
            work_dir: PathBuf::from("."),
            responses: ResponseSet::default(),
        }
    }
}

impl HydroTrend {
    /// Use another executable in place of `hydrotrend`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn input_dir(&self) -> PathBuf {
        self.work_dir.join(INPUT_DIR)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.work_dir.join(OUTPUT_DIR)
    }

    pub fn input_file(&self) -> PathBuf {
        self.work_dir.join(INPUT_FILE)
    }

    pub fn responses(&self) -> &ResponseSet {
        &self.responses
    }

    /// Template and hypsometry file from the record.
    fn setup_files(&mut self, config: &ConfigRecord) -> Result<(PathBuf, PathBuf)> {
        let template = config.template_file.clone().ok_or_else(|| {
            PluginError::InvalidConfig("hydrotrend requires template_file".to_string())
        })?;
        let hypsometry = match config.auxiliary_files() {
            [file] => file.clone(),
            files => {
                return Err(PluginError::InvalidConfig(format!(
                    "hydrotrend takes one auxiliary (hypsometry) file, got {}",
                    files.len()
                )))
            }
        };

        self.responses = ResponseSet::from_config(config)?;
        Ok((template, hypsometry))
    }

    fn setup_directories(&self) -> Result<()> {
        fs::create_dir_all(self.input_dir())?;
        fs::create_dir_all(self.output_dir())?;
        Ok(())
    }
}

impl Plugin for HydroTrend {
    fn setup(&mut self, config: &ConfigRecord) -> Result<()> {
        let params_file = config.parameters_file.as_deref().ok_or_else(|| {
            PluginError::InvalidConfig("no parameters file for this evaluation".to_string())
        })?;
        self.work_dir = match params_file.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (template, hypsometry) = self.setup_files(config)?;
        self.setup_directories()?;

        let variables = params::variables(params_file)?;
        expand_template_file(&template, &variables, &self.input_file())?;

        fs::copy(self.input_file(), self.input_dir().join(INPUT_FILE))?;
        let hypsometry_name = hypsometry.file_name().ok_or_else(|| {
            PluginError::InvalidConfig(format!(
                "hypsometry file has no file name: {}",
                hypsometry.display()
            ))
        })?;
        fs::copy(&hypsometry, self.input_dir().join(hypsometry_name))?;

        info!(
            work_dir = %self.work_dir.display(),
            variables = variables.len(),
            "HydroTrend inputs ready"
        );
        Ok(())
    }

    fn call(&mut self) -> Result<()> {
        debug!(program = %self.program, "Calling HydroTrend");
        let output = Command::new(&self.program)
            .arg("--in-dir")
            .arg(self.input_dir())
            .arg("--out-dir")
            .arg(self.output_dir())
            .output()?;

        if !output.status.success() {
            return Err(PluginError::CommandFailed {
                command: self.program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    fn load(&self, output_file: &Path) -> Option<Vec<f64>> {
        load_series(output_file, OUTPUT_HEADER_LINES)
    }

    fn calculate(&mut self) -> Result<()> {
        // Keep a copy of each output series with the evaluation.
        let output_dir = self.output_dir();
        for file in self.responses.files() {
            let source = output_dir.join(file);
            match file.file_name() {
                Some(name) if source.is_file() => {
                    fs::copy(&source, self.work_dir.join(name))?;
                }
                _ => {}
            }
        }

        let series = self
            .responses
            .paths(&output_dir)
            .iter()
            .map(|path| self.load(path))
            .collect();
        self.responses.reduce(&output_dir, series);
        Ok(())
    }

    fn write(&self, params_file: &Path, results_file: &Path) -> Result<()> {
        self.responses.write(params_file, results_file)
    }
}
