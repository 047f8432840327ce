//! Dakota toolkit controller
//!
//! [`Dakota`] owns an [`Experiment`] plus the files of one run: it writes the
//! configuration record and input file into the run directory and invokes
//! the `dakota` executable there.

use crate::config::{
    ConfigRecord, DEFAULT_CONFIGURATION_FILE, DEFAULT_INPUT_FILE, DEFAULT_OUTPUT_FILE,
};
use crate::error::DakotaError;
use crate::experiment::{absolute, Experiment};
use crate::Result;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Name of the Dakota executable.
pub const DAKOTA_PROGRAM: &str = "dakota";

/// Variable through which Dakota finds its shared libraries on macOS.
pub const LIBRARY_PATH_VAR: &str = "DYLD_LIBRARY_PATH";

/// Captured output of a successful Dakota run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

/// A Dakota experiment bound to a run directory.
#[derive(Debug, Clone)]
pub struct Dakota {
    pub experiment: Experiment,
    run_directory: PathBuf,
    configuration_file: PathBuf,
    /// Input file name, relative to the run directory
    pub input_file: PathBuf,
    /// Output file name, relative to the run directory
    pub output_file: PathBuf,
    template_file: Option<PathBuf>,
    auxiliary_files: Vec<PathBuf>,
    program: String,
}

impl Dakota {
    /// Controller running `experiment` in the current directory.
    pub fn new(experiment: Experiment) -> Result<Self> {
        let run_directory = std::env::current_dir()?;
        let mut dakota = Dakota {
            experiment,
            configuration_file: run_directory.join(DEFAULT_CONFIGURATION_FILE),
            run_directory,
            input_file: PathBuf::from(DEFAULT_INPUT_FILE),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            template_file: None,
            auxiliary_files: Vec::new(),
            program: DAKOTA_PROGRAM.to_string(),
        };
        dakota.sync_fork_interface();
        Ok(dakota)
    }

    /// Rebuild a controller from a configuration record.
    pub fn from_record(record: &ConfigRecord) -> Result<Self> {
        let experiment = Experiment::from_config(record)?;
        let mut dakota = Dakota::new(experiment)?;

        if let Some(dir) = &record.run_directory {
            dakota.set_run_directory(dir)?;
        }
        let configuration_file = dakota.run_directory.join(
            record
                .configuration_file
                .as_deref()
                .unwrap_or(Path::new(DEFAULT_CONFIGURATION_FILE)),
        );
        dakota.set_configuration_file(&configuration_file)?;

        if let Some(file) = &record.input_file {
            dakota.input_file = file.clone();
        }
        if let Some(file) = &record.output_file {
            dakota.output_file = file.clone();
        }
        if let Some(file) = &record.template_file {
            dakota.set_template_file(Some(file))?;
        }
        dakota.set_auxiliary_files(record.auxiliary_files())?;
        Ok(dakota)
    }

    /// Load a configuration record and rebuild its controller.
    ///
    /// A record without `configuration_file` keeps pointing at `path`.
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let mut record = ConfigRecord::load(path)?;
        if record.configuration_file.is_none() {
            record.configuration_file = Some(absolute(path)?);
        }
        Dakota::from_record(&record)
    }

    /// Use another executable in place of `dakota`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn run_directory(&self) -> &Path {
        &self.run_directory
    }

    pub fn set_run_directory(&mut self, dir: &Path) -> Result<()> {
        self.run_directory = absolute(dir)?;
        Ok(())
    }

    pub fn configuration_file(&self) -> &Path {
        &self.configuration_file
    }

    /// Also repoints a fork interface at the new file.
    pub fn set_configuration_file(&mut self, path: &Path) -> Result<()> {
        self.configuration_file = absolute(path)?;
        self.sync_fork_interface();
        Ok(())
    }

    pub fn template_file(&self) -> Option<&Path> {
        self.template_file.as_deref()
    }

    pub fn set_template_file(&mut self, path: Option<&Path>) -> Result<()> {
        self.template_file = path.map(absolute).transpose()?;
        Ok(())
    }

    pub fn auxiliary_files(&self) -> &[PathBuf] {
        &self.auxiliary_files
    }

    pub fn set_auxiliary_files(&mut self, files: &[PathBuf]) -> Result<()> {
        self.auxiliary_files = files
            .iter()
            .map(|f| absolute(f))
            .collect::<Result<Vec<_>>>()?;
        Ok(())
    }

    pub fn input_file_path(&self) -> PathBuf {
        self.run_directory.join(&self.input_file)
    }

    pub fn output_file_path(&self) -> PathBuf {
        self.run_directory.join(&self.output_file)
    }

    fn sync_fork_interface(&mut self) {
        if let Some(fork) = self.experiment.interface.fork_settings_mut() {
            fork.configuration_file = self.configuration_file.clone();
        }
    }

    /// Experiment settings plus the run settings of this controller.
    pub fn to_config(&self) -> ConfigRecord {
        let mut record = self.experiment.to_config();
        record.run_directory = Some(self.run_directory.clone());
        record.configuration_file = Some(self.configuration_file.clone());
        record.input_file = Some(self.input_file.clone());
        record.output_file = Some(self.output_file.clone());
        record.template_file = self.template_file.clone();
        record.auxiliary_files = Some(self.auxiliary_files.clone());
        record
    }

    /// Write the configuration record, optionally to a new path.
    pub fn serialize(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = path {
            self.set_configuration_file(path)?;
        }
        if let Some(parent) = self.configuration_file.parent() {
            fs::create_dir_all(parent)?;
        }
        self.to_config().save(&self.configuration_file)?;
        info!(path = %self.configuration_file.display(), "Wrote configuration file");
        Ok(self.configuration_file.clone())
    }

    pub fn write_configuration_file(&mut self) -> Result<PathBuf> {
        self.serialize(None)
    }

    /// Write the Dakota input file into the run directory, optionally
    /// under a new name.
    pub fn write_input_file(&mut self, input_file: Option<&Path>) -> Result<PathBuf> {
        if let Some(name) = input_file {
            self.input_file = name.to_path_buf();
        }
        let path = self.input_file_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, self.experiment.render())?;
        info!(path = %path.display(), "Wrote input file");
        Ok(path)
    }

    /// Write the configuration record and the input file.
    pub fn setup(&mut self) -> Result<()> {
        self.write_configuration_file()?;
        self.write_input_file(None)?;
        Ok(())
    }

    /// Run `dakota -i <input> -o <output>` in the run directory.
    ///
    /// Waits for the toolkit to exit; a failure status is returned as
    /// `ToolkitFailed` with the captured output.
    pub async fn run(&self) -> Result<RunOutput> {
        let exe = which(&self.program).ok_or(DakotaError::DakotaNotFound)?;
        let start = Instant::now();

        let mut command = Command::new(&exe);
        command
            .arg("-i")
            .arg(&self.input_file)
            .arg("-o")
            .arg(&self.output_file)
            .current_dir(&self.run_directory)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(library_path) = library_path_for(&exe) {
            debug!(value = ?library_path, "Setting {}", LIBRARY_PATH_VAR);
            command.env(LIBRARY_PATH_VAR, library_path);
        }

        info!(
            program = %exe.display(),
            run_directory = %self.run_directory.display(),
            "Running Dakota"
        );
        let output = command.spawn()?.wait_with_output().await?;
        let duration_ms = start.elapsed().as_millis() as u64;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            warn!(code = ?output.status.code(), "Dakota failed");
            return Err(DakotaError::ToolkitFailed {
                code: output.status.code(),
                output: format!("{stdout}{stderr}"),
            });
        }

        info!(duration_ms, "Dakota finished");
        Ok(RunOutput {
            exit_code: output.status.code(),
            stdout,
            stderr,
            duration_ms,
        })
    }
}

/// Locate `program` the way a shell would.
///
/// A bare name can be overridden by an environment variable named after
/// it in upper case (`DAKOTA` for `dakota`). Names containing a path
/// separator are checked directly.
pub fn which(program: &str) -> Option<PathBuf> {
    let program = if program.contains(std::path::MAIN_SEPARATOR) {
        program.to_string()
    } else {
        std::env::var(program.to_uppercase()).unwrap_or_else(|_| program.to_string())
    };
    let search_path = std::env::var_os("PATH").unwrap_or_default();
    find_in_path(&program, &search_path)
}

fn find_in_path(program: &str, search_path: &std::ffi::OsStr) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }
    std::env::split_paths(search_path)
        .map(|dir| dir.join(program))
        .find(|path| is_executable(path))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Path of the Dakota executable, if installed.
pub fn which_dakota() -> Option<PathBuf> {
    which(DAKOTA_PROGRAM)
}

/// Whether `dakota --version` runs successfully.
pub fn is_dakota_installed() -> bool {
    let program = which_dakota().unwrap_or_else(|| PathBuf::from(DAKOTA_PROGRAM));
    std::process::Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// `DYLD_LIBRARY_PATH` value for the installed Dakota: the `bin` and `lib`
/// directories of its installation prefix.
pub fn library_path_env() -> Option<OsString> {
    which_dakota().and_then(|exe| library_path_for(&exe))
}

fn library_path_for(exe: &Path) -> Option<OsString> {
    let prefix = exe.parent()?.parent()?;
    std::env::join_paths([prefix.join("bin"), prefix.join("lib")]).ok()
}
