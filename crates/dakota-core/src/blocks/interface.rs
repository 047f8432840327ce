//! How Dakota reaches the analysis driver

use crate::error::DakotaError;
use crate::format::quote;
use crate::Result;
use std::path::PathBuf;

/// Analysis driver used when no plugin is named.
pub const DEFAULT_ANALYSIS_DRIVER: &str = "rosenbrock";

/// Analysis driver used when a plugin handles the evaluations.
pub const PLUGIN_ANALYSIS_DRIVER: &str = "dakota_run_plugin";

/// Settings of an out-of-process (fork) interface.
///
/// Dakota writes `parameters_file` into a fresh tagged copy of
/// `work_directory` for every evaluation and reads `results_file` back.
#[derive(Debug, Clone, PartialEq)]
pub struct ForkSettings {
    /// Absolute path of the configuration record, passed to the driver
    /// as its analysis component
    pub configuration_file: PathBuf,
    pub parameters_file: String,
    pub results_file: String,
    pub work_directory: String,
}

impl Default for ForkSettings {
    fn default() -> Self {
        ForkSettings {
            configuration_file: PathBuf::from("dakota.yaml"),
            parameters_file: "params.in".to_string(),
            results_file: "results.out".to_string(),
            work_directory: "run".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceKind {
    Direct,
    Fork(ForkSettings),
}

impl InterfaceKind {
    pub const NAMES: [&'static str; 2] = ["direct", "fork"];

    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "direct" => Ok(InterfaceKind::Direct),
            "fork" => Ok(InterfaceKind::Fork(ForkSettings::default())),
            other => Err(DakotaError::unknown_block("interface", other)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InterfaceKind::Direct => "direct",
            InterfaceKind::Fork(_) => "fork",
        }
    }
}

/// The interface block of a Dakota input file.
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub id_interface: String,
    pub analysis_driver: String,
    pub asynchronous: bool,
    pub evaluation_concurrency: u32,
    pub kind: InterfaceKind,
}

impl Default for Interface {
    fn default() -> Self {
        Interface::new(InterfaceKind::Direct)
    }
}

impl Interface {
    pub fn new(kind: InterfaceKind) -> Self {
        Interface {
            id_interface: "CSDMS".to_string(),
            analysis_driver: DEFAULT_ANALYSIS_DRIVER.to_string(),
            asynchronous: false,
            evaluation_concurrency: 2,
            kind,
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Ok(Interface::new(InterfaceKind::from_name(name)?))
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn fork_settings(&self) -> Option<&ForkSettings> {
        match &self.kind {
            InterfaceKind::Fork(settings) => Some(settings),
            InterfaceKind::Direct => None,
        }
    }

    pub fn fork_settings_mut(&mut self) -> Option<&mut ForkSettings> {
        match &mut self.kind {
            InterfaceKind::Fork(settings) => Some(settings),
            InterfaceKind::Direct => None,
        }
    }

    /// Render the interface block of a Dakota input file.
    pub fn render(&self) -> String {
        let mut s = format!(
            "interface\n  id_interface = {}\n  {}\n  analysis_driver = {}",
            quote(&self.id_interface),
            self.name(),
            quote(&self.analysis_driver)
        );
        if self.asynchronous {
            s.push_str(&format!(
                "\n  asynchronous\n  evaluation_concurrency = {}",
                self.evaluation_concurrency
            ));
        }

        match &self.kind {
            InterfaceKind::Direct => s.push_str("\n\n"),
            InterfaceKind::Fork(fork) => {
                s.push_str(&format!(
                    "\n  analysis_components = {}\n",
                    quote(&fork.configuration_file.to_string_lossy())
                ));
                s.push_str(&format!(
                    "  parameters_file = {}\n",
                    quote(&fork.parameters_file)
                ));
                s.push_str(&format!("  results_file = {}\n", quote(&fork.results_file)));
                s.push_str("  work_directory\n");
                s.push_str(&format!("    named {}\n", quote(&fork.work_directory)));
                s.push_str("    directory_tag\n    directory_save\n  file_save\n\n");
            }
        }
        s
    }
}
