//! Dakota Core Library
//!
//! Builds Dakota input files from typed configuration blocks, keeps the
//! YAML configuration record that travels with a study, runs the `dakota`
//! executable, and provides the parameters/results file utilities used by
//! analysis drivers.

pub mod blocks;
pub mod config;
pub mod error;
pub mod experiment;
pub mod format;
pub mod params;
pub mod results;
pub mod statistics;
pub mod telemetry;
pub mod toolkit;

pub use blocks::{
    BasisPolynomialFamily, Environment, Interface, InterfaceKind, Levels, Method, MethodKind,
    Responses, SampleType, Variables, VariablesKind,
};
pub use config::ConfigRecord;
pub use error::DakotaError;
pub use experiment::Experiment;
pub use params::{configuration_file, response_descriptors, Variable};
pub use results::write_results;
pub use statistics::{compute_statistic, Statistic};
pub use toolkit::{
    is_dakota_installed, library_path_env, which, which_dakota, Dakota, RunOutput,
};

/// Result type for dakota-core operations
pub type Result<T> = std::result::Result<T, DakotaError>;

/// Crate version, reported by the binaries
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
