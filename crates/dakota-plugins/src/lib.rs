//! Dakota Plugins
//!
//! Model plugins and the broker that `dakota_run_plugin` uses to run one
//! Dakota evaluation: find the configuration record, resolve the plugin,
//! then set up, run, reduce and report.

pub mod broker;
pub mod error;
pub mod hydrotrend;
pub mod plugin;
pub mod registry;
pub mod template;

pub use broker::{run_evaluation, Broker};
pub use error::PluginError;
pub use hydrotrend::HydroTrend;
pub use plugin::{load_series, Plugin, ResponseSet};
pub use registry::{PluginEntry, PluginRegistry};
pub use template::{expand_template, write_template};

/// Result type for dakota-plugins operations
pub type Result<T> = std::result::Result<T, PluginError>;
