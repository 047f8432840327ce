//! Top-level Dakota settings

use crate::format::quote;
use serde::{Deserialize, Serialize};

/// Default tabular data file written by Dakota.
pub const DEFAULT_DATA_FILE: &str = "dakota.dat";

/// The environment block: where Dakota writes its tabular data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Dakota tabular data file
    pub data_file: String,
}

impl Default for Environment {
    fn default() -> Self {
        Environment {
            data_file: DEFAULT_DATA_FILE.to_string(),
        }
    }
}

impl Environment {
    pub fn new(data_file: impl Into<String>) -> Self {
        Environment {
            data_file: data_file.into(),
        }
    }

    /// Render the environment block of a Dakota input file.
    pub fn render(&self) -> String {
        format!(
            "environment\n  tabular_data\n    tabular_data_file = {}\n\n",
            quote(&self.data_file)
        )
    }
}
