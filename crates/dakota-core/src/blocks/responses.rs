//! Dakota response functions

use crate::error::DakotaError;
use crate::format::quoted;
use crate::Result;

/// The responses block of a Dakota input file.
///
/// `response_files` and `response_statistics` are not written to the input
/// file. They travel in the configuration record so a plugin knows which
/// model output backs each response and how to reduce it.
#[derive(Debug, Clone, PartialEq)]
pub struct Responses {
    pub response_descriptors: Vec<String>,
    pub response_files: Vec<String>,
    pub response_statistics: Vec<String>,
    pub gradients: String,
    pub hessians: String,
}

impl Default for Responses {
    fn default() -> Self {
        Responses {
            response_descriptors: vec!["y1".to_string()],
            response_files: Vec::new(),
            response_statistics: vec!["mean".to_string()],
            gradients: "no_gradients".to_string(),
            hessians: "no_hessians".to_string(),
        }
    }
}

impl Responses {
    pub const NAMES: [&'static str; 1] = ["response_functions"];

    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "response_functions" => Ok(Responses::default()),
            other => Err(DakotaError::unknown_block("responses", other)),
        }
    }

    pub fn name(&self) -> &'static str {
        "response_functions"
    }

    /// Render the responses block of a Dakota input file.
    pub fn render(&self) -> String {
        format!(
            "responses\n  response_functions = {}\n    response_descriptors ={}\n  {}\n  {}\n",
            self.response_descriptors.len(),
            quoted(&self.response_descriptors),
            self.gradients,
            self.hessians
        )
    }
}
