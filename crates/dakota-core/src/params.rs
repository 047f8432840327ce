//! Dakota parameters file scanning
//!
//! Dakota writes one parameters file per evaluation. Two markers matter
//! here: the analysis-component line (`<config path> AC_1:<plugin>`) names
//! the configuration record, and each active-set-vector line
//! (`<asv> ASV_<n>:<descriptor>`) names a response to report. Both are
//! matched by substring anywhere on a line.

use crate::error::DakotaError;
use crate::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Substring marking the line that carries the configuration file path.
pub const CONFIGURATION_MARKER: &str = "AC_1";

/// Substring marking lines that carry response descriptors.
pub const RESPONSE_MARKER: &str = "ASV_";

fn descriptor_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r":(\S+)").expect("descriptor pattern is valid"))
}

/// One study variable as written in the parameters file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub descriptor: String,
    /// Value exactly as Dakota wrote it
    pub value: String,
}

/// Path of the configuration record named in a parameters file.
///
/// Fails with `ConfigNotFound` when no line carries the `AC_1` marker.
pub fn configuration_file(params_file: &Path) -> Result<PathBuf> {
    let text = fs::read_to_string(params_file)?;
    parse_configuration_file(&text)
        .ok_or_else(|| DakotaError::ConfigNotFound(params_file.to_path_buf()))
}

/// Text before `AC_1` on the first line containing it, trimmed.
///
/// Dakota writes one such line. If there are several, later ones are
/// ignored.
pub fn parse_configuration_file(text: &str) -> Option<PathBuf> {
    text.lines()
        .find(|line| line.contains(CONFIGURATION_MARKER))
        .and_then(|line| line.split(CONFIGURATION_MARKER).next())
        .map(|before| PathBuf::from(before.trim()))
}

/// Response descriptors, in file order.
pub fn response_descriptors(params_file: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(params_file)?;
    Ok(parse_response_descriptors(&text))
}

/// One descriptor per `ASV_` line: every `:<token>` capture on the line,
/// concatenated.
pub fn parse_response_descriptors(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| line.contains(RESPONSE_MARKER))
        .map(|line| {
            descriptor_pattern()
                .captures_iter(line)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str())
                .collect::<String>()
        })
        .collect()
}

/// Study variables from the leading `<N> variables` section.
pub fn variables(params_file: &Path) -> Result<Vec<Variable>> {
    let text = fs::read_to_string(params_file)?;
    parse_variables(&text)
}

pub fn parse_variables(text: &str) -> Result<Vec<Variable>> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header = lines
        .next()
        .ok_or_else(|| DakotaError::ParametersFormat("empty parameters file".to_string()))?;
    let count = match header.split_whitespace().collect::<Vec<_>>().as_slice() {
        [n, "variables"] => n.parse::<usize>().map_err(|_| {
            DakotaError::ParametersFormat(format!("bad variable count in '{}'", header.trim()))
        })?,
        _ => {
            return Err(DakotaError::ParametersFormat(format!(
                "expected '<N> variables', found '{}'",
                header.trim()
            )))
        }
    };

    let mut variables = Vec::with_capacity(count);
    for _ in 0..count {
        let line = lines.next().ok_or_else(|| {
            DakotaError::ParametersFormat(format!("expected {count} variables"))
        })?;
        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            [value, descriptor] => variables.push(Variable {
                descriptor: descriptor.to_string(),
                value: value.to_string(),
            }),
            _ => {
                return Err(DakotaError::ParametersFormat(format!(
                    "expected '<value> <descriptor>', found '{}'",
                    line.trim()
                )))
            }
        }
    }
    Ok(variables)
}
