//! Dakota results file writing

use crate::error::DakotaError;
use crate::format::real;
use crate::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Results file text: one `<value>\t<descriptor>` line per response.
pub fn format_results(values: &[f64], descriptors: &[String]) -> Result<String> {
    if values.len() != descriptors.len() {
        return Err(DakotaError::ResultsMismatch {
            values: values.len(),
            descriptors: descriptors.len(),
        });
    }
    Ok(values
        .iter()
        .zip(descriptors)
        .map(|(value, descriptor)| format!("{}\t{}\n", real(*value), descriptor))
        .collect())
}

/// Write a results file, replacing any existing file.
///
/// Nothing is written when the counts differ.
pub fn write_results(results_file: &Path, values: &[f64], descriptors: &[String]) -> Result<()> {
    let text = format_results(values, descriptors)?;
    fs::write(results_file, text)?;
    debug!(
        path = %results_file.display(),
        responses = values.len(),
        "Wrote results file"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_one_line_per_response_in_order() {
        let text = format_results(&[1.0, 0.25, f64::NAN], &labels(&["y1", "y2", "y3"])).unwrap();
        assert_eq!(text, "1.0\ty1\n0.25\ty2\nnan\ty3\n");
    }

    #[test]
    fn test_count_mismatch() {
        let err = format_results(&[1.0], &labels(&["y1", "y2"])).unwrap_err();
        assert!(matches!(
            err,
            DakotaError::ResultsMismatch {
                values: 1,
                descriptors: 2
            }
        ));
    }

    #[test]
    fn test_write_results_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.out");
        write_results(&path, &[1e-5], &labels(&["Qs_median"])).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1e-05\tQs_median\n");
    }

    #[test]
    fn test_mismatch_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.out");
        assert!(write_results(&path, &[], &labels(&["y1"])).is_err());
        assert!(!path.exists());
    }
}
