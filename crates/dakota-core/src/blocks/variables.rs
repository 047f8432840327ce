//! Dakota variable sets

use crate::error::DakotaError;
use crate::format::{quoted, reals};
use crate::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousDesign {
    pub initial_point: Option<Vec<f64>>,
    pub lower_bounds: Option<Vec<f64>>,
    pub upper_bounds: Option<Vec<f64>>,
}

impl Default for ContinuousDesign {
    fn default() -> Self {
        ContinuousDesign::new(None, None, None)
    }
}

impl ContinuousDesign {
    /// Without a start point or bounds, the study starts at (-0.3, 0.2).
    pub fn new(
        initial_point: Option<Vec<f64>>,
        lower_bounds: Option<Vec<f64>>,
        upper_bounds: Option<Vec<f64>>,
    ) -> Self {
        let initial_point = match (&initial_point, &lower_bounds, &upper_bounds) {
            (None, None, None) => Some(vec![-0.3, 0.2]),
            _ => initial_point,
        };
        ContinuousDesign {
            initial_point,
            lower_bounds,
            upper_bounds,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalUncertain {
    pub means: Option<Vec<f64>>,
    pub std_deviations: Option<Vec<f64>>,
    pub lower_bounds: Option<Vec<f64>>,
    pub upper_bounds: Option<Vec<f64>>,
    pub initial_point: Option<Vec<f64>>,
}

impl Default for NormalUncertain {
    fn default() -> Self {
        NormalUncertain {
            means: Some(vec![0.0, 0.0]),
            std_deviations: Some(vec![1.0, 1.0]),
            lower_bounds: None,
            upper_bounds: None,
            initial_point: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UniformUncertain {
    pub lower_bounds: Option<Vec<f64>>,
    pub upper_bounds: Option<Vec<f64>>,
    pub initial_point: Option<Vec<f64>>,
}

impl Default for UniformUncertain {
    fn default() -> Self {
        UniformUncertain {
            lower_bounds: Some(vec![-2.0, -2.0]),
            upper_bounds: Some(vec![2.0, 2.0]),
            initial_point: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VariablesKind {
    ContinuousDesign(ContinuousDesign),
    NormalUncertain(NormalUncertain),
    UniformUncertain(UniformUncertain),
}

impl VariablesKind {
    pub const NAMES: [&'static str; 3] =
        ["continuous_design", "normal_uncertain", "uniform_uncertain"];

    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "continuous_design" => Ok(VariablesKind::ContinuousDesign(Default::default())),
            "normal_uncertain" => Ok(VariablesKind::NormalUncertain(Default::default())),
            "uniform_uncertain" => Ok(VariablesKind::UniformUncertain(Default::default())),
            other => Err(DakotaError::unknown_block("variables", other)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VariablesKind::ContinuousDesign(_) => "continuous_design",
            VariablesKind::NormalUncertain(_) => "normal_uncertain",
            VariablesKind::UniformUncertain(_) => "uniform_uncertain",
        }
    }

    /// Optional fields in the order they are written.
    fn fields(&self) -> Vec<(&'static str, &Option<Vec<f64>>)> {
        match self {
            VariablesKind::ContinuousDesign(v) => vec![
                ("initial_point", &v.initial_point),
                ("lower_bounds", &v.lower_bounds),
                ("upper_bounds", &v.upper_bounds),
            ],
            VariablesKind::NormalUncertain(v) => vec![
                ("means", &v.means),
                ("std_deviations", &v.std_deviations),
                ("lower_bounds", &v.lower_bounds),
                ("upper_bounds", &v.upper_bounds),
                ("initial_point", &v.initial_point),
            ],
            VariablesKind::UniformUncertain(v) => vec![
                ("lower_bounds", &v.lower_bounds),
                ("upper_bounds", &v.upper_bounds),
                ("initial_point", &v.initial_point),
            ],
        }
    }
}

/// The variables block of a Dakota input file.
#[derive(Debug, Clone, PartialEq)]
pub struct Variables {
    descriptors: Vec<String>,
    pub kind: VariablesKind,
}

impl Default for Variables {
    fn default() -> Self {
        Variables::new(VariablesKind::ContinuousDesign(Default::default()))
    }
}

impl Variables {
    pub fn new(kind: VariablesKind) -> Self {
        Variables {
            descriptors: vec!["x1".to_string(), "x2".to_string()],
            kind,
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Ok(Variables::new(VariablesKind::from_name(name)?))
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn descriptors(&self) -> &[String] {
        &self.descriptors
    }

    /// Labels for the variables; at least one is required.
    pub fn set_descriptors(&mut self, descriptors: Vec<String>) -> Result<()> {
        if descriptors.is_empty() {
            return Err(DakotaError::invalid_value(
                "descriptors",
                "at least one descriptor is required",
            ));
        }
        self.descriptors = descriptors;
        Ok(())
    }

    /// Render the variables block of a Dakota input file.
    pub fn render(&self) -> String {
        let mut s = format!(
            "variables\n  {} = {}\n    descriptors ={}",
            self.name(),
            self.descriptors.len(),
            quoted(&self.descriptors)
        );
        for (key, values) in self.kind.fields() {
            if let Some(values) = values {
                s.push_str(&format!("\n    {key} ={}", reals(values)));
            }
        }
        s.push_str("\n\n");
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_continuous_design_block() {
        let v = Variables::default();
        assert_eq!(
            v.render(),
            "variables\n  continuous_design = 2\n    descriptors = 'x1' 'x2'\n    initial_point = -0.3 0.2\n\n"
        );
    }

    #[test]
    fn test_bounds_suppress_default_initial_point() {
        let cd = ContinuousDesign::new(None, Some(vec![-10.0, -10.0]), Some(vec![10.0, 10.0]));
        assert!(cd.initial_point.is_none());

        let v = Variables::new(VariablesKind::ContinuousDesign(cd));
        let s = v.render();
        assert!(s.contains("    lower_bounds = -10.0 -10.0\n"));
        assert!(s.contains("    upper_bounds = 10.0 10.0\n"));
        assert_eq!(s.lines().count(), 6);
    }

    #[test]
    fn test_normal_uncertain_block() {
        let v = Variables::from_name("normal_uncertain").unwrap();
        assert_eq!(
            v.render(),
            "variables\n  normal_uncertain = 2\n    descriptors = 'x1' 'x2'\n    means = 0.0 0.0\n    std_deviations = 1.0 1.0\n\n"
        );
    }

    #[test]
    fn test_uniform_uncertain_block() {
        let mut v = Variables::from_name("uniform_uncertain").unwrap();
        if let VariablesKind::UniformUncertain(u) = &mut v.kind {
            u.initial_point = Some(vec![0.5, 0.5]);
        }
        let s = v.render();
        assert!(s.contains("    lower_bounds = -2.0 -2.0\n    upper_bounds = 2.0 2.0\n    initial_point = 0.5 0.5\n"));
    }

    #[test]
    fn test_descriptor_count_tracks_descriptors() {
        let mut v = Variables::default();
        v.set_descriptors(vec!["T".to_string()]).unwrap();
        assert!(v.render().contains("  continuous_design = 1\n    descriptors = 'T'\n"));
    }

    #[test]
    fn test_empty_descriptors_rejected() {
        let mut v = Variables::default();
        assert!(v.set_descriptors(Vec::new()).is_err());
    }

    #[test]
    fn test_unknown_variables_kind() {
        let err = Variables::from_name("discrete_state").unwrap_err();
        assert_eq!(err.to_string(), "unknown variables type: discrete_state");
    }
}
