//! Dakota analysis methods
//!
//! A [`Method`] pairs the settings shared by every method (iteration and
//! convergence controls) with a [`MethodKind`] holding the settings of one
//! concrete study. Uncertainty-quantification methods additionally share
//! [`UncertaintySettings`].

use crate::error::DakotaError;
use crate::format::{items, real, reals};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sampling scheme used by UQ methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleType {
    #[default]
    Random,
    Lhs,
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleType::Random => write!(f, "random"),
            SampleType::Lhs => write!(f, "lhs"),
        }
    }
}

impl FromStr for SampleType {
    type Err = DakotaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "random" => Ok(SampleType::Random),
            "lhs" => Ok(SampleType::Lhs),
            other => Err(DakotaError::invalid_value(
                "sample_type",
                format!("must be 'random' or 'lhs', got '{other}'"),
            )),
        }
    }
}

/// Family of basis polynomials used by expansion methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasisPolynomialFamily {
    #[default]
    Extended,
    Askey,
    Wiener,
    /// Only valid for stochastic collocation
    Piecewise,
}

impl fmt::Display for BasisPolynomialFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasisPolynomialFamily::Extended => write!(f, "extended"),
            BasisPolynomialFamily::Askey => write!(f, "askey"),
            BasisPolynomialFamily::Wiener => write!(f, "wiener"),
            BasisPolynomialFamily::Piecewise => write!(f, "piecewise"),
        }
    }
}

impl FromStr for BasisPolynomialFamily {
    type Err = DakotaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "extended" => Ok(BasisPolynomialFamily::Extended),
            "askey" => Ok(BasisPolynomialFamily::Askey),
            "wiener" => Ok(BasisPolynomialFamily::Wiener),
            "piecewise" => Ok(BasisPolynomialFamily::Piecewise),
            other => Err(DakotaError::invalid_value(
                "basis_polynomial_family",
                format!("unknown polynomial family '{other}'"),
            )),
        }
    }
}

/// Probability or response levels, either one list for all responses or
/// one list per response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Levels {
    Flat(Vec<f64>),
    PerResponse(Vec<Vec<f64>>),
}

impl Default for Levels {
    fn default() -> Self {
        Levels::Flat(Vec::new())
    }
}

impl Levels {
    pub fn is_empty(&self) -> bool {
        match self {
            Levels::Flat(values) => values.is_empty(),
            Levels::PerResponse(groups) => groups.is_empty(),
        }
    }

    /// Values after the `=` sign, including the terminating newline.
    /// Nested levels put each response's group on its own continuation line.
    fn render(&self) -> String {
        let mut s = match self {
            Levels::Flat(values) => reals(values),
            Levels::PerResponse(groups) => groups
                .iter()
                .map(|group| format!("\n     {}", reals(group)))
                .collect(),
        };
        s.push('\n');
        s
    }
}

/// Settings shared by every method.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MethodCommon {
    max_iterations: Option<u32>,
    convergence_tolerance: Option<f64>,
}

impl MethodCommon {
    pub fn max_iterations(&self) -> Option<u32> {
        self.max_iterations
    }

    pub fn set_max_iterations(&mut self, value: Option<u32>) {
        self.max_iterations = value;
    }

    pub fn convergence_tolerance(&self) -> Option<f64> {
        self.convergence_tolerance
    }

    /// Tolerance must lie strictly between 0 and 1.
    pub fn set_convergence_tolerance(&mut self, value: Option<f64>) -> Result<()> {
        if let Some(tol) = value {
            if !(tol > 0.0 && tol < 1.0) {
                return Err(DakotaError::invalid_value(
                    "convergence_tolerance",
                    format!("must be in (0, 1), got {tol}"),
                ));
            }
        }
        self.convergence_tolerance = value;
        Ok(())
    }

    fn render(&self, out: &mut String) {
        if let Some(n) = self.max_iterations {
            out.push_str(&format!("    max_iterations = {n}\n"));
        }
        if let Some(tol) = self.convergence_tolerance {
            out.push_str(&format!("    convergence_tolerance = {}\n", real(tol)));
        }
    }
}

/// Settings shared by the uncertainty-quantification methods.
#[derive(Debug, Clone, PartialEq)]
pub struct UncertaintySettings {
    pub sample_type: SampleType,
    pub samples: u32,
    /// A seed of zero is treated as unset
    pub seed: Option<u64>,
    pub probability_levels: Levels,
    pub response_levels: Levels,
    pub variance_based_decomp: bool,
    basis_polynomial_family: BasisPolynomialFamily,
}

impl Default for UncertaintySettings {
    fn default() -> Self {
        UncertaintySettings {
            sample_type: SampleType::Random,
            samples: 10,
            seed: None,
            probability_levels: Levels::Flat(vec![0.1, 0.5, 0.9]),
            response_levels: Levels::default(),
            variance_based_decomp: false,
            basis_polynomial_family: BasisPolynomialFamily::Extended,
        }
    }
}

impl UncertaintySettings {
    pub fn basis_polynomial_family(&self) -> BasisPolynomialFamily {
        self.basis_polynomial_family
    }

    fn render(&self, out: &mut String) {
        out.push_str(&format!("    sample_type = {}\n", self.sample_type));
        out.push_str(&format!("    samples = {}\n", self.samples));
        if let Some(seed) = self.seed.filter(|s| *s != 0) {
            out.push_str(&format!("    seed = {seed}\n"));
        }
        if !self.probability_levels.is_empty() {
            out.push_str("    probability_levels =");
            out.push_str(&self.probability_levels.render());
        }
        if !self.response_levels.is_empty() {
            out.push_str("    response_levels =");
            out.push_str(&self.response_levels.render());
        }
        if self.variance_based_decomp {
            out.push_str("    variance_based_decomp\n");
        }
        if self.basis_polynomial_family != BasisPolynomialFamily::Extended {
            out.push_str(&format!("    {}\n", self.basis_polynomial_family));
        }
    }
}

/// Tensor-product quadrature used to estimate expansion coefficients.
///
/// When a dimension preference is set, its largest weight becomes the
/// quadrature order and explicit orders are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Quadrature {
    quadrature_order: u32,
    dimension_preference: Vec<u32>,
    pub nested: bool,
}

impl Default for Quadrature {
    fn default() -> Self {
        Quadrature {
            quadrature_order: 2,
            dimension_preference: Vec::new(),
            nested: false,
        }
    }
}

impl Quadrature {
    pub fn quadrature_order(&self) -> u32 {
        self.quadrature_order
    }

    pub fn set_quadrature_order(&mut self, order: u32) {
        self.quadrature_order = match self.dimension_preference.iter().max() {
            Some(max) => *max,
            None => order,
        };
    }

    pub fn dimension_preference(&self) -> &[u32] {
        &self.dimension_preference
    }

    pub fn set_dimension_preference(&mut self, weights: Vec<u32>) {
        self.dimension_preference = weights;
        if let Some(max) = self.dimension_preference.iter().max() {
            self.quadrature_order = *max;
        }
    }

    fn render(&self, out: &mut String) {
        out.push_str(&format!("    quadrature_order = {}\n", self.quadrature_order));
        if !self.dimension_preference.is_empty() {
            out.push_str(&format!(
                "    dimension_preference ={}\n",
                items(&self.dimension_preference)
            ));
        }
        out.push_str(if self.nested {
            "    nested\n"
        } else {
            "    non_nested\n"
        });
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorParameterStudy {
    /// End point of the study vector
    pub final_point: Vec<f64>,
    /// Number of steps along the vector
    pub n_steps: u32,
}

impl Default for VectorParameterStudy {
    fn default() -> Self {
        VectorParameterStudy {
            final_point: vec![1.1, 1.3],
            n_steps: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CenteredParameterStudy {
    /// Steps taken in each direction, per variable
    pub steps_per_variable: Vec<u32>,
    /// Step size, per variable
    pub step_vector: Vec<f64>,
}

impl Default for CenteredParameterStudy {
    fn default() -> Self {
        CenteredParameterStudy {
            steps_per_variable: vec![5, 4],
            step_vector: vec![0.4, 0.5],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultidimParameterStudy {
    /// Intervals between the lower and upper bound of each variable
    pub partitions: Vec<u32>,
}

impl Default for MultidimParameterStudy {
    fn default() -> Self {
        MultidimParameterStudy {
            partitions: vec![10, 8],
        }
    }
}

/// Morris one-at-a-time screening, as implemented by PSUADE.
///
/// Dakota adjusts `samples` to a multiple of (variables + 1) and
/// `partitions` to an odd number at run time.
#[derive(Debug, Clone, PartialEq)]
pub struct PsuadeMoat {
    pub partitions: u32,
    pub samples: u32,
    pub seed: u64,
    /// `id_model` of the model block to analyze when several exist
    pub model_pointer: Option<String>,
}

impl Default for PsuadeMoat {
    fn default() -> Self {
        PsuadeMoat {
            partitions: 5,
            samples: 12,
            seed: 500,
            model_pointer: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sampling {
    pub uq: UncertaintySettings,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolynomialChaos {
    pub uq: UncertaintySettings,
    pub quadrature: Quadrature,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StochasticCollocation {
    pub uq: UncertaintySettings,
    pub quadrature: Quadrature,
}

/// The concrete study performed by a method block.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodKind {
    VectorParameterStudy(VectorParameterStudy),
    CenteredParameterStudy(CenteredParameterStudy),
    MultidimParameterStudy(MultidimParameterStudy),
    PsuadeMoat(PsuadeMoat),
    Sampling(Sampling),
    PolynomialChaos(PolynomialChaos),
    StochasticCollocation(StochasticCollocation),
}

impl MethodKind {
    /// All method keywords understood by [`MethodKind::from_name`].
    pub const NAMES: [&'static str; 7] = [
        "vector_parameter_study",
        "centered_parameter_study",
        "multidim_parameter_study",
        "psuade_moat",
        "sampling",
        "polynomial_chaos",
        "stoch_collocation",
    ];

    /// Default settings for the method with this Dakota keyword.
    pub fn from_name(name: &str) -> Result<Self> {
        let kind = match name {
            "vector_parameter_study" => MethodKind::VectorParameterStudy(Default::default()),
            "centered_parameter_study" => MethodKind::CenteredParameterStudy(Default::default()),
            "multidim_parameter_study" => MethodKind::MultidimParameterStudy(Default::default()),
            "psuade_moat" => MethodKind::PsuadeMoat(Default::default()),
            "sampling" => MethodKind::Sampling(Default::default()),
            "polynomial_chaos" => MethodKind::PolynomialChaos(Default::default()),
            "stoch_collocation" => MethodKind::StochasticCollocation(Default::default()),
            other => return Err(DakotaError::unknown_block("method", other)),
        };
        Ok(kind)
    }

    /// Dakota keyword for this method.
    pub fn name(&self) -> &'static str {
        match self {
            MethodKind::VectorParameterStudy(_) => "vector_parameter_study",
            MethodKind::CenteredParameterStudy(_) => "centered_parameter_study",
            MethodKind::MultidimParameterStudy(_) => "multidim_parameter_study",
            MethodKind::PsuadeMoat(_) => "psuade_moat",
            MethodKind::Sampling(_) => "sampling",
            MethodKind::PolynomialChaos(_) => "polynomial_chaos",
            MethodKind::StochasticCollocation(_) => "stoch_collocation",
        }
    }

    pub fn uncertainty(&self) -> Option<&UncertaintySettings> {
        match self {
            MethodKind::Sampling(m) => Some(&m.uq),
            MethodKind::PolynomialChaos(m) => Some(&m.uq),
            MethodKind::StochasticCollocation(m) => Some(&m.uq),
            _ => None,
        }
    }

    pub fn uncertainty_mut(&mut self) -> Option<&mut UncertaintySettings> {
        match self {
            MethodKind::Sampling(m) => Some(&mut m.uq),
            MethodKind::PolynomialChaos(m) => Some(&mut m.uq),
            MethodKind::StochasticCollocation(m) => Some(&mut m.uq),
            _ => None,
        }
    }

    pub fn quadrature(&self) -> Option<&Quadrature> {
        match self {
            MethodKind::PolynomialChaos(m) => Some(&m.quadrature),
            MethodKind::StochasticCollocation(m) => Some(&m.quadrature),
            _ => None,
        }
    }

    pub fn quadrature_mut(&mut self) -> Option<&mut Quadrature> {
        match self {
            MethodKind::PolynomialChaos(m) => Some(&mut m.quadrature),
            MethodKind::StochasticCollocation(m) => Some(&mut m.quadrature),
            _ => None,
        }
    }
}

/// The method block of a Dakota input file.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub common: MethodCommon,
    pub kind: MethodKind,
}

impl Default for Method {
    fn default() -> Self {
        Method::new(MethodKind::VectorParameterStudy(Default::default()))
    }
}

impl Method {
    pub fn new(kind: MethodKind) -> Self {
        Method {
            common: MethodCommon::default(),
            kind,
        }
    }

    /// Method with default settings, chosen by Dakota keyword.
    pub fn from_name(name: &str) -> Result<Self> {
        Ok(Method::new(MethodKind::from_name(name)?))
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Set the basis polynomial family of a UQ expansion method.
    ///
    /// `piecewise` bases are only available to stochastic collocation.
    pub fn set_basis_polynomial_family(&mut self, family: BasisPolynomialFamily) -> Result<()> {
        let allows_piecewise = matches!(self.kind, MethodKind::StochasticCollocation(_));
        let name = self.name();
        let uq = self.kind.uncertainty_mut().ok_or_else(|| {
            DakotaError::invalid_value(
                "basis_polynomial_family",
                format!("method {name} has no polynomial basis"),
            )
        })?;
        if family == BasisPolynomialFamily::Piecewise && !allows_piecewise {
            return Err(DakotaError::invalid_value(
                "basis_polynomial_family",
                "must be 'extended', 'askey', or 'wiener'",
            ));
        }
        uq.basis_polynomial_family = family;
        Ok(())
    }

    /// Render the method block of a Dakota input file.
    pub fn render(&self) -> String {
        let mut s = format!("method\n  {}\n", self.name());
        self.common.render(&mut s);

        match &self.kind {
            MethodKind::VectorParameterStudy(m) => {
                s.push_str(&format!("    final_point ={}\n", reals(&m.final_point)));
                s.push_str(&format!("    num_steps = {}\n", m.n_steps));
            }
            MethodKind::CenteredParameterStudy(m) => {
                s.push_str(&format!(
                    "    steps_per_variable ={}\n",
                    items(&m.steps_per_variable)
                ));
                s.push_str(&format!("    step_vector ={}\n", reals(&m.step_vector)));
            }
            MethodKind::MultidimParameterStudy(m) => {
                s.push_str(&format!("    partitions ={}\n", items(&m.partitions)));
            }
            MethodKind::PsuadeMoat(m) => {
                if let Some(pointer) = &m.model_pointer {
                    s.push_str(&format!("    model_pointer = {pointer}\n"));
                }
                s.push_str(&format!("    partitions = {}\n", m.partitions));
                s.push_str(&format!("    samples = {}\n", m.samples));
                s.push_str(&format!("    seed = {}\n", m.seed));
            }
            MethodKind::Sampling(m) => m.uq.render(&mut s),
            MethodKind::PolynomialChaos(m) => {
                m.uq.render(&mut s);
                m.quadrature.render(&mut s);
            }
            MethodKind::StochasticCollocation(m) => {
                m.uq.render(&mut s);
                m.quadrature.render(&mut s);
            }
        }

        s.push('\n');
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_count(s: &str) -> usize {
        s.lines().count()
    }

    #[test]
    fn test_default_method_is_vector_parameter_study() {
        let m = Method::default();
        assert_eq!(
            m.render(),
            "method\n  vector_parameter_study\n    final_point = 1.1 1.3\n    num_steps = 10\n\n"
        );
    }

    #[test]
    fn test_from_name_rejects_unknown_method() {
        let err = Method::from_name("simplex").unwrap_err();
        assert!(matches!(err, DakotaError::UnknownBlock { .. }));
    }

    #[test]
    fn test_every_known_name_round_trips() {
        for name in MethodKind::NAMES {
            let m = Method::from_name(name).unwrap();
            assert_eq!(m.name(), name);
            assert!(m.render().starts_with(&format!("method\n  {name}\n")));
        }
    }

    #[test]
    fn test_common_options_add_lines() {
        let mut m = Method::from_name("centered_parameter_study").unwrap();
        m.common.set_max_iterations(Some(100));
        m.common.set_convergence_tolerance(Some(1e-4)).unwrap();
        let s = m.render();
        assert!(s.contains("    max_iterations = 100\n"));
        assert!(s.contains("    convergence_tolerance = 0.0001\n"));
    }

    #[test]
    fn test_convergence_tolerance_bounds() {
        let mut common = MethodCommon::default();
        assert!(common.set_convergence_tolerance(Some(0.0)).is_err());
        assert!(common.set_convergence_tolerance(Some(1.0)).is_err());
        assert!(common.set_convergence_tolerance(Some(0.1)).is_ok());
        assert_eq!(common.convergence_tolerance(), Some(0.1));
    }

    #[test]
    fn test_centered_parameter_study_block() {
        let m = Method::from_name("centered_parameter_study").unwrap();
        assert_eq!(
            m.render(),
            "method\n  centered_parameter_study\n    steps_per_variable = 5 4\n    step_vector = 0.4 0.5\n\n"
        );
    }

    #[test]
    fn test_multidim_parameter_study_block() {
        let m = Method::from_name("multidim_parameter_study").unwrap();
        assert_eq!(
            m.render(),
            "method\n  multidim_parameter_study\n    partitions = 10 8\n\n"
        );
    }

    #[test]
    fn test_psuade_moat_block_with_model_pointer() {
        let mut m = Method::from_name("psuade_moat").unwrap();
        if let MethodKind::PsuadeMoat(p) = &mut m.kind {
            p.model_pointer = Some("HS".to_string());
        }
        let s = m.render();
        assert!(s.contains("    model_pointer = HS\n"));
        assert!(s.contains("    partitions = 5\n"));
        assert!(s.contains("    samples = 12\n"));
        assert!(s.contains("    seed = 500\n"));
    }

    #[test]
    fn test_sampling_default_lines() {
        let m = Method::from_name("sampling").unwrap();
        // method, name, sample_type, samples, probability_levels, blank
        assert_eq!(line_count(&m.render()), 6);
        assert!(m.render().contains("    probability_levels = 0.1 0.5 0.9\n"));
    }

    #[test]
    fn test_uq_seed_zero_is_omitted() {
        let mut m = Method::from_name("sampling").unwrap();
        m.kind.uncertainty_mut().unwrap().seed = Some(0);
        assert!(!m.render().contains("seed"));

        m.kind.uncertainty_mut().unwrap().seed = Some(42);
        assert!(m.render().contains("    seed = 42\n"));
    }

    #[test]
    fn test_uq_optional_settings() {
        let mut m = Method::from_name("sampling").unwrap();
        {
            let uq = m.kind.uncertainty_mut().unwrap();
            uq.seed = Some(42);
            uq.sample_type = SampleType::Lhs;
            uq.probability_levels = Levels::Flat(vec![0.0, 1.0, 2.0]);
            uq.response_levels = Levels::Flat(vec![0.0, 1.0, 2.0]);
            uq.variance_based_decomp = true;
        }
        let s = m.render();
        assert!(s.contains("    sample_type = lhs\n"));
        assert!(s.contains("    response_levels = 0.0 1.0 2.0\n"));
        assert!(s.contains("    variance_based_decomp\n"));
        assert_eq!(line_count(&s), 9);
    }

    #[test]
    fn test_nested_levels_render_one_group_per_line() {
        let levels = Levels::PerResponse(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(levels.render(), "\n      1.0 2.0 3.0\n      4.0 5.0 6.0\n");
    }

    #[test]
    fn test_basis_family_rendered_unless_extended() {
        let mut m = Method::from_name("polynomial_chaos").unwrap();
        assert!(!m.render().contains("extended"));
        m.set_basis_polynomial_family(BasisPolynomialFamily::Askey)
            .unwrap();
        assert!(m.render().contains("    askey\n"));
    }

    #[test]
    fn test_piecewise_only_for_stoch_collocation() {
        let mut pce = Method::from_name("polynomial_chaos").unwrap();
        assert!(pce
            .set_basis_polynomial_family(BasisPolynomialFamily::Piecewise)
            .is_err());

        let mut sc = Method::from_name("stoch_collocation").unwrap();
        sc.set_basis_polynomial_family(BasisPolynomialFamily::Piecewise)
            .unwrap();
        assert!(sc.render().contains("    piecewise\n"));
    }

    #[test]
    fn test_basis_family_rejected_for_parameter_study() {
        let mut m = Method::default();
        assert!(m
            .set_basis_polynomial_family(BasisPolynomialFamily::Askey)
            .is_err());
    }

    #[test]
    fn test_polynomial_chaos_default_lines() {
        let m = Method::from_name("polynomial_chaos").unwrap();
        let s = m.render();
        assert_eq!(line_count(&s), 8);
        assert!(s.contains("    quadrature_order = 2\n    non_nested\n"));
    }

    #[test]
    fn test_dimension_preference_sets_quadrature_order() {
        let mut q = Quadrature::default();
        q.set_dimension_preference(vec![3, 4, 5]);
        assert_eq!(q.quadrature_order(), 5);

        q.set_quadrature_order(42);
        assert_eq!(q.quadrature_order(), 5);
    }

    #[test]
    fn test_quadrature_order_without_preference() {
        let mut q = Quadrature::default();
        q.set_quadrature_order(42);
        assert_eq!(q.quadrature_order(), 42);
    }

    #[test]
    fn test_polynomial_chaos_with_options() {
        let mut m = Method::from_name("polynomial_chaos").unwrap();
        {
            let q = m.kind.quadrature_mut().unwrap();
            q.set_dimension_preference(vec![1, 2]);
            q.nested = true;
        }
        let s = m.render();
        assert!(s.contains("    quadrature_order = 2\n"));
        assert!(s.contains("    dimension_preference = 1 2\n"));
        assert!(s.contains("    nested\n"));
        assert_eq!(line_count(&s), 9);
    }

    #[test]
    fn test_sample_type_parsing() {
        assert_eq!("lhs".parse::<SampleType>().unwrap(), SampleType::Lhs);
        assert!("mcmc".parse::<SampleType>().is_err());
    }
}
