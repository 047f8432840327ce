//! The five blocks of one Dakota study, rendered as an input file

use crate::blocks::interface::PLUGIN_ANALYSIS_DRIVER;
use crate::blocks::variables::ContinuousDesign;
use crate::blocks::{
    Environment, Interface, InterfaceKind, Method, MethodKind, Responses, Variables, VariablesKind,
};
use crate::config::{ConfigRecord, DEFAULT_CONFIGURATION_FILE};
use crate::error::DakotaError;
use crate::Result;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment, method, variables, interface and responses blocks.
///
/// When a plugin is named, Dakota reaches it through a fork interface
/// running `dakota_run_plugin`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Experiment {
    pub plugin: Option<String>,
    pub environment: Environment,
    pub method: Method,
    pub variables: Variables,
    pub interface: Interface,
    pub responses: Responses,
}

impl Experiment {
    /// Build an experiment from a configuration record.
    ///
    /// Block kinds come from the `method`, `variables`, `interface` and
    /// `responses` selectors; settings not used by the chosen kinds are
    /// ignored.
    pub fn from_config(record: &ConfigRecord) -> Result<Self> {
        let environment = environment_from(record)?;
        let method = method_from(record)?;
        let variables = variables_from(record, &method)?;
        let interface = interface_from(record)?;
        let responses = responses_from(record)?;

        Ok(Experiment {
            plugin: record.plugin_name().map(str::to_string),
            environment,
            method,
            variables,
            interface,
            responses,
        })
    }

    /// Block selectors and settings of this experiment as a record.
    ///
    /// Run settings (directories, file names) belong to the controller and
    /// are left unset.
    pub fn to_config(&self) -> ConfigRecord {
        let mut record = ConfigRecord {
            plugin: self.plugin.clone(),
            environment: Some("environment".to_string()),
            method: Some(self.method.name().to_string()),
            variables: Some(self.variables.name().to_string()),
            interface: Some(self.interface.name().to_string()),
            responses: Some(self.responses.name().to_string()),
            data_file: Some(self.environment.data_file.clone()),
            ..Default::default()
        };
        write_method(&self.method, &mut record);
        write_variables(&self.variables, &mut record);
        write_interface(&self.interface, &mut record);
        write_responses(&self.responses, &mut record);
        record
    }

    /// Contents of the Dakota input file.
    pub fn render(&self) -> String {
        let mut s = String::from("# Dakota input file\n");
        s.push_str(&self.environment.render());
        s.push_str(&self.method.render());
        s.push_str(&self.variables.render());
        s.push_str(&self.interface.render());
        s.push_str(&self.responses.render());
        s
    }
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Resolve `path` against the current directory.
pub(crate) fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn environment_from(record: &ConfigRecord) -> Result<Environment> {
    match record.environment.as_deref() {
        None | Some("environment") => {}
        Some(other) => return Err(DakotaError::unknown_block("environment", other)),
    }
    let mut env = Environment::default();
    if let Some(data_file) = &record.data_file {
        env.data_file = data_file.clone();
    }
    Ok(env)
}

fn method_from(record: &ConfigRecord) -> Result<Method> {
    let name = record
        .method
        .as_deref()
        .unwrap_or("vector_parameter_study");
    let mut method = Method::from_name(name)?;

    method.common.set_max_iterations(record.max_iterations);
    method
        .common
        .set_convergence_tolerance(record.convergence_tolerance)?;

    match &mut method.kind {
        MethodKind::VectorParameterStudy(m) => {
            if let Some(point) = &record.final_point {
                m.final_point = point.clone();
            }
            if let Some(n) = record.n_steps {
                m.n_steps = n;
            }
        }
        MethodKind::CenteredParameterStudy(m) => {
            if let Some(steps) = &record.steps_per_variable {
                m.steps_per_variable = steps.clone();
            }
            if let Some(vector) = &record.step_vector {
                m.step_vector = vector.clone();
            }
        }
        MethodKind::MultidimParameterStudy(m) => {
            if let Some(partitions) = &record.partitions {
                m.partitions = partitions.clone();
            }
        }
        MethodKind::PsuadeMoat(m) => {
            if let Some(partitions) = &record.partitions {
                m.partitions = match partitions.as_slice() {
                    [single] => *single,
                    _ => {
                        return Err(DakotaError::invalid_value(
                            "partitions",
                            "psuade_moat takes a single partition count",
                        ))
                    }
                };
            }
            if let Some(samples) = record.samples {
                m.samples = samples;
            }
            if let Some(seed) = record.seed {
                m.seed = seed;
            }
            m.model_pointer = record.model_pointer.clone();
        }
        MethodKind::Sampling(_)
        | MethodKind::PolynomialChaos(_)
        | MethodKind::StochasticCollocation(_) => {}
    }

    if let Some(uq) = method.kind.uncertainty_mut() {
        if let Some(sample_type) = &record.sample_type {
            uq.sample_type = sample_type.parse()?;
        }
        if let Some(samples) = record.samples {
            uq.samples = samples;
        }
        if record.seed.is_some() {
            uq.seed = record.seed;
        }
        if let Some(levels) = &record.probability_levels {
            uq.probability_levels = levels.clone();
        }
        if let Some(levels) = &record.response_levels {
            uq.response_levels = levels.clone();
        }
        if let Some(decomp) = record.variance_based_decomp {
            uq.variance_based_decomp = decomp;
        }
    }
    if let Some(family) = &record.basis_polynomial_family {
        if method.kind.uncertainty().is_some() {
            method.set_basis_polynomial_family(family.parse()?)?;
        }
    }
    if let Some(quadrature) = method.kind.quadrature_mut() {
        if let Some(weights) = &record.dimension_preference {
            quadrature.set_dimension_preference(weights.clone());
        }
        if let Some(order) = record.quadrature_order {
            quadrature.set_quadrature_order(order);
        }
        if let Some(nested) = record.nested {
            quadrature.nested = nested;
        }
    }

    Ok(method)
}

fn variables_from(record: &ConfigRecord, method: &Method) -> Result<Variables> {
    let name = record.variables.as_deref().unwrap_or("continuous_design");
    let mut variables = Variables::from_name(name)?;

    // Multidimensional studies need bounds to partition.
    let needs_bounds = matches!(method.kind, MethodKind::MultidimParameterStudy(_));
    let lower_bounds = record
        .lower_bounds
        .clone()
        .or_else(|| needs_bounds.then(|| vec![-2.0, -2.0]));
    let upper_bounds = record
        .upper_bounds
        .clone()
        .or_else(|| needs_bounds.then(|| vec![2.0, 2.0]));

    match &mut variables.kind {
        VariablesKind::ContinuousDesign(v) => {
            *v = ContinuousDesign::new(
                record.initial_point.clone(),
                lower_bounds,
                upper_bounds,
            );
        }
        VariablesKind::NormalUncertain(v) => {
            if record.means.is_some() {
                v.means = record.means.clone();
            }
            if record.std_deviations.is_some() {
                v.std_deviations = record.std_deviations.clone();
            }
            v.lower_bounds = lower_bounds;
            v.upper_bounds = upper_bounds;
            v.initial_point = record.initial_point.clone();
        }
        VariablesKind::UniformUncertain(v) => {
            if lower_bounds.is_some() {
                v.lower_bounds = lower_bounds;
            }
            if upper_bounds.is_some() {
                v.upper_bounds = upper_bounds;
            }
            v.initial_point = record.initial_point.clone();
        }
    }

    if let Some(descriptors) = &record.descriptors {
        variables.set_descriptors(descriptors.clone())?;
    }
    Ok(variables)
}

fn interface_from(record: &ConfigRecord) -> Result<Interface> {
    let name = if record.plugin_name().is_some() {
        "fork"
    } else {
        record.interface.as_deref().unwrap_or("direct")
    };
    let mut interface = Interface::from_name(name)?;

    if let Some(id) = &record.id_interface {
        interface.id_interface = id.clone();
    }
    if let Some(driver) = &record.analysis_driver {
        interface.analysis_driver = driver.clone();
    } else if record.plugin_name().is_some() {
        interface.analysis_driver = PLUGIN_ANALYSIS_DRIVER.to_string();
    }
    if let Some(asynchronous) = record.asynchronous {
        interface.asynchronous = asynchronous;
    }
    if let Some(concurrency) = record.evaluation_concurrency {
        interface.evaluation_concurrency = concurrency;
    }

    if let InterfaceKind::Fork(fork) = &mut interface.kind {
        let configuration_file = match (&record.run_directory, &record.configuration_file) {
            (Some(dir), Some(file)) => dir.join(file),
            (None, Some(file)) => file.clone(),
            _ => PathBuf::from(DEFAULT_CONFIGURATION_FILE),
        };
        fork.configuration_file = absolute(&configuration_file)?;
        if let Some(file) = &record.parameters_file {
            fork.parameters_file = file.to_string_lossy().into_owned();
        }
        if let Some(file) = &record.results_file {
            fork.results_file = file.to_string_lossy().into_owned();
        }
        if let Some(dir) = &record.work_directory {
            fork.work_directory = dir.clone();
        }
    }

    Ok(interface)
}

fn responses_from(record: &ConfigRecord) -> Result<Responses> {
    let name = record.responses.as_deref().unwrap_or("response_functions");
    let mut responses = Responses::from_name(name)?;

    if let Some(descriptors) = &record.response_descriptors {
        responses.response_descriptors = descriptors.clone();
    }
    if let Some(files) = &record.response_files {
        responses.response_files = files.clone();
    }
    if let Some(statistics) = &record.response_statistics {
        responses.response_statistics = statistics.clone();
    }
    if let Some(gradients) = &record.gradients {
        responses.gradients = gradients.clone();
    }
    if let Some(hessians) = &record.hessians {
        responses.hessians = hessians.clone();
    }
    Ok(responses)
}

fn write_method(method: &Method, record: &mut ConfigRecord) {
    record.max_iterations = method.common.max_iterations();
    record.convergence_tolerance = method.common.convergence_tolerance();

    match &method.kind {
        MethodKind::VectorParameterStudy(m) => {
            record.final_point = Some(m.final_point.clone());
            record.n_steps = Some(m.n_steps);
        }
        MethodKind::CenteredParameterStudy(m) => {
            record.steps_per_variable = Some(m.steps_per_variable.clone());
            record.step_vector = Some(m.step_vector.clone());
        }
        MethodKind::MultidimParameterStudy(m) => {
            record.partitions = Some(m.partitions.clone());
        }
        MethodKind::PsuadeMoat(m) => {
            record.partitions = Some(vec![m.partitions]);
            record.samples = Some(m.samples);
            record.seed = Some(m.seed);
            record.model_pointer = m.model_pointer.clone();
        }
        MethodKind::Sampling(_)
        | MethodKind::PolynomialChaos(_)
        | MethodKind::StochasticCollocation(_) => {}
    }

    if let Some(uq) = method.kind.uncertainty() {
        record.sample_type = Some(uq.sample_type.to_string());
        record.samples = Some(uq.samples);
        record.seed = uq.seed;
        record.probability_levels = Some(uq.probability_levels.clone());
        record.response_levels = (!uq.response_levels.is_empty()).then(|| uq.response_levels.clone());
        record.variance_based_decomp = Some(uq.variance_based_decomp);
        record.basis_polynomial_family = Some(uq.basis_polynomial_family().to_string());
    }
    if let Some(q) = method.kind.quadrature() {
        record.quadrature_order = Some(q.quadrature_order());
        record.dimension_preference =
            (!q.dimension_preference().is_empty()).then(|| q.dimension_preference().to_vec());
        record.nested = Some(q.nested);
    }
}

fn write_variables(variables: &Variables, record: &mut ConfigRecord) {
    record.descriptors = Some(variables.descriptors().to_vec());
    match &variables.kind {
        VariablesKind::ContinuousDesign(v) => {
            record.initial_point = v.initial_point.clone();
            record.lower_bounds = v.lower_bounds.clone();
            record.upper_bounds = v.upper_bounds.clone();
        }
        VariablesKind::NormalUncertain(v) => {
            record.means = v.means.clone();
            record.std_deviations = v.std_deviations.clone();
            record.lower_bounds = v.lower_bounds.clone();
            record.upper_bounds = v.upper_bounds.clone();
            record.initial_point = v.initial_point.clone();
        }
        VariablesKind::UniformUncertain(v) => {
            record.lower_bounds = v.lower_bounds.clone();
            record.upper_bounds = v.upper_bounds.clone();
            record.initial_point = v.initial_point.clone();
        }
    }
}

fn write_interface(interface: &Interface, record: &mut ConfigRecord) {
    record.id_interface = Some(interface.id_interface.clone());
    record.analysis_driver = Some(interface.analysis_driver.clone());
    record.asynchronous = Some(interface.asynchronous);
    record.evaluation_concurrency = Some(interface.evaluation_concurrency);
    if let Some(fork) = interface.fork_settings() {
        record.parameters_file = Some(PathBuf::from(&fork.parameters_file));
        record.results_file = Some(PathBuf::from(&fork.results_file));
        record.work_directory = Some(fork.work_directory.clone());
    }
}

fn write_responses(responses: &Responses, record: &mut ConfigRecord) {
    record.response_descriptors = Some(responses.response_descriptors.clone());
    record.response_files = Some(responses.response_files.clone());
    record.response_statistics = Some(responses.response_statistics.clone());
    record.gradients = Some(responses.gradients.clone());
    record.hessians = Some(responses.hessians.clone());
}
