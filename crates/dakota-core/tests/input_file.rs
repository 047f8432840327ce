//! Input-file rendering from configuration records.

use dakota_core::{ConfigRecord, Dakota, Experiment};
use std::fs;
use tempfile::TempDir;

const DEFAULT_INPUT: &str = "# Dakota input file
environment
  tabular_data
    tabular_data_file = 'dakota.dat'

method
  vector_parameter_study
    final_point = 1.1 1.3
    num_steps = 10

variables
  continuous_design = 2
    descriptors = 'x1' 'x2'
    initial_point = -0.3 0.2

interface
  id_interface = 'CSDMS'
  direct
  analysis_driver = 'rosenbrock'

responses
  response_functions = 1
    response_descriptors = 'y1'
  no_gradients
  no_hessians
";

const HYDROTREND_CONFIG: &str = "
plugin: hydrotrend
run_directory: /scratch/study
configuration_file: dakota.yaml
template_file: /scratch/HYDRO.IN.dtmpl
auxiliary_files: /scratch/HYDRO0.HYPS
method: centered_parameter_study
descriptors: [starting_mean_annual_temperature, total_annual_precipitation]
initial_point: [15.0, 2.0]
steps_per_variable: [2, 5]
step_vector: [2.5, 0.2]
response_descriptors: [Qs_median, Q_mean]
response_files: [HYDROASCII.QS, HYDROASCII.Q]
response_statistics: [median, mean]
";

const HYDROTREND_INPUT: &str = "# Dakota input file
environment
  tabular_data
    tabular_data_file = 'dakota.dat'

method
  centered_parameter_study
    steps_per_variable = 2 5
    step_vector = 2.5 0.2

variables
  continuous_design = 2
    descriptors = 'starting_mean_annual_temperature' 'total_annual_precipitation'
    initial_point = 15.0 2.0

interface
  id_interface = 'CSDMS'
  fork
  analysis_driver = 'dakota_run_plugin'
  analysis_components = '/scratch/study/dakota.yaml'
  parameters_file = 'params.in'
  results_file = 'results.out'
  work_directory
    named 'run'
    directory_tag
    directory_save
  file_save

responses
  response_functions = 2
    response_descriptors = 'Qs_median' 'Q_mean'
  no_gradients
  no_hessians
";

/// Test: default experiment renders the reference input file
#[test]
fn test_default_input_file() {
    assert_eq!(Experiment::default().render(), DEFAULT_INPUT);
    let from_empty = Experiment::from_config(&ConfigRecord::default()).unwrap();
    assert_eq!(from_empty.to_string(), DEFAULT_INPUT);
}

/// Test: plugin study renders the reference fork input file
#[test]
fn test_plugin_study_input_file() {
    let record = ConfigRecord::from_yaml_str(HYDROTREND_CONFIG).unwrap();
    let dakota = Dakota::from_record(&record).unwrap();
    assert_eq!(dakota.experiment.render(), HYDROTREND_INPUT);
}

/// Test: rendering the same record twice gives identical bytes
#[test]
fn test_rendering_is_deterministic() {
    for yaml in [
        "method: sampling\nvariables: normal_uncertain\nseed: 17\n",
        "method: polynomial_chaos\nvariables: uniform_uncertain\ndimension_preference: [2, 4]\n",
        "method: psuade_moat\nsamples: 20\n",
        "method: multidim_parameter_study\ninterface: fork\n",
    ] {
        let record = ConfigRecord::from_yaml_str(yaml).unwrap();
        let first = Experiment::from_config(&record).unwrap().render();
        let second = Experiment::from_config(&record).unwrap().render();
        assert_eq!(first, second, "non-deterministic rendering for {yaml:?}");
    }
}

/// Test: setup writes both files into the run directory
#[test]
fn test_setup_writes_record_and_input() {
    let dir = TempDir::new().unwrap();
    let record = ConfigRecord {
        plugin: Some("hydrotrend".to_string()),
        run_directory: Some(dir.path().join("study")),
        method: Some("sampling".to_string()),
        ..Default::default()
    };
    let mut dakota = Dakota::from_record(&record).unwrap();
    dakota.setup().unwrap();

    let input = fs::read_to_string(dir.path().join("study/dakota.in")).unwrap();
    assert_eq!(input, dakota.experiment.render());
    let expected_component = format!(
        "  analysis_components = '{}'\n",
        dir.path().join("study/dakota.yaml").display()
    );
    assert!(input.contains(&expected_component));

    let config_path = dir.path().join("study/dakota.yaml");
    let reloaded = Dakota::from_config_file(&config_path).unwrap();
    assert_eq!(reloaded.experiment.render(), input);
    assert_eq!(reloaded.configuration_file(), config_path.as_path());
}

/// Test: serialize to a new path repoints the fork interface
#[test]
fn test_serialize_to_new_path() {
    let dir = TempDir::new().unwrap();
    let record = ConfigRecord {
        plugin: Some("hydrotrend".to_string()),
        run_directory: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    let mut dakota = Dakota::from_record(&record).unwrap();

    let new_path = dir.path().join("other.yaml");
    let written = dakota.serialize(Some(&new_path)).unwrap();
    assert_eq!(written, new_path);
    assert!(new_path.exists());
    assert!(dakota
        .experiment
        .render()
        .contains(&format!("'{}'", new_path.display())));

    let loaded = ConfigRecord::load(&new_path).unwrap();
    assert_eq!(loaded.plugin.as_deref(), Some("hydrotrend"));
    assert_eq!(loaded.configuration_file.as_deref(), Some(new_path.as_path()));
}

/// Test: custom input file name
#[test]
fn test_write_input_file_with_name() {
    let dir = TempDir::new().unwrap();
    let record = ConfigRecord {
        run_directory: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    let mut dakota = Dakota::from_record(&record).unwrap();
    let path = dakota
        .write_input_file(Some(std::path::Path::new("study.in")))
        .unwrap();
    assert_eq!(path, dir.path().join("study.in"));
    assert_eq!(fs::read_to_string(path).unwrap(), DEFAULT_INPUT);
}
