//! Model input templates
//!
//! A template is a model input file in which each study variable's value
//! is replaced by `{descriptor}`. Each evaluation fills the placeholders
//! with the values from its parameters file.

use crate::error::PluginError;
use crate::Result;
use dakota_core::Variable;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Replace every `{descriptor}` of the given variables with its value.
///
/// Braces around any other text are left as they are.
pub fn expand_template(template: &str, variables: &[Variable]) -> String {
    variables.iter().fold(template.to_string(), |text, var| {
        text.replace(&format!("{{{}}}", var.descriptor), &var.value)
    })
}

/// Expand `template_file` into `output_file`.
pub fn expand_template_file(
    template_file: &Path,
    variables: &[Variable],
    output_file: &Path,
) -> Result<()> {
    let template = fs::read_to_string(template_file)?;
    fs::write(output_file, expand_template(&template, variables))?;
    debug!(
        template = %template_file.display(),
        output = %output_file.display(),
        variables = variables.len(),
        "Expanded template"
    );
    Ok(())
}

/// Derive a template from a model input file.
///
/// `base_template` is a complete template for the model and
/// `base_input` an input file with the same line layout. For each name
/// in `names`, every line of `base_template` mentioning it has the
/// matching fields of the `base_input` line replaced by `{name}`; those
/// lines are rewritten with single spaces between fields. The result is
/// written to `output_file`.
pub fn write_template(
    base_template: &Path,
    base_input: &Path,
    names: &[String],
    output_file: &Path,
) -> Result<()> {
    let template_text = fs::read_to_string(base_template)?;
    let input_text = fs::read_to_string(base_input)?;
    let template_lines: Vec<&str> = template_text.split('\n').collect();
    let mut input_lines: Vec<String> = input_text.split('\n').map(str::to_string).collect();

    if template_lines.len() != input_lines.len() {
        return Err(PluginError::TemplateMismatch {
            template_lines: template_lines.len(),
            input_lines: input_lines.len(),
        });
    }

    for name in names {
        let placeholder = format!("{{{name}}}");
        let prefix = format!("{{{name}");
        for (i, template_line) in template_lines.iter().enumerate() {
            if !template_line.contains(name.as_str()) {
                continue;
            }
            let mut fields: Vec<String> = input_lines[i]
                .split_whitespace()
                .map(str::to_string)
                .collect();
            for (j, item) in template_line.split_whitespace().enumerate() {
                if item.starts_with(&prefix) && j < fields.len() {
                    fields[j] = placeholder.clone();
                }
            }
            input_lines[i] = fields.join(" ");
        }
    }

    fs::write(output_file, input_lines.join("\n"))?;
    Ok(())
}
