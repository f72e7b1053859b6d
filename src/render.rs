//! Rendering of the frontend configuration module.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::{ConfigField, DeploymentConfig};
use crate::errors::ConfigError;

/// Header carried over from the hand-maintained files; it documents
/// where the values come from.
const PROVENANCE_HEADER: &str = "// You can obtain these values by running:\n\
     // aws cloudformation describe-stacks --stack-name <YOUR STACK NAME> --query \"Stacks[0].Outputs[]\"\n";

/// Column the per-field output-key annotations start at.
const ANNOTATION_COLUMN: usize = 72;

/// Render the `config.js` module the frontend imports.
///
/// Each entry is annotated with the stack output key the value was
/// copied from, same as the hand-maintained files were.
pub fn render_js(config: &DeploymentConfig) -> String {
    let mut out = String::new();
    out.push_str(PROVENANCE_HEADER);
    out.push('\n');
    out.push_str("const config = {\n");
    for (index, field) in ConfigField::ALL.iter().enumerate() {
        let comma = if index + 1 == ConfigField::ALL.len() {
            ""
        } else {
            ","
        };
        let entry = format!(
            "  \"{}\": \"{}\"{}",
            field.key(),
            escape_js(config.field(*field)),
            comma
        );
        out.push_str(&annotated(&entry, field.cloudformation_key()));
        out.push('\n');
    }
    out.push_str("};\n\nexport default config;\n");
    out
}

/// Render the configuration as pretty JSON.
pub fn render_json(config: &DeploymentConfig) -> Result<String, ConfigError> {
    let mut json = serde_json::to_string_pretty(config)?;
    json.push('\n');
    Ok(json)
}

/// Write rendered contents, creating parent directories as needed.
pub fn write_config_file(path: &Path, contents: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(path, contents).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote configuration file");
    Ok(())
}

fn annotated(entry: &str, output_key: &str) -> String {
    let mut line = String::from(entry);
    if line.len() < ANNOTATION_COLUMN {
        line.push_str(&" ".repeat(ANNOTATION_COLUMN - line.len()));
    } else {
        line.push(' ');
    }
    line.push_str("// ");
    line.push_str(output_key);
    line
}

fn escape_js(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}
