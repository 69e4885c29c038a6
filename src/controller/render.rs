//! Configuration file rendering
//!
//! A resource's records are fed to a Jinja-style template (minijinja) as the
//! sequence `records`, and the result replaces the output file. Rendering
//! happens in memory first, so a broken template leaves the previous file
//! untouched.
//!
//! Besides the minijinja builtins, templates get a `quote` filter that emits
//! a double-quoted string safe to embed in YAML.

use minijinja::{context, AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to read template {path}: {source}")]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template {path} failed: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Quote a value as a JSON string, which YAML accepts as a double-quoted scalar
fn quote(value: String) -> String {
    serde_json::Value::String(value).to_string()
}

/// Render `source` with `records` bound to the template variable `records`
///
/// Undefined variables are errors, and a trailing newline in the template
/// is kept. Output is never HTML-escaped, whatever the template file is named.
pub fn render_template<T: Serialize>(
    name: &str,
    source: &str,
    records: &[T],
) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_filter("quote", quote);
    env.add_template(name, source)?;

    env.get_template(name)?.render(context! { records => records })
}

/// Render `template` against `records` and write the result to `output`
///
/// An existing output file is truncated.
pub async fn render_to_file<T: Serialize>(
    output: &Path,
    template: &Path,
    records: &[T],
) -> Result<(), RenderError> {
    let source =
        tokio::fs::read_to_string(template)
            .await
            .map_err(|source| RenderError::ReadTemplate {
                path: template.to_path_buf(),
                source,
            })?;

    let name = template.display().to_string();
    let rendered =
        render_template(&name, &source, records).map_err(|source| RenderError::Template {
            path: template.to_path_buf(),
            source,
        })?;
    debug!(template = %name, bytes = rendered.len(), "Rendered template");

    tokio::fs::write(output, rendered.as_bytes())
        .await
        .map_err(|source| RenderError::WriteOutput {
            path: output.to_path_buf(),
            source,
        })?;

    info!(
        output = %output.display(),
        records = records.len(),
        "Wrote configuration file"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[path = "render_test.rs"]
mod tests;
