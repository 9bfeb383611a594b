//! Shared CLI utilities.

use anyhow::{Context, Result};
use serde_json::Value;

use super::OutputFormat;

/// Render a configuration value in the requested format, newline-terminated.
///
/// TOML has no null and needs a table at the top level, so scalars and arrays
/// are written as inline TOML values.
pub fn render(value: &Value, format: OutputFormat) -> Result<String> {
    let mut out = match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).context("Failed to render configuration as YAML")?
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).context("Failed to render configuration as JSON")?
        }
        OutputFormat::Toml if value.is_object() => {
            toml::to_string_pretty(value).context("Failed to render configuration as TOML")?
        }
        OutputFormat::Toml => toml::Value::try_from(value)
            .context("Failed to render configuration as TOML")?
            .to_string(),
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_yaml() {
        let value = json!({"processors": {"batch": {"timeout": "2s"}}});
        let out = render(&value, OutputFormat::Yaml).expect("yaml");
        assert_eq!(out, "processors:\n  batch:\n    timeout: 2s\n");
    }

    #[test]
    fn test_render_json_is_newline_terminated() {
        let out = render(&json!({"a": 1}), OutputFormat::Json).expect("json");
        assert_eq!(out, "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn test_render_toml_table_and_scalar() {
        let out = render(&json!({"a": {"b": 1}}), OutputFormat::Toml).expect("toml");
        assert!(out.contains("[a]"));
        assert!(out.contains("b = 1"));

        let out = render(&json!([1, 2]), OutputFormat::Toml).expect("toml array");
        assert_eq!(out, "[1, 2]\n");
    }

    #[test]
    fn test_render_toml_rejects_null() {
        assert!(render(&json!({"a": null}), OutputFormat::Toml).is_err());
    }
}
