//! Config file loading

use anyhow::{Context, Result};
use figment::providers::Serialized;
use figment::Figment;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use super::store::ConfigStore;

/// Load and layer config files in order. Later files deep-merge over earlier
/// ones; no files gives an empty store.
pub fn load_files(paths: &[PathBuf]) -> Result<ConfigStore> {
    let mut figment = Figment::new();

    for path in paths {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed reading config file: {}", path.display()))?;

        let parsed = parse_config_file(&content, path)?;
        let is_empty = match &parsed {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if is_empty {
            tracing::warn!("Config file {} is empty, skipping", path.display());
            continue;
        }
        if !parsed.is_object() {
            anyhow::bail!("Config file {} must contain a map at the top level", path.display());
        }

        figment = figment.merge(Serialized::defaults(parsed));
        tracing::debug!("Layered config file {}", path.display());
    }

    let value: Value =
        figment.extract().context("Failed to extract configuration from config files")?;
    ConfigStore::from_value(value).context("Invalid configuration")
}

/// Parse one file by extension. A document with no content (blank or
/// comments only) comes back as `Value::Null`.
fn parse_config_file(content: &str, path: &Path) -> Result<Value> {
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "yaml" | "yml" => {
            let raw: serde_yaml::Value = serde_yaml::from_str(content)
                .with_context(|| format!("Invalid YAML syntax: {}", path.display()))?;
            serde_json::to_value(raw)
                .with_context(|| format!("Invalid YAML config: {}", path.display()))
        }
        "toml" => {
            let raw: toml::Table = toml::from_str(content)
                .with_context(|| format!("Invalid TOML syntax: {}", path.display()))?;
            serde_json::to_value(raw)
                .with_context(|| format!("Invalid TOML config: {}", path.display()))
        }
        "json" => serde_json::from_str(content)
            .with_context(|| format!("Invalid JSON syntax: {}", path.display())),
        other => anyhow::bail!(
            "Unsupported config extension '.{}' for file {}",
            other,
            path.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_no_files_gives_empty_store() {
        let store = load_files(&[]).expect("config");
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_yaml_config() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.yaml");
        fs::write(
            &path,
            "receivers:\n  otlp:\n    protocols:\n      grpc:\nprocessors:\n  batch:\n    timeout: 1s\n",
        )
        .expect("write");

        let store = load_files(&[path]).expect("config");
        assert_eq!(store.get("processors.batch.timeout"), Some(&json!("1s")));
        assert_eq!(store.get("receivers.otlp.protocols.grpc"), Some(&Value::Null));
    }

    #[test]
    fn test_later_files_merge_over_earlier() {
        let tmp = TempDir::new().expect("tmp");
        let base = tmp.path().join("base.yaml");
        let local = tmp.path().join("local.toml");
        fs::write(&base, "processors:\n  batch:\n    timeout: 1s\n    send_batch_size: 100\n")
            .expect("write");
        fs::write(&local, "[processors.batch]\ntimeout = \"5s\"\n").expect("write");

        let store = load_files(&[base, local]).expect("config");
        assert_eq!(store.get("processors.batch.timeout"), Some(&json!("5s")));
        assert_eq!(store.get("processors.batch.send_batch_size"), Some(&json!(100)));
    }

    #[test]
    fn test_load_json_config() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"exporters": {"debug": {"verbosity": "basic"}}}"#).expect("write");

        let store = load_files(&[path]).expect("config");
        assert_eq!(store.get("exporters.debug.verbosity"), Some(&json!("basic")));
    }

    #[test]
    fn test_empty_file_is_skipped() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("empty.yaml");
        fs::write(&path, "\n").expect("write");

        let store = load_files(&[path]).expect("config");
        assert!(store.is_empty());
    }

    #[test]
    fn test_comment_only_yaml_is_skipped() {
        let tmp = TempDir::new().expect("tmp");
        let comments = tmp.path().join("comments.yaml");
        let base = tmp.path().join("base.yaml");
        fs::write(&comments, "# nothing configured yet\n# receivers:\n").expect("write");
        fs::write(&base, "exporters:\n  debug:\n    verbosity: basic\n").expect("write");

        let store = load_files(&[comments.clone()]).expect("config");
        assert!(store.is_empty());

        let store = load_files(&[base, comments]).expect("config");
        assert_eq!(store.get("exporters.debug.verbosity"), Some(&json!("basic")));
    }

    #[test]
    fn test_scalar_document_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("scalar.yaml");
        fs::write(&path, "just a string\n").expect("write");

        let err = load_files(&[path]).expect_err("scalar root");
        assert!(err.to_string().contains("must contain a map"));
    }

    #[test]
    fn test_missing_file_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let result = load_files(&[tmp.path().join("missing.yaml")]);
        assert!(result.is_err(), "missing config file should return Err");
    }

    #[test]
    fn test_unsupported_extension_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.ini");
        fs::write(&path, "a=1\n").expect("write");

        let err = load_files(&[path]).expect_err("unsupported extension");
        assert!(err.to_string().contains("Unsupported config extension '.ini'"));
    }

    #[test]
    fn test_invalid_yaml_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.yaml");
        fs::write(&path, "receivers: [unclosed\n").expect("write");

        assert!(load_files(&[path]).is_err(), "invalid YAML should return Err");
    }
}
