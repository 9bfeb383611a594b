//! Hierarchical key-value store addressed by dot-delimited keys

use serde_json::{Map, Value};
use thiserror::Error;

/// Separator between the segments of a hierarchical key.
pub const KEY_DELIMITER: char = '.';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid key '{0}': key segments cannot be empty")]
    InvalidKey(String),

    #[error("Configuration root must be a map")]
    NotAMap,
}

/// In-memory configuration tree.
///
/// The root is always a map. Keys such as `processors.batch.timeout` walk
/// nested maps one segment at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigStore {
    root: Map<String, Value>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-parsed tree. `null` (an empty YAML document) becomes an
    /// empty store.
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            Value::Null => Ok(Self::new()),
            _ => Err(StoreError::NotAMap),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// Every leaf key, sorted. Empty maps contribute no key.
    pub fn all_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .leaves()
            .into_iter()
            .map(|(path, _)| join_key(&path))
            .collect();
        keys.sort();
        keys
    }

    /// Every leaf as its path segments and value, in map order.
    ///
    /// Segments are kept apart, so a map key that itself contains the
    /// delimiter stays a single segment.
    pub fn leaves(&self) -> Vec<(Vec<String>, &Value)> {
        let mut out = Vec::new();
        collect_leaves(&self.root, &mut Vec::new(), &mut out);
        out
    }

    /// Look up a leaf or a whole sub-tree.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split(KEY_DELIMITER);
        let first = segments.next()?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Set `key` to `value`, creating intermediate maps as needed.
    ///
    /// Sibling keys along the path are kept. A scalar or array sitting where
    /// the path needs a map is replaced by a new map.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        let segments: Vec<&str> = key.split(KEY_DELIMITER).collect();
        self.set_path(&segments, value)
    }

    /// Same as [`ConfigStore::set`] with the key already split into segments.
    pub fn set_path<S: AsRef<str>>(&mut self, path: &[S], value: Value) -> Result<(), StoreError> {
        let invalid = || StoreError::InvalidKey(join_key(path));
        if path.iter().any(|s| s.as_ref().is_empty()) {
            return Err(invalid());
        }

        let (last, parents) = path.split_last().ok_or_else(invalid)?;
        let mut current = &mut self.root;
        for segment in parents {
            let slot = current
                .entry(segment.as_ref().to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = slot.as_object_mut().ok_or(StoreError::NotAMap)?;
        }
        current.insert(last.as_ref().to_string(), value);
        Ok(())
    }
}

/// Join path segments back into a dot-delimited key.
pub fn join_key<S: AsRef<str>>(path: &[S]) -> String {
    let mut key = String::new();
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            key.push(KEY_DELIMITER);
        }
        key.push_str(segment.as_ref());
    }
    key
}

fn collect_leaves<'a>(
    map: &'a Map<String, Value>,
    prefix: &mut Vec<String>,
    out: &mut Vec<(Vec<String>, &'a Value)>,
) {
    for (name, value) in map {
        prefix.push(name.clone());
        match value {
            Value::Object(child) => collect_leaves(child, prefix, out),
            _ => out.push((prefix.clone(), value)),
        }
        prefix.pop();
    }
}
