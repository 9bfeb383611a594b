//! Properties-format decoder
//!
//! Reads `key=value` documents into a [`ConfigStore`]. The line syntax follows
//! Java `.properties` files:
//!
//! - `#` and `!` start comment lines, blank lines are skipped
//! - the key ends at the first unescaped `=`, `:` or whitespace
//! - a trailing backslash continues the logical line
//! - `\t \n \r \f \uXXXX` escapes; any other escaped char stands for itself
//! - `${other.key}` expands to the value of another key in the same document
//!
//! Values are then typed by reading them as YAML flow values, so `1` is an
//! integer, `true` a bool, `[1,2]` an array, `{a: 1}` a map and `2s` stays a
//! string. Anything YAML rejects stays the raw string.
//!
//! Typing applies to every value, so version-like values are numbers:
//! `ver=1.10` becomes the float `1.1`. Quote them (`ver="1.10"`) to keep the
//! text as written.

use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use super::store::{ConfigStore, StoreError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertiesError {
    #[error("line {line}: property has an empty key")]
    EmptyKey { line: usize },

    #[error("line {line}: malformed \\uXXXX escape")]
    InvalidUnicodeEscape { line: usize },

    #[error("circular reference to key '{key}'")]
    CircularReference { key: String },

    #[error("invalid key '{key}': {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: StoreError,
    },
}

/// One `key=value` pair with escapes already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Property {
    key: String,
    value: String,
}

/// Decode a properties document into a configuration tree.
pub fn decode(input: &str) -> Result<ConfigStore, PropertiesError> {
    let properties = parse_properties(input)?;
    let expanded = expand_references(&properties)?;

    let mut store = ConfigStore::new();
    for (key, raw) in expanded {
        store
            .set(&key, coerce_value(&raw))
            .map_err(|source| PropertiesError::InvalidKey { key: key.clone(), source })?;
    }
    Ok(store)
}

/// Parse the document into properties, later definitions of a key replacing
/// earlier ones.
fn parse_properties(input: &str) -> Result<Vec<Property>, PropertiesError> {
    let mut properties: Vec<Property> = Vec::new();
    for (line_no, logical) in logical_lines(input) {
        let property = parse_line(&logical, line_no)?;
        properties.retain(|p| p.key != property.key);
        properties.push(property);
    }
    Ok(properties)
}

/// Join continuation lines, drop comments and blanks. Yields the 1-based
/// number of the first physical line with each logical line.
fn logical_lines(input: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut physical = input.lines().enumerate();

    while let Some((idx, line)) = physical.next() {
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let mut logical = line.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match physical.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }
        out.push((idx + 1, logical));
    }
    out
}

fn ends_with_continuation(line: &str) -> bool {
    let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
    trailing % 2 == 1
}

fn parse_line(line: &str, line_no: usize) -> Result<Property, PropertiesError> {
    let chars: Vec<char> = line.chars().collect();

    let mut key_end = chars.len();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if c.is_whitespace() => {
                key_end = i;
                break;
            }
            _ => i += 1,
        }
    }
    let key_end = key_end.min(chars.len());

    let mut value_start = key_end;
    while value_start < chars.len() && chars[value_start].is_whitespace() {
        value_start += 1;
    }
    if value_start < chars.len() && matches!(chars[value_start], '=' | ':') {
        value_start += 1;
        while value_start < chars.len() && chars[value_start].is_whitespace() {
            value_start += 1;
        }
    }

    let raw_key: String = chars[..key_end].iter().collect();
    let raw_value: String = chars[value_start..].iter().collect();

    let key = unescape(&raw_key, line_no)?;
    if key.is_empty() {
        return Err(PropertiesError::EmptyKey { line: line_no });
    }
    let value = unescape(&raw_value, line_no)?;
    Ok(Property { key, value })
}

fn unescape(raw: &str, line_no: usize) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let high = read_hex4(&mut chars, line_no)?;
                let decoded = if (0xD800..0xDC00).contains(&high) {
                    // Surrogate pair: the low half must follow as another \u escape.
                    if chars.next() != Some('\\') || chars.next() != Some('u') {
                        return Err(PropertiesError::InvalidUnicodeEscape { line: line_no });
                    }
                    let low = read_hex4(&mut chars, line_no)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(PropertiesError::InvalidUnicodeEscape { line: line_no });
                    }
                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    high
                };
                let ch = char::from_u32(decoded)
                    .ok_or(PropertiesError::InvalidUnicodeEscape { line: line_no })?;
                out.push(ch);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

fn read_hex4(chars: &mut std::str::Chars<'_>, line_no: usize) -> Result<u32, PropertiesError> {
    let mut code = 0u32;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or(PropertiesError::InvalidUnicodeEscape { line: line_no })?;
        code = code * 16 + digit;
    }
    Ok(code)
}

/// Resolve `${key}` references against the other properties of the document.
/// References to keys that are not defined here are left untouched.
fn expand_references(properties: &[Property]) -> Result<Vec<(String, String)>, PropertiesError> {
    let defined: HashMap<&str, &str> =
        properties.iter().map(|p| (p.key.as_str(), p.value.as_str())).collect();

    properties
        .iter()
        .map(|p| {
            let mut stack = vec![p.key.clone()];
            let value = expand_value(&p.value, &defined, &mut stack)?;
            Ok((p.key.clone(), value))
        })
        .collect()
}

fn expand_value(
    value: &str,
    defined: &HashMap<&str, &str>,
    stack: &mut Vec<String>,
) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return Ok(out);
        };

        let name = &after[..end];
        match defined.get(name) {
            Some(target) => {
                if stack.iter().any(|k| k == name) {
                    return Err(PropertiesError::CircularReference { key: name.to_string() });
                }
                stack.push(name.to_string());
                out.push_str(&expand_value(target, defined, stack)?);
                stack.pop();
            }
            None => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Type a raw property value.
fn coerce_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() || raw.contains(char::is_control) {
        return Value::String(raw.to_string());
    }

    let Ok(parsed) = serde_yaml::from_str::<Value>(trimmed) else {
        return Value::String(raw.to_string());
    };

    // Only flow collections count; block syntax such as `a: b` or `- a` and
    // comment-only values stay plain strings.
    let accepted = match &parsed {
        Value::Object(_) => trimmed.starts_with('{'),
        Value::Array(_) => trimmed.starts_with('['),
        Value::Null => matches!(trimmed, "null" | "Null" | "NULL" | "~"),
        _ => true,
    };
    if accepted {
        parsed
    } else {
        Value::String(raw.to_string())
    }
}
