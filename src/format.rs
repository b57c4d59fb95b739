//! Design-document format bridge
//!
//! A design document lives in exactly one of three interchangeable
//! encodings, selected by file extension: JSON, TOML, or YAML. Loading
//! converts everything into a `serde_json::Value` tree; key order is
//! preserved end to end so authored field order is not scrambled by a
//! conversion. Each writer is an independent output target.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::docpath::DocPath;
use crate::error::{DesignError, Result};

/// Encoding of a design file, selected by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignFormat {
    Json,
    Toml,
    Yaml,
}

impl DesignFormat {
    /// Detect the format from a file extension. Anything other than
    /// `.json`, `.toml`, or `.yaml` is a fatal startup error.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            Some("yaml") => Ok(Self::Yaml),
            _ => Err(DesignError::UnknownExtension(path.display().to_string())),
        }
    }
}

/// Load a design document, decoding by extension.
pub fn load_design(path: &Path) -> Result<Value> {
    let format = DesignFormat::from_path(path)?;
    let content = fs::read_to_string(path)?;
    decode(&content, format)
}

/// Decode design-document text in the given format.
pub fn decode(content: &str, format: DesignFormat) -> Result<Value> {
    match format {
        DesignFormat::Json => Ok(serde_json::from_str(content)?),
        DesignFormat::Yaml => {
            let value: serde_yaml::Value = serde_yaml::from_str(content)?;
            yaml_to_json(&value)
        }
        DesignFormat::Toml => {
            let table: toml::Table = toml::from_str(content)?;
            toml_to_json(&toml::Value::Table(table))
        }
    }
}

/// Render a document as JSON text: 4-space indentation, keys in
/// insertion order.
pub fn to_json_string(design: &Value) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    design.serialize(&mut serializer)?;
    String::from_utf8(buffer)
        .map_err(|error| DesignError::Decode(format!("produced non-UTF-8 JSON: {error}")))
}

/// Write the document as JSON.
pub fn write_json(design: &Value, path: &Path) -> Result<()> {
    let mut text = to_json_string(design)?;
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}

/// Write the document as YAML, block style, keys in insertion order.
pub fn write_yaml(design: &Value, path: &Path) -> Result<()> {
    let text = serde_yaml::to_string(design)?;
    fs::write(path, text)?;
    Ok(())
}

/// Write the document as TOML, keys in insertion order.
pub fn write_toml(design: &Value, path: &Path) -> Result<()> {
    let toml::Value::Table(table) = json_to_toml(design, &DocPath::root())? else {
        return Err(DesignError::TomlEncode(
            "design document must be a table".to_string(),
        ));
    };
    let text = toml::to_string_pretty(&table)?;
    fs::write(path, text)?;
    Ok(())
}

/// Convert a YAML value tree into the equivalent JSON tree.
///
/// YAML has a richer type system (tags, non-string keys) but design
/// documents use only the JSON-compatible subset.
fn yaml_to_json(value: &serde_yaml::Value) -> Result<Value> {
    match value {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(flag) => Ok(Value::Bool(*flag)),
        serde_yaml::Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                Ok(Value::Number(integer.into()))
            } else if let Some(unsigned) = number.as_u64() {
                Ok(Value::Number(unsigned.into()))
            } else if let Some(float) = number.as_f64() {
                serde_json::Number::from_f64(float)
                    .map(Value::Number)
                    .ok_or_else(|| {
                        DesignError::Decode(format!("cannot represent float {float} in JSON"))
                    })
            } else {
                Err(DesignError::Decode(format!(
                    "unsupported YAML number: {number:?}"
                )))
            }
        }
        serde_yaml::Value::String(text) => Ok(Value::String(text.clone())),
        serde_yaml::Value::Sequence(items) => {
            let converted: Result<Vec<Value>> = items.iter().map(yaml_to_json).collect();
            Ok(Value::Array(converted?))
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, entry) in mapping {
                let key = match key {
                    serde_yaml::Value::String(text) => text.clone(),
                    serde_yaml::Value::Number(number) => number.to_string(),
                    serde_yaml::Value::Bool(flag) => flag.to_string(),
                    other => {
                        return Err(DesignError::Decode(format!(
                            "unsupported YAML map key: {other:?}"
                        )))
                    }
                };
                map.insert(key, yaml_to_json(entry)?);
            }
            Ok(Value::Object(map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

/// Convert a TOML value tree into the equivalent JSON tree.
fn toml_to_json(value: &toml::Value) -> Result<Value> {
    match value {
        toml::Value::String(text) => Ok(Value::String(text.clone())),
        toml::Value::Integer(integer) => Ok(Value::Number((*integer).into())),
        toml::Value::Float(float) => serde_json::Number::from_f64(*float)
            .map(Value::Number)
            .ok_or_else(|| DesignError::Decode(format!("cannot represent float {float} in JSON"))),
        toml::Value::Boolean(flag) => Ok(Value::Bool(*flag)),
        toml::Value::Datetime(datetime) => Ok(Value::String(datetime.to_string())),
        toml::Value::Array(items) => {
            let converted: Result<Vec<Value>> = items.iter().map(toml_to_json).collect();
            Ok(Value::Array(converted?))
        }
        toml::Value::Table(table) => {
            let mut map = Map::new();
            for (key, entry) in table {
                map.insert(key.clone(), toml_to_json(entry)?);
            }
            Ok(Value::Object(map))
        }
    }
}

/// Convert a JSON value tree into the equivalent TOML tree. `null` has
/// no TOML representation and is rejected with the offending path.
fn json_to_toml(value: &Value, path: &DocPath) -> Result<toml::Value> {
    match value {
        Value::Null => Err(DesignError::TomlEncode(format!(
            "null value at {path} has no TOML representation"
        ))),
        Value::Bool(flag) => Ok(toml::Value::Boolean(*flag)),
        Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                Ok(toml::Value::Integer(integer))
            } else if let Some(float) = number.as_f64() {
                Ok(toml::Value::Float(float))
            } else {
                Err(DesignError::TomlEncode(format!(
                    "number {number} at {path} does not fit a TOML value"
                )))
            }
        }
        Value::String(text) => Ok(toml::Value::String(text.clone())),
        Value::Array(items) => {
            let converted: Result<Vec<toml::Value>> = items
                .iter()
                .enumerate()
                .map(|(index, item)| json_to_toml(item, &path.index(index)))
                .collect();
            Ok(toml::Value::Array(converted?))
        }
        Value::Object(map) => {
            let mut table = toml::Table::new();
            for (key, entry) in map {
                table.insert(key.clone(), json_to_toml(entry, &path.key(key))?);
            }
            Ok(toml::Value::Table(table))
        }
    }
}
