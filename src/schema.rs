//! Schema node model
//!
//! The design schema is a fixed dialect: `object`/`array`/`string`/
//! `number`/`boolean` types, `enum` literal sets, `$ref` pointers,
//! `default` values, numeric bounds, and an authoring-time `optional`
//! marker. [`SchemaNode`] is a tagged variant over those node kinds, each
//! carrying only its relevant attributes. Keywords the pipeline does not
//! interpret (`pattern`, `format`, `title`, ...) ride along in a `rest`
//! map so rendering a node back to JSON reproduces the authored schema.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{DesignError, Result};
use crate::resolve::SchemaPointer;

/// Annotations shared by every typed schema node
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    /// Human-readable description
    pub description: Option<String>,
    /// Authoring-time marker excluding this node from its parent's `required` set
    pub optional: bool,
    /// Value injected when the corresponding key is absent from the instance
    pub default: Option<Value>,
    /// Literal example values
    pub examples: Option<Vec<Value>>,
    /// Keywords not interpreted by this crate, preserved verbatim
    pub rest: Map<String, Value>,
}

/// An `object`-typed node
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    pub meta: Annotations,
    /// Declared properties in authored order, `None` if the key was not authored
    pub properties: Option<IndexMap<String, SchemaNode>>,
    /// Required property names. Computed by normalization, never authored.
    pub required: Vec<String>,
}

/// An `array`-typed node
#[derive(Debug, Clone)]
pub struct ArraySchema {
    pub meta: Annotations,
    pub items: Option<Box<SchemaNode>>,
}

/// A `string`-typed node
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    pub meta: Annotations,
}

/// A `number`- or `integer`-typed node
#[derive(Debug, Clone)]
pub struct NumberSchema {
    pub meta: Annotations,
    /// Authored as `integer` rather than `number`
    pub integer: bool,
    pub minimum: Option<serde_json::Number>,
    pub maximum: Option<serde_json::Number>,
}

/// A `boolean`-typed node
#[derive(Debug, Clone, Default)]
pub struct BooleanSchema {
    pub meta: Annotations,
}

/// A node constrained to a literal value set
#[derive(Debug, Clone)]
pub struct EnumSchema {
    pub meta: Annotations,
    pub values: Vec<Value>,
    /// Accompanying `type` keyword, if authored
    pub type_hint: Option<String>,
}

/// A `$ref` pointer to another node in the same document
#[derive(Debug, Clone)]
pub struct RefSchema {
    pub meta: Annotations,
    pub target: SchemaPointer,
}

/// A node without a `type` keyword. Treated as an opaque leaf.
#[derive(Debug, Clone, Default)]
pub struct UntypedSchema {
    pub raw: Map<String, Value>,
}

/// One node of the design schema tree
#[derive(Debug, Clone)]
pub enum SchemaNode {
    Object(ObjectSchema),
    Array(ArraySchema),
    String(StringSchema),
    Number(NumberSchema),
    Boolean(BooleanSchema),
    Enum(EnumSchema),
    Ref(RefSchema),
    Untyped(UntypedSchema),
}

impl Annotations {
    /// Pull the shared annotation keywords out of `map`, keeping whatever
    /// remains as the `rest` passthrough.
    fn extract(map: &mut Map<String, Value>) -> Result<Self> {
        let description = match map.remove("description") {
            Some(Value::String(text)) => Some(text),
            Some(other) => {
                return Err(DesignError::InvalidSchema(format!(
                    "description must be a string, got: {other}"
                )))
            }
            None => None,
        };
        let optional = map
            .remove("optional")
            .and_then(|value| value.as_bool())
            .unwrap_or(false);
        let default = map.remove("default");
        let examples = match map.remove("examples") {
            Some(Value::Array(items)) => Some(items),
            Some(other) => {
                return Err(DesignError::InvalidSchema(format!(
                    "examples must be an array, got: {other}"
                )))
            }
            None => None,
        };
        Ok(Self {
            description,
            optional,
            default,
            examples,
            rest: std::mem::take(map),
        })
    }

    fn render_head(&self, map: &mut Map<String, Value>) {
        if let Some(description) = &self.description {
            map.insert("description".into(), Value::String(description.clone()));
        }
    }

    fn render_tail(&self, map: &mut Map<String, Value>) {
        if let Some(default) = &self.default {
            map.insert("default".into(), default.clone());
        }
        if let Some(examples) = &self.examples {
            map.insert("examples".into(), Value::Array(examples.clone()));
        }
        if self.optional {
            map.insert("optional".into(), Value::Bool(true));
        }
        for (key, value) in &self.rest {
            map.insert(key.clone(), value.clone());
        }
    }
}

fn take_number(map: &mut Map<String, Value>, key: &str) -> Result<Option<serde_json::Number>> {
    match map.remove(key) {
        Some(Value::Number(number)) => Ok(Some(number)),
        Some(other) => Err(DesignError::InvalidSchema(format!(
            "{key} must be a number, got: {other}"
        ))),
        None => Ok(None),
    }
}

impl SchemaNode {
    /// Parse one schema node from its JSON form
    pub fn from_value(value: &Value) -> Result<Self> {
        let Some(raw) = value.as_object() else {
            return Err(DesignError::InvalidSchema(format!(
                "schema node must be a mapping, got: {value}"
            )));
        };
        let mut map = raw.clone();

        if let Some(reference) = map.remove("$ref") {
            let Some(pointer) = reference.as_str() else {
                return Err(DesignError::InvalidSchema(format!(
                    "$ref must be a string, got: {reference}"
                )));
            };
            let target = SchemaPointer::parse(pointer)?;
            let meta = Annotations::extract(&mut map)?;
            return Ok(SchemaNode::Ref(RefSchema { meta, target }));
        }

        if let Some(values) = map.remove("enum") {
            let Value::Array(values) = values else {
                return Err(DesignError::InvalidSchema(format!(
                    "enum must be an array, got: {values}"
                )));
            };
            let type_hint = match map.remove("type") {
                Some(Value::String(name)) => Some(name),
                Some(other) => {
                    return Err(DesignError::InvalidSchema(format!(
                        "type must be a string, got: {other}"
                    )))
                }
                None => None,
            };
            let meta = Annotations::extract(&mut map)?;
            return Ok(SchemaNode::Enum(EnumSchema {
                meta,
                values,
                type_hint,
            }));
        }

        let type_name = match map.remove("type") {
            Some(Value::String(name)) => name,
            Some(other) => {
                return Err(DesignError::InvalidSchema(format!(
                    "type must be a string, got: {other}"
                )))
            }
            None => {
                return Ok(SchemaNode::Untyped(UntypedSchema { raw: raw.clone() }));
            }
        };

        match type_name.as_str() {
            "object" => {
                let properties = match map.remove("properties") {
                    Some(Value::Object(entries)) => {
                        let mut parsed = IndexMap::with_capacity(entries.len());
                        for (name, child) in &entries {
                            parsed.insert(name.clone(), SchemaNode::from_value(child)?);
                        }
                        Some(parsed)
                    }
                    Some(other) => {
                        return Err(DesignError::InvalidSchema(format!(
                            "properties must be a mapping, got: {other}"
                        )))
                    }
                    None => None,
                };
                let required = match map.remove("required") {
                    Some(Value::Array(names)) => names
                        .iter()
                        .filter_map(|name| name.as_str().map(str::to_string))
                        .collect(),
                    _ => Vec::new(),
                };
                let meta = Annotations::extract(&mut map)?;
                Ok(SchemaNode::Object(ObjectSchema {
                    meta,
                    properties,
                    required,
                }))
            }
            "array" => {
                let items = match map.remove("items") {
                    Some(item) => Some(Box::new(SchemaNode::from_value(&item)?)),
                    None => None,
                };
                let meta = Annotations::extract(&mut map)?;
                Ok(SchemaNode::Array(ArraySchema { meta, items }))
            }
            "string" => Ok(SchemaNode::String(StringSchema {
                meta: Annotations::extract(&mut map)?,
            })),
            "number" | "integer" => {
                let minimum = take_number(&mut map, "minimum")?;
                let maximum = take_number(&mut map, "maximum")?;
                let meta = Annotations::extract(&mut map)?;
                Ok(SchemaNode::Number(NumberSchema {
                    meta,
                    integer: type_name == "integer",
                    minimum,
                    maximum,
                }))
            }
            "boolean" => Ok(SchemaNode::Boolean(BooleanSchema {
                meta: Annotations::extract(&mut map)?,
            })),
            other => Err(DesignError::InvalidSchema(format!(
                "unsupported schema type `{other}`"
            ))),
        }
    }

    /// Render the node back to its JSON form
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        match self {
            SchemaNode::Object(node) => {
                map.insert("type".into(), Value::String("object".into()));
                node.meta.render_head(&mut map);
                if let Some(properties) = &node.properties {
                    let mut rendered = Map::new();
                    for (name, child) in properties {
                        rendered.insert(name.clone(), child.to_value());
                    }
                    map.insert("properties".into(), Value::Object(rendered));
                }
                if !node.required.is_empty() {
                    map.insert(
                        "required".into(),
                        Value::Array(
                            node.required
                                .iter()
                                .map(|name| Value::String(name.clone()))
                                .collect(),
                        ),
                    );
                }
                node.meta.render_tail(&mut map);
            }
            SchemaNode::Array(node) => {
                map.insert("type".into(), Value::String("array".into()));
                node.meta.render_head(&mut map);
                if let Some(items) = &node.items {
                    map.insert("items".into(), items.to_value());
                }
                node.meta.render_tail(&mut map);
            }
            SchemaNode::String(node) => {
                map.insert("type".into(), Value::String("string".into()));
                node.meta.render_head(&mut map);
                node.meta.render_tail(&mut map);
            }
            SchemaNode::Number(node) => {
                let name = if node.integer { "integer" } else { "number" };
                map.insert("type".into(), Value::String(name.into()));
                node.meta.render_head(&mut map);
                if let Some(minimum) = &node.minimum {
                    map.insert("minimum".into(), Value::Number(minimum.clone()));
                }
                if let Some(maximum) = &node.maximum {
                    map.insert("maximum".into(), Value::Number(maximum.clone()));
                }
                node.meta.render_tail(&mut map);
            }
            SchemaNode::Boolean(node) => {
                map.insert("type".into(), Value::String("boolean".into()));
                node.meta.render_head(&mut map);
                node.meta.render_tail(&mut map);
            }
            SchemaNode::Enum(node) => {
                if let Some(type_hint) = &node.type_hint {
                    map.insert("type".into(), Value::String(type_hint.clone()));
                }
                node.meta.render_head(&mut map);
                map.insert("enum".into(), Value::Array(node.values.clone()));
                node.meta.render_tail(&mut map);
            }
            SchemaNode::Ref(node) => {
                map.insert("$ref".into(), Value::String(node.target.as_str().into()));
                node.meta.render_head(&mut map);
                node.meta.render_tail(&mut map);
            }
            SchemaNode::Untyped(node) => return Value::Object(node.raw.clone()),
        }
        Value::Object(map)
    }

    fn meta(&self) -> Option<&Annotations> {
        match self {
            SchemaNode::Object(node) => Some(&node.meta),
            SchemaNode::Array(node) => Some(&node.meta),
            SchemaNode::String(node) => Some(&node.meta),
            SchemaNode::Number(node) => Some(&node.meta),
            SchemaNode::Boolean(node) => Some(&node.meta),
            SchemaNode::Enum(node) => Some(&node.meta),
            SchemaNode::Ref(node) => Some(&node.meta),
            SchemaNode::Untyped(_) => None,
        }
    }

    /// Whether the node carries the `optional: true` authoring marker
    pub fn is_optional(&self) -> bool {
        match self {
            SchemaNode::Untyped(node) => node
                .raw
                .get("optional")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            other => other.meta().map(|meta| meta.optional).unwrap_or(false),
        }
    }

    /// The node's authored `default`, if any
    pub fn default(&self) -> Option<&Value> {
        match self {
            SchemaNode::Untyped(node) => node.raw.get("default"),
            other => other.meta().and_then(|meta| meta.default.as_ref()),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            SchemaNode::Untyped(node) => node.raw.get("description").and_then(Value::as_str),
            other => other.meta().and_then(|meta| meta.description.as_deref()),
        }
    }

    pub fn examples(&self) -> Option<&[Value]> {
        match self {
            SchemaNode::Untyped(node) => node
                .raw
                .get("examples")
                .and_then(Value::as_array)
                .map(Vec::as_slice),
            other => other.meta().and_then(|meta| meta.examples.as_deref()),
        }
    }
}

/// A complete schema document: the root node plus the `definitions` section
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    root: SchemaNode,
    definitions: IndexMap<String, SchemaNode>,
    /// `definitions` or `$defs`, as authored
    definitions_key: Option<String>,
}

impl SchemaDocument {
    /// Parse a schema document from its JSON form
    pub fn parse(value: &Value) -> Result<Self> {
        let Some(top) = value.as_object() else {
            return Err(DesignError::InvalidSchema(format!(
                "schema document must be a mapping, got: {value}"
            )));
        };
        let mut top = top.clone();
        let mut definitions = IndexMap::new();
        let mut definitions_key = None;
        for key in ["definitions", "$defs"] {
            let Some(section) = top.remove(key) else {
                continue;
            };
            let Some(entries) = section.as_object() else {
                return Err(DesignError::InvalidSchema(format!(
                    "{key} must be a mapping, got: {section}"
                )));
            };
            for (name, node) in entries {
                definitions.insert(name.clone(), SchemaNode::from_value(node)?);
            }
            definitions_key = Some(key.to_string());
            break;
        }
        let root = SchemaNode::from_value(&Value::Object(top))?;
        Ok(Self {
            root,
            definitions,
            definitions_key,
        })
    }

    /// Parse, normalize, and reference-check a schema document.
    ///
    /// This is the startup path: the returned document is ready for
    /// default injection and validation, and any unresolvable `$ref`
    /// aborts here rather than during a validation run.
    pub fn prepare(value: &Value) -> Result<Self> {
        let mut doc = Self::parse(value)?;
        crate::normalize::normalize_document(&mut doc);
        doc.check_refs()?;
        Ok(doc)
    }

    /// [`Self::prepare`] from schema source text
    pub fn prepare_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::prepare(&value)
    }

    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut SchemaNode {
        &mut self.root
    }

    pub fn definitions(&self) -> &IndexMap<String, SchemaNode> {
        &self.definitions
    }

    pub(crate) fn definitions_mut(&mut self) -> &mut IndexMap<String, SchemaNode> {
        &mut self.definitions
    }

    /// The root node's `title` keyword, if authored
    pub fn title(&self) -> Option<&str> {
        self.root
            .meta()
            .and_then(|meta| meta.rest.get("title"))
            .and_then(Value::as_str)
    }

    /// Render the whole document back to its JSON form
    pub fn to_value(&self) -> Value {
        let mut value = self.root.to_value();
        if !self.definitions.is_empty() {
            let key = self
                .definitions_key
                .clone()
                .unwrap_or_else(|| "definitions".to_string());
            let mut rendered = Map::new();
            for (name, node) in &self.definitions {
                rendered.insert(name.clone(), node.to_value());
            }
            if let Value::Object(map) = &mut value {
                map.insert(key, Value::Object(rendered));
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_object_node() {
        let node = SchemaNode::from_value(&json!({
            "type": "object",
            "properties": {
                "width": {"type": "integer", "minimum": 1},
                "label": {"type": "string", "optional": true}
            }
        }))
        .unwrap();
        let SchemaNode::Object(object) = node else {
            panic!("expected object node");
        };
        let properties = object.properties.unwrap();
        assert_eq!(properties.len(), 2);
        assert!(properties["label"].is_optional());
        assert!(!properties["width"].is_optional());
    }

    #[test]
    fn test_enum_classification() {
        let node = SchemaNode::from_value(&json!({
            "type": "string",
            "enum": ["1993", "2008"],
            "default": "2008"
        }))
        .unwrap();
        let SchemaNode::Enum(choices) = node else {
            panic!("expected enum node");
        };
        assert_eq!(choices.type_hint.as_deref(), Some("string"));
        assert_eq!(choices.values.len(), 2);
        assert_eq!(choices.meta.default, Some(json!("2008")));
    }

    #[test]
    fn test_ref_classification() {
        let node =
            SchemaNode::from_value(&json!({"$ref": "#/definitions/data_port", "default": {}}))
                .unwrap();
        let SchemaNode::Ref(reference) = &node else {
            panic!("expected ref node");
        };
        assert_eq!(reference.target.as_str(), "#/definitions/data_port");
        assert_eq!(node.default(), Some(&json!({})));
    }

    #[test]
    fn test_untyped_node_is_opaque() {
        let node = SchemaNode::from_value(&json!({"description": "anything goes"})).unwrap();
        assert!(matches!(node, SchemaNode::Untyped(_)));
        assert!(!node.is_optional());
    }

    #[test]
    fn test_render_preserves_unmodeled_keywords() {
        let authored = json!({
            "type": "string",
            "pattern": "^[a-z_]+$",
            "format": "uri",
            "description": "a name"
        });
        let node = SchemaNode::from_value(&authored).unwrap();
        let rendered = node.to_value();
        assert_eq!(rendered["pattern"], json!("^[a-z_]+$"));
        assert_eq!(rendered["format"], json!("uri"));
        assert_eq!(rendered["type"], json!("string"));
    }

    #[test]
    fn test_document_roundtrip_keeps_definitions() {
        let authored = json!({
            "type": "object",
            "properties": {"port": {"$ref": "#/definitions/port"}},
            "definitions": {"port": {"type": "object", "properties": {"width": {"type": "integer"}}}}
        });
        let doc = SchemaDocument::parse(&authored).unwrap();
        let rendered = doc.to_value();
        assert!(rendered["definitions"]["port"].is_object());
        assert_eq!(rendered["properties"]["port"]["$ref"], json!("#/definitions/port"));
    }

    #[test]
    fn test_invalid_type_rejected() {
        let result = SchemaNode::from_value(&json!({"type": "tuple"}));
        assert!(matches!(result, Err(DesignError::InvalidSchema(_))));
    }
}
