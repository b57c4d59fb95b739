//! Markdown documentation from the design schema
//!
//! Renders the normalized schema tree as a nested bullet list: one bullet
//! per property at its nesting depth, the property name in bold monospace
//! (triple emphasis when required), annotated with its type, bounds,
//! allowed values, default, and literal examples. `$ref` properties are
//! documented through the referenced definition.

use serde_json::Value;

use crate::error::Result;
use crate::schema::{SchemaDocument, SchemaNode};

/// Markdown generator over a prepared (normalized) schema document
pub struct DocGenerator<'a> {
    doc: &'a SchemaDocument,
    tab_size: usize,
}

impl<'a> DocGenerator<'a> {
    pub fn new(doc: &'a SchemaDocument) -> Self {
        Self { doc, tab_size: 4 }
    }

    /// Render the whole schema as a Markdown document.
    pub fn generate(&self) -> Result<String> {
        let mut out = String::new();
        let title = self.doc.title().unwrap_or("Schema").to_string();
        self.render(self.doc.root(), &title, -1, true, &mut out)?;
        Ok(out)
    }

    fn render(
        &self,
        node: &SchemaNode,
        name: &str,
        level: i32,
        required: bool,
        out: &mut String,
    ) -> Result<()> {
        let resolved = self.doc.resolve_node(node)?;

        if !name.is_empty() {
            let indentation = if level > 0 {
                " ".repeat(self.tab_size * level as usize)
            } else {
                String::new()
            };
            let name_formatted = if required {
                format!("***`{name}`***")
            } else {
                format!("**`{name}`**")
            };
            let type_note = match self.type_label(resolved) {
                Some(label) if label != "object" => format!(" *({label})*"),
                _ => String::new(),
            };
            let description_line = self.description_line(node, resolved);
            let pre = if level >= 0 {
                format!("{indentation}- ")
            } else {
                String::new()
            };
            out.push_str(&format!("{pre}{name_formatted}{type_note}{description_line}\n"));
        }

        if let SchemaNode::Object(object) = resolved {
            if let Some(properties) = &object.properties {
                for (child_name, child) in properties {
                    let child_required =
                        required && object.required.iter().any(|entry| entry == child_name);
                    self.render(child, child_name, level + 1, child_required, out)?;
                }
            }
        }

        self.render_examples(resolved, level, out);
        Ok(())
    }

    fn description_line(&self, authored: &SchemaNode, resolved: &SchemaNode) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(description) = resolved
            .description()
            .or_else(|| authored.description())
        {
            let ending = if description.ends_with(['.', '?', '!', ';']) {
                ""
            } else {
                "."
            };
            parts.push(format!("{description}{ending} "));
        }
        if let SchemaNode::Number(number) = resolved {
            if let Some(minimum) = &number.minimum {
                parts.push(format!(" _Minimum:_ `{minimum}` "));
            }
            if let Some(maximum) = &number.maximum {
                parts.push(format!(" _Maximum:_ `{maximum}` "));
            }
        }
        if let SchemaNode::Enum(choices) = resolved {
            let values: Vec<String> = choices.values.iter().map(format_literal).collect();
            parts.push(format!(" _Supported values:_ `{}` ", values.join("`, `")));
        }
        if let Some(default) = resolved.default().or_else(|| authored.default()) {
            // An empty-object default is normalizer plumbing, not documentation.
            let is_empty_object = matches!(default, Value::Object(map) if map.is_empty());
            if !is_empty_object {
                parts.push(format!(" _Default:_ `{}` ", format_literal(default)));
            }
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!(": {}", parts.join(" "))
        }
    }

    fn type_label(&self, node: &SchemaNode) -> Option<String> {
        match node {
            SchemaNode::Object(_) => Some("object".to_string()),
            SchemaNode::Array(array) => {
                let item_label = array
                    .items
                    .as_deref()
                    .and_then(|items| self.doc.resolve_node(items).ok())
                    .and_then(|items| self.type_label(items));
                match item_label {
                    Some(item) => Some(format!("array of {item}s")),
                    None => Some("array".to_string()),
                }
            }
            SchemaNode::String(_) => Some("string".to_string()),
            SchemaNode::Number(number) => Some(if number.integer {
                "integer".to_string()
            } else {
                "number".to_string()
            }),
            SchemaNode::Boolean(_) => Some("boolean".to_string()),
            SchemaNode::Enum(choices) => choices.type_hint.clone(),
            SchemaNode::Ref(_) | SchemaNode::Untyped(_) => None,
        }
    }

    fn render_examples(&self, node: &SchemaNode, level: i32, out: &mut String) {
        let Some(examples) = node.examples() else {
            return;
        };
        let depth = (level + 1).max(0) as usize;
        let indentation = " ".repeat(self.tab_size * depth);
        out.push_str(&format!("{indentation}_Examples:_\n{indentation}"));
        let rendered: Vec<String> = examples
            .iter()
            .map(|example| format!("`{example}`"))
            .collect();
        out.push_str(&format!("{}\n", rendered.join(", ")));
    }
}

/// Literal rendering for defaults and enum values: bare strings, compact
/// JSON for everything else.
fn format_literal(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn generate(schema: Value) -> String {
        let doc = SchemaDocument::prepare(&schema).unwrap();
        DocGenerator::new(&doc).generate().unwrap()
    }

    #[test]
    fn test_required_and_optional_emphasis() {
        let md = generate(json!({
            "title": "LWC Design",
            "type": "object",
            "properties": {
                "name": {"type": "string", "description": "Name of the design"},
                "notes": {"type": "string", "optional": true}
            }
        }));
        assert!(md.contains("***`name`*** *(string)*: Name of the design."));
        assert!(md.contains("**`notes`** *(string)*"));
    }

    #[test]
    fn test_nesting_indents_by_depth() {
        let md = generate(json!({
            "type": "object",
            "properties": {
                "rtl": {
                    "type": "object",
                    "properties": {
                        "sources": {"type": "array", "items": {"type": "string"}}
                    }
                }
            }
        }));
        assert!(md.contains("- ***`rtl`***"));
        assert!(md.contains("    - ***`sources`*** *(array of strings)*"));
    }

    #[test]
    fn test_annotations_rendered() {
        let md = generate(json!({
            "type": "object",
            "properties": {
                "order": {
                    "type": "integer",
                    "minimum": 0,
                    "maximum": 7,
                    "default": 0,
                    "optional": true,
                    "description": "Protection order"
                },
                "standard": {
                    "type": "string",
                    "enum": ["1993", "2008"],
                    "default": "2008",
                    "optional": true
                },
                "active_high": {"type": "boolean", "default": true, "optional": true}
            }
        }));
        assert!(md.contains("_Minimum:_ `0`"));
        assert!(md.contains("_Maximum:_ `7`"));
        assert!(md.contains("_Supported values:_ `1993`, `2008`"));
        assert!(md.contains("_Default:_ `2008`"));
        assert!(md.contains("_Default:_ `true`"));
    }

    #[test]
    fn test_ref_documented_through_definition() {
        let md = generate(json!({
            "type": "object",
            "properties": {
                "pdi": {"$ref": "#/definitions/data_port", "default": {}}
            },
            "definitions": {
                "data_port": {
                    "type": "object",
                    "description": "Configuration of one LWC data port",
                    "properties": {
                        "num_shares": {"type": "integer", "minimum": 1, "optional": true}
                    }
                }
            }
        }));
        assert!(md.contains("***`pdi`***: Configuration of one LWC data port."));
        assert!(md.contains("**`num_shares`**"));
    }

    #[test]
    fn test_examples_rendered_inline() {
        let md = generate(json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "examples": ["dummy_lwc", "ascon_v1"]
                }
            }
        }));
        assert!(md.contains("_Examples:_"));
        assert!(md.contains("`\"dummy_lwc\"`, `\"ascon_v1\"`"));
    }

    #[test]
    fn test_default_schema_renders() {
        let doc = SchemaDocument::prepare_str(crate::DEFAULT_SCHEMA).unwrap();
        let md = DocGenerator::new(&doc).generate().unwrap();
        assert!(md.contains("***`lwc`***"));
        assert!(md.contains("***`pdi`***"));
        assert!(md.contains("**`sdi`**"));
    }
}
