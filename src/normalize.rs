//! Schema normalization
//!
//! The authored schema marks non-mandatory properties with `optional: true`
//! instead of listing `required` sets. Normalization derives the standard
//! `required` list on every object node from that marker and gives every
//! object node an empty-object `default` so absent sections materialize
//! during default injection.
//!
//! The computed `required` lists are never part of the on-disk schema;
//! normalization runs once per invocation, before any validation.

use serde_json::{Map, Value};

use crate::schema::{ObjectSchema, SchemaDocument, SchemaNode};

/// Normalize the whole schema document: the root node and every entry of
/// the definitions section, so `$ref` targets carry computed `required`
/// sets as well.
pub fn normalize_document(doc: &mut SchemaDocument) {
    normalize(doc.root_mut(), "schema");
    for (name, node) in doc.definitions_mut().iter_mut() {
        normalize(node, name);
    }
}

/// Normalize one schema subtree.
///
/// Untyped nodes are warned about and left alone; non-object typed nodes
/// are not expanded (their nested schemas are handled by the validation
/// engine natively). `$ref` children are leaves here, their targets are
/// normalized through the definitions pass.
pub fn normalize(node: &mut SchemaNode, label: &str) {
    match node {
        SchemaNode::Untyped(_) => {
            tracing::warn!("{label} has no type");
        }
        SchemaNode::Object(ObjectSchema {
            meta,
            properties,
            required,
        }) => {
            required.clear();
            if meta.default.is_none() {
                meta.default = Some(Value::Object(Map::new()));
            }
            let Some(properties) = properties.as_mut() else {
                tracing::warn!("{label} has no properties");
                return;
            };
            for (name, child) in properties.iter_mut() {
                if child.is_optional() {
                    continue;
                }
                required.push(name.clone());
                normalize(child, name);
            }
        }
        _ => {}
    }
}
