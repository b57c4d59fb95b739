//! Default injection
//!
//! Fills in absent properties whose schema node declares a `default`, so
//! validation and everything after it (invariants, path checks, output
//! writing) see the defaulted document. Injection is insert-only: a
//! present value, including `null`, is never overwritten.
//!
//! Runs as two phases: a pure traversal computing the patches to apply,
//! then a single apply step. When a patch schedules a default, traversal
//! continues beneath the scheduled value so nested defaults materialize
//! transitively.

use serde_json::Value;

use crate::docpath::{DocPath, PathSegment};
use crate::error::Result;
use crate::schema::{SchemaDocument, SchemaNode};

/// One default value to insert at a document position
#[derive(Debug, Clone)]
pub struct DefaultPatch {
    pub path: DocPath,
    pub value: Value,
}

/// Compute and apply all schema defaults missing from `instance`.
pub fn inject_defaults(schema: &SchemaDocument, instance: &mut Value) -> Result<()> {
    let patches = compute_defaults(schema, instance)?;
    apply_defaults(instance, patches);
    Ok(())
}

/// Traverse `instance` against the schema and collect the defaults that
/// would be injected, in traversal order (parents before children).
pub fn compute_defaults(schema: &SchemaDocument, instance: &Value) -> Result<Vec<DefaultPatch>> {
    let mut patches = Vec::new();
    let root = schema.resolve_node(schema.root())?;
    walk(schema, root, instance, &DocPath::root(), &mut patches)?;
    Ok(patches)
}

/// Insert every patch, skipping positions that are already present.
pub fn apply_defaults(instance: &mut Value, patches: Vec<DefaultPatch>) {
    for patch in patches {
        insert(instance, patch);
    }
}

fn walk(
    schema: &SchemaDocument,
    node: &SchemaNode,
    instance: &Value,
    path: &DocPath,
    patches: &mut Vec<DefaultPatch>,
) -> Result<()> {
    match node {
        SchemaNode::Object(object) => {
            let Some(properties) = &object.properties else {
                return Ok(());
            };
            // A non-mapping here is a type mismatch; validation reports it.
            let Some(map) = instance.as_object() else {
                return Ok(());
            };
            for (name, child) in properties {
                let resolved = schema.resolve_node(child)?;
                let child_path = path.key(name);
                match map.get(name) {
                    Some(present) => {
                        walk(schema, resolved, present, &child_path, patches)?;
                    }
                    None => {
                        // The authored node's default decides; a bare $ref
                        // without a sibling default injects nothing.
                        if let Some(default) = child.default() {
                            patches.push(DefaultPatch {
                                path: child_path.clone(),
                                value: default.clone(),
                            });
                            walk(schema, resolved, default, &child_path, patches)?;
                        }
                    }
                }
            }
        }
        SchemaNode::Array(array) => {
            if let (Some(items), Some(elements)) = (array.items.as_deref(), instance.as_array()) {
                let resolved = schema.resolve_node(items)?;
                for (index, element) in elements.iter().enumerate() {
                    walk(schema, resolved, element, &path.index(index), patches)?;
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn insert(root: &mut Value, patch: DefaultPatch) {
    let Some((last, parents)) = patch.path.split_last() else {
        return;
    };
    let mut current = root;
    for segment in parents {
        current = match segment {
            PathSegment::Key(key) => match current.as_object_mut().and_then(|map| map.get_mut(key))
            {
                Some(next) => next,
                None => return,
            },
            PathSegment::Index(index) => {
                match current.as_array_mut().and_then(|items| items.get_mut(*index)) {
                    Some(next) => next,
                    None => return,
                }
            }
        };
    }
    let PathSegment::Key(key) = last else {
        return;
    };
    if let Some(map) = current.as_object_mut() {
        map.entry(key.clone()).or_insert(patch.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> SchemaDocument {
        SchemaDocument::prepare(&json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "rtl": {
                    "type": "object",
                    "properties": {
                        "top": {"type": "string", "default": "LWC", "optional": true},
                        "sources": {"type": "array", "items": {"type": "string"}}
                    }
                },
                "ports": {
                    "type": "object",
                    "properties": {
                        "pdi": {"$ref": "#/definitions/data_port", "default": {}},
                        "sdi": {"$ref": "#/definitions/data_port", "optional": true}
                    }
                }
            },
            "definitions": {
                "data_port": {
                    "type": "object",
                    "properties": {
                        "num_shares": {"type": "integer", "default": 1, "optional": true}
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_missing_property_gets_default() {
        let schema = schema();
        let mut design = json!({"name": "x", "rtl": {"sources": []}, "ports": {}});
        inject_defaults(&schema, &mut design).unwrap();
        assert_eq!(design["rtl"]["top"], json!("LWC"));
    }

    #[test]
    fn test_present_value_never_overwritten() {
        let schema = schema();
        let mut design = json!({"name": "x", "rtl": {"top": "MyTop", "sources": []}, "ports": {}});
        inject_defaults(&schema, &mut design).unwrap();
        assert_eq!(design["rtl"]["top"], json!("MyTop"));
    }

    #[test]
    fn test_present_null_suppresses_injection() {
        let schema = schema();
        let mut design = json!({"name": "x", "rtl": {"top": null, "sources": []}, "ports": {}});
        inject_defaults(&schema, &mut design).unwrap();
        assert_eq!(design["rtl"]["top"], json!(null));
    }

    #[test]
    fn test_nested_defaults_materialize() {
        let schema = schema();
        let mut design = json!({"name": "x", "rtl": {"sources": []}, "ports": {}});
        inject_defaults(&schema, &mut design).unwrap();
        // pdi injected as {}, then its num_shares default fills in
        assert_eq!(design["ports"]["pdi"], json!({"num_shares": 1}));
    }

    #[test]
    fn test_ref_without_default_injects_nothing() {
        let schema = schema();
        let mut design = json!({"name": "x", "rtl": {"sources": []}, "ports": {}});
        inject_defaults(&schema, &mut design).unwrap();
        assert!(design["ports"].get("sdi").is_none());
    }

    #[test]
    fn test_defaults_inside_present_ref_target() {
        let schema = schema();
        let mut design = json!({"name": "x", "rtl": {"sources": []}, "ports": {"sdi": {}}});
        inject_defaults(&schema, &mut design).unwrap();
        assert_eq!(design["ports"]["sdi"]["num_shares"], json!(1));
    }

    #[test]
    fn test_compute_is_pure() {
        let schema = schema();
        let design = json!({"name": "x", "rtl": {"sources": []}, "ports": {}});
        let before = design.clone();
        let patches = compute_defaults(&schema, &design).unwrap();
        assert_eq!(design, before);
        assert!(!patches.is_empty());
    }
}
