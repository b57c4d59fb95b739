//! Schema reference resolution
//!
//! `$ref` targets are document-rooted pointers (`#/definitions/data_port`).
//! Pointers are parsed once into a [`SchemaPointer`] and resolved against
//! the typed schema tree. Resolution never changes authored content; an
//! unresolvable pointer is a schema-authoring defect and aborts startup,
//! it is never reported as a per-document validation error.

use std::fmt;

use crate::error::{DesignError, Result};
use crate::schema::{SchemaDocument, SchemaNode};

/// Bound on ref-to-ref chains, rejects cyclic pointer graphs.
const MAX_REF_HOPS: usize = 16;

/// A parsed `#/`-prefixed, `/`-separated schema pointer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaPointer {
    raw: String,
    segments: Vec<String>,
}

impl SchemaPointer {
    /// Parse a pointer like `#/definitions/data_port`
    pub fn parse(raw: &str) -> Result<Self> {
        let Some(path) = raw.strip_prefix("#/") else {
            return Err(DesignError::UnresolvedRef(format!(
                "`{raw}` is not a `#/`-prefixed pointer"
            )));
        };
        let segments: Vec<String> = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        if segments.is_empty() {
            return Err(DesignError::UnresolvedRef(format!(
                "`{raw}` does not address a schema node"
            )));
        }
        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for SchemaPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl SchemaDocument {
    /// Map a pointer to the node it designates.
    ///
    /// Supports pointers into the definitions section as well as any
    /// descendant of the root node (`properties/<name>` and `items` steps).
    pub fn resolve(&self, pointer: &SchemaPointer) -> Result<&SchemaNode> {
        let mut segments = pointer.segments().iter();
        let mut current = match segments.next().map(String::as_str) {
            Some("definitions") | Some("$defs") => {
                let name = segments.next().ok_or_else(|| unresolved(pointer))?;
                self.definitions()
                    .get(name)
                    .ok_or_else(|| unresolved(pointer))?
            }
            Some(_) => {
                // A pointer into the root node itself; walk all segments.
                segments = pointer.segments().iter();
                self.root()
            }
            None => return Err(unresolved(pointer)),
        };
        while let Some(step) = segments.next() {
            current = match (current, step.as_str()) {
                (SchemaNode::Object(object), "properties") => {
                    let name = segments.next().ok_or_else(|| unresolved(pointer))?;
                    object
                        .properties
                        .as_ref()
                        .and_then(|properties| properties.get(name))
                        .ok_or_else(|| unresolved(pointer))?
                }
                (SchemaNode::Array(array), "items") => {
                    array.items.as_deref().ok_or_else(|| unresolved(pointer))?
                }
                _ => return Err(unresolved(pointer)),
            };
        }
        Ok(current)
    }

    /// Follow a node through any chain of `$ref` pointers to its target.
    pub fn resolve_node<'a>(&'a self, node: &'a SchemaNode) -> Result<&'a SchemaNode> {
        let mut current = node;
        let mut hops = 0;
        while let SchemaNode::Ref(reference) = current {
            hops += 1;
            if hops > MAX_REF_HOPS {
                return Err(DesignError::UnresolvedRef(format!(
                    "reference chain through `{}` is too deep or cyclic",
                    reference.target
                )));
            }
            current = self.resolve(&reference.target)?;
        }
        Ok(current)
    }

    /// Resolve every `$ref` in the document once.
    ///
    /// Run at startup so a broken pointer aborts before any document is
    /// validated.
    pub fn check_refs(&self) -> Result<()> {
        check_node(self, self.root())?;
        for node in self.definitions().values() {
            check_node(self, node)?;
        }
        Ok(())
    }
}

fn check_node(doc: &SchemaDocument, node: &SchemaNode) -> Result<()> {
    match node {
        SchemaNode::Ref(_) => {
            doc.resolve_node(node)?;
        }
        SchemaNode::Object(object) => {
            if let Some(properties) = &object.properties {
                for child in properties.values() {
                    check_node(doc, child)?;
                }
            }
        }
        SchemaNode::Array(array) => {
            if let Some(items) = &array.items {
                check_node(doc, items)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn unresolved(pointer: &SchemaPointer) -> DesignError {
    DesignError::UnresolvedRef(pointer.as_str().to_string())
}
