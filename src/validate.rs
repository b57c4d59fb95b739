//! Structural validation
//!
//! Wraps the `jsonschema` engine: the normalized schema document is
//! rendered back to JSON, compiled once, and the instance is checked
//! against it. Every violation in the document is collected, never just
//! the first, and the list is sorted by its `(path, message)` text so
//! output is deterministic across runs regardless of traversal order.

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use std::fmt;

use crate::error::{DesignError, Result};
use crate::schema::SchemaDocument;

/// One schema-rule violation
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ValidationIssue {
    /// JSON-Pointer location within the design document
    pub path: String,
    /// Human-readable message
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Validate a design document against the prepared schema.
///
/// Returns the full, deterministically ordered list of violations; an
/// empty list means the document is structurally valid. The instance
/// should already carry injected defaults so issues are reported against
/// the post-defaulting document.
pub fn validate(schema: &SchemaDocument, instance: &Value) -> Result<Vec<ValidationIssue>> {
    let schema_value = schema.to_value();
    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft202012)
        .should_validate_formats(true)
        .compile(&schema_value)
        .map_err(|error| DesignError::SchemaCompile(error.to_string()))?;

    let mut issues = Vec::new();
    if let Err(errors) = compiled.validate(instance) {
        for error in errors {
            issues.push(ValidationIssue {
                path: error.instance_path.to_string(),
                message: error.to_string(),
            });
        }
    }
    issues.sort();
    Ok(issues)
}
