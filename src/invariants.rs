//! Cross-field semantic invariants
//!
//! Checked after structural validation succeeds, so the fields involved
//! are known to exist with the right primitive types. These relationships
//! span multiple leaves and cannot be expressed as local per-field schema
//! constraints.

use serde_json::Value;

use crate::docpath::DocPath;
use crate::error::{DesignError, Result};

/// Assert every semantic invariant of a structurally valid design.
///
/// Any violation is fatal, equivalent to a validation failure.
pub fn check_invariants(design: &Value) -> Result<()> {
    check_sca_order(design)?;
    check_parameter_maps(design)?;
    Ok(())
}

/// Side-channel protection is enabled if and only if the public data
/// input is split into more than one share.
fn check_sca_order(design: &Value) -> Result<()> {
    let order = require_integer(design, "lwc.sca_protection.order")?;
    let num_shares = require_integer(design, "lwc.ports.pdi.num_shares")?;
    if (order > 0) != (num_shares > 1) {
        return Err(DesignError::Invariant(format!(
            "lwc.sca_protection.order = {order} is inconsistent with \
             lwc.ports.pdi.num_shares = {num_shares}: a protection order above \
             zero requires more than one share, and vice versa"
        )));
    }
    Ok(())
}

/// Parameter values that are mappings must be `{"file": <path>}`.
fn check_parameter_maps(design: &Value) -> Result<()> {
    for section in ["rtl", "tb"] {
        let path = DocPath::root().key(section).key("parameters");
        let Some(parameters) = path.lookup(design).and_then(Value::as_object) else {
            continue;
        };
        for (name, value) in parameters {
            let Some(entries) = value.as_object() else {
                continue;
            };
            for (key, file) in entries {
                if key != "file" {
                    return Err(DesignError::Invariant(format!(
                        "{section}.parameters.{name}: mapping values may only \
                         carry a `file` key, found `{key}`"
                    )));
                }
                if !file.is_string() {
                    return Err(DesignError::Invariant(format!(
                        "{section}.parameters.{name}: `file` must name a file \
                         as a string, got: {file}"
                    )));
                }
            }
        }
    }
    Ok(())
}

fn require_integer(design: &Value, dotted: &str) -> Result<i64> {
    DocPath::parse(dotted)
        .lookup(design)
        .and_then(Value::as_i64)
        .ok_or_else(|| DesignError::Invariant(format!("{dotted} is missing or not an integer")))
}
