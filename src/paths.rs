//! Source-path existence checks
//!
//! Optional mode: every path listed under the RTL and testbench source
//! collections must name an existing regular file, resolved against the
//! process working directory. Unlike structural validation this check is
//! fail-fast: the first offending entry aborts the run.

use serde_json::Value;
use std::path::Path;

use crate::docpath::DocPath;
use crate::error::{DesignError, Result};

/// The path-valued collections of a design document, in check order.
const PATH_COLLECTIONS: [&str; 4] = ["rtl.sources", "rtl.includes", "tb.sources", "tb.includes"];

/// Assert that every listed source path exists as a regular file.
pub fn check_source_paths(design: &Value) -> Result<()> {
    for dotted in PATH_COLLECTIONS {
        let Some(entries) = DocPath::parse(dotted).lookup(design).and_then(Value::as_array) else {
            // Absent collection means an empty one.
            continue;
        };
        for entry in entries {
            let Some(name) = entry.as_str() else {
                continue;
            };
            let path = Path::new(name);
            if !path.exists() {
                return Err(DesignError::PathCheck(format!(
                    "file {name} does not exist"
                )));
            }
            if !path.is_file() {
                return Err(DesignError::PathCheck(format!(
                    "{name} is not a regular file"
                )));
            }
        }
    }
    Ok(())
}
