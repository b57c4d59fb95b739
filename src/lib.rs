//! LWC Design-File Validator
//!
//! Validates hardware-design description files for lightweight-cryptography
//! cores against a JSON Schema, applies schema-declared defaults,
//! cross-checks semantic invariants the schema language cannot express,
//! optionally verifies that referenced source paths exist, and converts
//! the validated document between JSON, YAML, and TOML.
//!
//! ## Features
//!
//! - **Schema Normalization**: the authored `optional` marker is turned
//!   into standard `required` sets, every object node gains an
//!   empty-object default
//! - **Default Injection**: absent properties with schema defaults are
//!   materialized before validation, so errors and outputs always refer
//!   to the defaulted document
//! - **Complete Error Reporting**: every structural violation is
//!   collected and reported in one deterministic pass
//! - **Semantic Invariants**: cross-field rules such as the
//!   protection-order/share-count consistency check
//! - **Format Bridge**: lossless conversion between the three design-file
//!   encodings, preserving authored key order
//! - **Schema Documentation**: the normalized schema renders to Markdown
//!
//! ## Pipeline
//!
//! ```text
//! schema ──> normalize ──> check refs ─┐
//!                                      ├─> inject defaults ──> validate
//! design file ──> decode by extension ─┘                          │
//!                                              invariants <───────┘
//!                                                  │
//!                                   path checks (optional)
//!                                                  │
//!                                    write JSON / YAML / TOML
//! ```

pub mod config;
pub mod defaults;
pub mod docgen;
pub mod docpath;
pub mod error;
pub mod format;
pub mod invariants;
pub mod normalize;
pub mod paths;
pub mod resolve;
pub mod schema;
pub mod validate;

pub use config::DesignCheckConfig;
pub use defaults::{apply_defaults, compute_defaults, inject_defaults, DefaultPatch};
pub use docgen::DocGenerator;
pub use docpath::{DocPath, PathSegment};
pub use error::{DesignError, Result};
pub use format::DesignFormat;
pub use invariants::check_invariants;
pub use normalize::{normalize, normalize_document};
pub use paths::check_source_paths;
pub use resolve::SchemaPointer;
pub use schema::{SchemaDocument, SchemaNode};
pub use validate::{validate, ValidationIssue};

/// The design schema shipped with the tool, used when no `--schema-file`
/// override is given.
pub const DEFAULT_SCHEMA: &str = include_str!("../schemas/lwc.schema.json");
