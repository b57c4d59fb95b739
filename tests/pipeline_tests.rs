//! End-to-End Pipeline Tests
//!
//! Runs fixture design files through the full pipeline: schema
//! preparation, default injection, structural validation, invariant
//! checks, and the format bridge.

use serde_json::{json, Value};

use lwc_design::format::{self, DesignFormat};
use lwc_design::{
    check_invariants, inject_defaults, validate, DocPath, SchemaDocument,
};

fn prepared_schema() -> SchemaDocument {
    SchemaDocument::prepare_str(lwc_design::DEFAULT_SCHEMA).expect("embedded schema must prepare")
}

fn validated(content: &str, design_format: DesignFormat) -> Value {
    let schema = prepared_schema();
    let mut design = format::decode(content, design_format).expect("fixture must decode");
    inject_defaults(&schema, &mut design).expect("defaults must inject");
    let issues = validate(&schema, &design).expect("validation must run");
    assert!(issues.is_empty(), "unexpected issues: {issues:#?}");
    check_invariants(&design).expect("invariants must hold");
    design
}

// =============================================================================
// Valid Fixtures
// =============================================================================

#[test]
fn test_dummy_core_is_valid() {
    let design = validated(include_str!("fixtures/dummy_core.json"), DesignFormat::Json);

    // Defaults materialized down to the leaves.
    assert_eq!(
        DocPath::parse("lwc.ports.pdi.num_shares").lookup(&design),
        Some(&json!(1))
    );
    assert_eq!(
        DocPath::parse("lwc.aead.key_bits").lookup(&design),
        Some(&json!(128))
    );
    assert_eq!(DocPath::parse("rtl.top").lookup(&design), Some(&json!("LWC")));
    assert_eq!(DocPath::parse("rtl.clock").lookup(&design), Some(&json!("clk")));
    assert_eq!(
        DocPath::parse("language.vhdl.standard").lookup(&design),
        Some(&json!("2008"))
    );
    // Present values stay untouched.
    assert_eq!(
        DocPath::parse("lwc.ports.pdi.bit_width").lookup(&design),
        Some(&json!(32))
    );
}

#[test]
fn test_masked_core_is_valid() {
    let design = validated(include_str!("fixtures/masked_core.yaml"), DesignFormat::Yaml);

    assert_eq!(
        DocPath::parse("lwc.sca_protection.order").lookup(&design),
        Some(&json!(2))
    );
    assert_eq!(
        DocPath::parse("lwc.ports.pdi.num_shares").lookup(&design),
        Some(&json!(4))
    );
    assert_eq!(
        DocPath::parse("lwc.ports.rdi.bit_width").lookup(&design),
        Some(&json!(64))
    );
}

#[test]
fn test_toy_core_toml_is_valid() {
    let design = validated(include_str!("fixtures/toy_core.toml"), DesignFormat::Toml);

    // Authored value wins over the schema default.
    assert_eq!(DocPath::parse("rtl.top").lookup(&design), Some(&json!("toy_top")));
    assert_eq!(
        DocPath::parse("rtl.parameters.W").lookup(&design),
        Some(&json!(32))
    );
}

// =============================================================================
// Invalid Fixtures
// =============================================================================

#[test]
fn test_bad_types_reports_every_violation() {
    let schema = prepared_schema();
    let mut design =
        format::decode(include_str!("fixtures/bad_types.json"), DesignFormat::Json).unwrap();
    inject_defaults(&schema, &mut design).unwrap();
    let issues = validate(&schema, &design).unwrap();

    // name type mismatch, bit_width enum, num_shares minimum,
    // order minimum, missing rtl.sources
    assert!(issues.len() >= 5, "expected full error set, got: {issues:#?}");
    assert!(issues.iter().any(|i| i.path.contains("/name")));
    assert!(issues.iter().any(|i| i.path.contains("bit_width")));
    assert!(issues.iter().any(|i| i.path.contains("num_shares")));
    assert!(issues.iter().any(|i| i.path.contains("order")));
    assert!(issues.iter().any(|i| i.message.contains("sources")));
}

#[test]
fn test_error_order_stable_across_runs() {
    let schema = prepared_schema();
    let mut design =
        format::decode(include_str!("fixtures/bad_types.json"), DesignFormat::Json).unwrap();
    inject_defaults(&schema, &mut design).unwrap();
    let first = validate(&schema, &design).unwrap();
    let second = validate(&schema, &design).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_empty_document_fails_on_required_sections() {
    let schema = prepared_schema();
    let mut design = json!({});
    inject_defaults(&schema, &mut design).unwrap();
    let issues = validate(&schema, &design).unwrap();
    // `name` is missing outright; `rtl` materializes as `{}` and then
    // fails on its own required `sources`.
    assert!(!issues.is_empty());
    assert!(issues.iter().any(|i| i.message.contains("name")));
    assert!(issues
        .iter()
        .any(|i| i.path.starts_with("/rtl") && i.message.contains("sources")));
}

#[test]
fn test_protection_order_share_count_mismatch() {
    let schema = prepared_schema();
    let mut design = serde_json::from_str::<Value>(include_str!("fixtures/dummy_core.json")).unwrap();
    design["lwc"]["sca_protection"]["order"] = json!(1);
    inject_defaults(&schema, &mut design).unwrap();
    assert!(validate(&schema, &design).unwrap().is_empty());
    // Structurally valid but semantically inconsistent: order=1, num_shares=1.
    let err = check_invariants(&design).unwrap_err();
    assert!(err.to_string().contains("num_shares"));
}

// =============================================================================
// Format Bridge Round-Trip
// =============================================================================

#[test]
fn test_validated_document_roundtrips_all_formats() {
    let design = validated(include_str!("fixtures/dummy_core.json"), DesignFormat::Json);
    let dir = tempfile::tempdir().unwrap();

    let json_path = dir.path().join("design.json");
    format::write_json(&design, &json_path).unwrap();
    let from_json = format::load_design(&json_path).unwrap();
    assert_eq!(from_json, design);

    let yaml_path = dir.path().join("design.yaml");
    format::write_yaml(&from_json, &yaml_path).unwrap();
    let from_yaml = format::load_design(&yaml_path).unwrap();
    assert_eq!(from_yaml, design);

    let toml_path = dir.path().join("design.toml");
    format::write_toml(&from_yaml, &toml_path).unwrap();
    let from_toml = format::load_design(&toml_path).unwrap();
    assert_eq!(from_toml, design);

    // A rewritten document still validates cleanly.
    let schema = prepared_schema();
    let issues = validate(&schema, &from_toml).unwrap();
    assert!(issues.is_empty(), "round-trip broke validity: {issues:#?}");
    check_invariants(&from_toml).unwrap();
}
