use lockstep_compiler::compile;
use lockstep_compiler::compile::ConfigError;
use lockstep_compiler::validate::{ValidationError, Window};
use lockstep_ir::parse::parse_spec;
use lockstep_ir::types::MonitorSpec;

fn make_spec(json: &str) -> MonitorSpec {
    parse_spec(json).unwrap()
}

#[test]
fn test_compile_fixture_accepts_everything() {
    let json = include_str!("../../lockstep-ir/tests/fixtures/handshake_bus.json");
    let compiled = compile(&make_spec(json));
    assert_eq!(compiled.properties.len(), 4);
    assert_eq!(compiled.coverage.len(), 3);
    assert!(compiled.rejected.is_empty());
    assert_eq!(compiled.signals.len(), 9);
}

#[test]
fn test_compile_preserves_declaration_order() {
    let json = include_str!("../../lockstep-ir/tests/fixtures/handshake_bus.json");
    let compiled = compile(&make_spec(json));
    let labels: Vec<&str> = compiled.properties.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["req_gets_ack", "gnt_drops_req", "halt_sticks", "fetch_completes"]);
}

#[test]
fn test_compile_normalizes_next_exact_window() {
    let json = include_str!("../../lockstep-ir/tests/fixtures/handshake_bus.json");
    let compiled = compile(&make_spec(json));
    let gnt = &compiled.properties[1];
    assert_eq!(gnt.window, Window { min: 1, max: Some(1) });
}

#[test]
fn test_compile_resolves_unbounded_window() {
    let json = include_str!("../../lockstep-ir/tests/fixtures/handshake_bus.json");
    let compiled = compile(&make_spec(json));
    let halt = &compiled.properties[2];
    assert_eq!(halt.window, Window { min: 1, max: None });
}

#[test]
fn test_bad_property_rejected_alone() {
    let json = r#"{
        "signals": { "a": { "type": "bool" }, "b": { "type": "bool" } },
        "properties": [
            { "label": "good", "trigger": "a", "consequent": "b",
              "window": { "min": 1, "max": 3 } },
            { "label": "bad_signal", "trigger": "ghost", "consequent": "b",
              "window": { "min": 1, "max": 3 } },
            { "label": "bad_window", "trigger": "a", "consequent": "b",
              "window": { "min": 0, "max": 3 } },
            { "label": "also_good", "trigger": "b", "consequent": "a",
              "window": { "min": 2, "max": "unbounded" } }
        ]
    }"#;
    let compiled = compile(&make_spec(json));

    let accepted: Vec<&str> = compiled.properties.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(accepted, vec!["good", "also_good"]);

    let rejected: Vec<&str> = compiled.rejected.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(rejected, vec!["bad_signal", "bad_window"]);

    assert!(matches!(compiled.rejected[0].error, ConfigError::Predicate(_)));
    assert!(matches!(
        compiled.rejected[1].error,
        ConfigError::Validation(ValidationError::WindowMinZero { .. })
    ));
}

#[test]
fn test_duplicate_property_label_rejected() {
    let json = r#"{
        "signals": { "a": { "type": "bool" } },
        "properties": [
            { "label": "p", "trigger": "a", "consequent": "a",
              "window": { "min": 1, "max": 2 } },
            { "label": "p", "trigger": "a", "consequent": "a",
              "window": { "min": 1, "max": 2 } }
        ]
    }"#;
    let compiled = compile(&make_spec(json));
    assert_eq!(compiled.properties.len(), 1);
    assert_eq!(compiled.rejected.len(), 1);
    assert!(matches!(
        compiled.rejected[0].error,
        ConfigError::Validation(ValidationError::DuplicateLabel { .. })
    ));
}

#[test]
fn test_property_and_coverage_labels_are_separate_namespaces() {
    let json = r#"{
        "signals": { "a": { "type": "bool" } },
        "properties": [
            { "label": "shared", "trigger": "a", "consequent": "a",
              "window": { "min": 1, "max": 2 } }
        ],
        "coverage": [
            { "label": "shared", "predicate": "a" }
        ]
    }"#;
    let compiled = compile(&make_spec(json));
    assert_eq!(compiled.properties.len(), 1);
    assert_eq!(compiled.coverage.len(), 1);
    assert!(compiled.rejected.is_empty());
}

#[test]
fn test_bad_coverage_rejected_alone() {
    let json = r#"{
        "signals": { "a": { "type": "bool" } },
        "coverage": [
            { "label": "ok", "predicate": "a" },
            { "label": "bad", "predicate": ["sig", "ghost"] }
        ]
    }"#;
    let compiled = compile(&make_spec(json));
    assert_eq!(compiled.coverage.len(), 1);
    assert_eq!(compiled.coverage[0].label, "ok");
    assert_eq!(compiled.rejected.len(), 1);
    assert_eq!(compiled.rejected[0].label, "bad");
}

#[test]
fn test_inverted_window_rejected() {
    let json = r#"{
        "signals": { "a": { "type": "bool" } },
        "properties": [
            { "label": "p", "trigger": "a", "consequent": "a",
              "window": { "min": 5, "max": 2 } }
        ]
    }"#;
    let compiled = compile(&make_spec(json));
    assert!(compiled.properties.is_empty());
    assert!(matches!(
        compiled.rejected[0].error,
        ConfigError::Validation(ValidationError::WindowInverted { min: 5, max: 2, .. })
    ));
}

#[test]
fn test_empty_spec_compiles_to_trivial_monitor() {
    let compiled = compile(&make_spec(r#"{ "signals": {} }"#));
    assert!(compiled.properties.is_empty());
    assert!(compiled.coverage.is_empty());
    assert!(compiled.rejected.is_empty());
}

#[test]
fn test_rejection_messages_name_the_problem() {
    let json = r#"{
        "signals": { "a": { "type": "bool" } },
        "properties": [
            { "label": "p", "trigger": ["sig", "ghost"], "consequent": "a",
              "window": { "min": 1, "max": 2 } }
        ]
    }"#;
    let compiled = compile(&make_spec(json));
    let message = compiled.rejected[0].error.to_string();
    assert!(message.contains("ghost"), "unhelpful message: {message}");
}
