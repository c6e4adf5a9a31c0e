use lockstep_compiler::predicate::{compile_predicate, CompileError, SignalContext};
use lockstep_ir::expr::Expr;
use lockstep_ir::parse::parse_spec;

fn make_test_context() -> SignalContext {
    let json = include_str!("../../lockstep-ir/tests/fixtures/handshake_bus.json");
    let spec = parse_spec(json).unwrap();
    SignalContext::from_spec(&spec)
}

fn expr(json: serde_json::Value) -> Expr {
    serde_json::from_value(json).unwrap()
}

#[test]
fn test_compile_signal_reference() {
    let ctx = make_test_context();
    let result = compile_predicate(&expr(serde_json::json!(["sig", "req"])), &ctx);
    assert!(result.is_ok());
}

#[test]
fn test_compile_unknown_signal_fails() {
    let ctx = make_test_context();
    let result = compile_predicate(&expr(serde_json::json!(["sig", "bogus"])), &ctx);
    assert!(matches!(result, Err(CompileError::UnknownSignal { name }) if name == "bogus"));
}

#[test]
fn test_compile_bare_string_resolves_as_signal() {
    let ctx = make_test_context();
    assert!(compile_predicate(&expr(serde_json::json!("ack")), &ctx).is_ok());
    assert!(compile_predicate(&expr(serde_json::json!("missing")), &ctx).is_err());
}

#[test]
fn test_compile_int_signal_is_not_a_predicate() {
    let ctx = make_test_context();
    let result = compile_predicate(&expr(serde_json::json!(["sig", "insn"])), &ctx);
    assert!(matches!(result, Err(CompileError::NotBoolean { .. })));
}

#[test]
fn test_compile_eq_requires_matching_types() {
    let ctx = make_test_context();
    let ok = compile_predicate(&expr(serde_json::json!(["eq", ["sig", "insn"], 7])), &ctx);
    assert!(ok.is_ok());

    let bad = compile_predicate(&expr(serde_json::json!(["eq", ["sig", "insn"], true])), &ctx);
    assert!(matches!(bad, Err(CompileError::TypeError { .. })));
}

#[test]
fn test_compile_comparison_requires_ints() {
    let ctx = make_test_context();
    let ok = compile_predicate(&expr(serde_json::json!(["lt", ["sig", "insn"], 256])), &ctx);
    assert!(ok.is_ok());

    let bad = compile_predicate(&expr(serde_json::json!(["lt", ["sig", "req"], 256])), &ctx);
    assert!(matches!(bad, Err(CompileError::TypeError { .. })));
}

#[test]
fn test_compile_boolean_ops_require_bools() {
    let ctx = make_test_context();
    let bad = compile_predicate(&expr(serde_json::json!(["and", "req", ["sig", "insn"]])), &ctx);
    assert!(matches!(bad, Err(CompileError::TypeError { .. })));

    let bad = compile_predicate(&expr(serde_json::json!(["not", ["sig", "insn"]])), &ctx);
    assert!(matches!(bad, Err(CompileError::TypeError { .. })));
}

#[test]
fn test_compile_arity_errors() {
    let ctx = make_test_context();
    let bad = compile_predicate(&expr(serde_json::json!(["not", "req", "ack"])), &ctx);
    assert!(matches!(bad, Err(CompileError::Arity { .. })));

    let bad = compile_predicate(&expr(serde_json::json!(["eq", "req"])), &ctx);
    assert!(matches!(bad, Err(CompileError::Arity { .. })));

    let bad = compile_predicate(&expr(serde_json::json!(["and", "req"])), &ctx);
    assert!(matches!(bad, Err(CompileError::Arity { .. })));
}

#[test]
fn test_compile_bits_range_checks() {
    let ctx = make_test_context();
    let ok = compile_predicate(
        &expr(serde_json::json!(["eq", ["bits", "insn", 15, 12], 4])),
        &ctx,
    );
    assert!(ok.is_ok());

    // hi < lo
    let bad = compile_predicate(
        &expr(serde_json::json!(["eq", ["bits", "insn", 3, 7], 0])),
        &ctx,
    );
    assert!(matches!(bad, Err(CompileError::InvalidBitRange { hi: 3, lo: 7 })));

    // beyond the declared 16-bit width
    let bad = compile_predicate(
        &expr(serde_json::json!(["eq", ["bits", "insn", 31, 16], 0])),
        &ctx,
    );
    assert!(matches!(bad, Err(CompileError::BitRangeExceedsWidth { hi: 31, width: 16, .. })));
}

#[test]
fn test_compile_bits_width_applies_through_prev() {
    let ctx = make_test_context();
    let ok = compile_predicate(
        &expr(serde_json::json!(["eq", ["bits", ["prev", "insn"], 15, 12], 4])),
        &ctx,
    );
    assert!(ok.is_ok());

    // Same out-of-width range as the direct form; the prev wrapper must
    // not launder it.
    let bad = compile_predicate(
        &expr(serde_json::json!(["eq", ["bits", ["prev", "insn"], 31, 16], 0])),
        &ctx,
    );
    assert!(matches!(bad, Err(CompileError::BitRangeExceedsWidth { hi: 31, width: 16, .. })));
}

#[test]
fn test_compile_bits_requires_int_source() {
    let ctx = make_test_context();
    let bad = compile_predicate(
        &expr(serde_json::json!(["eq", ["bits", "req", 1, 0], 0])),
        &ctx,
    );
    assert!(matches!(bad, Err(CompileError::TypeError { .. })));
}

#[test]
fn test_compile_in_set_requires_int() {
    let ctx = make_test_context();
    let ok = compile_predicate(&expr(serde_json::json!(["in", "insn", [1, 2, 3]])), &ctx);
    assert!(ok.is_ok());

    let bad = compile_predicate(&expr(serde_json::json!(["in", "req", [1, 2, 3]])), &ctx);
    assert!(matches!(bad, Err(CompileError::TypeError { .. })));
}

#[test]
fn test_compile_prev_of_either_type() {
    let ctx = make_test_context();
    let bool_prev = compile_predicate(&expr(serde_json::json!(["prev", "req"])), &ctx);
    assert!(bool_prev.is_ok());

    let int_prev = compile_predicate(
        &expr(serde_json::json!(["eq", ["prev", ["sig", "insn"]], ["sig", "insn"]])),
        &ctx,
    );
    assert!(int_prev.is_ok());
}

#[test]
fn test_compile_nested_history_fails() {
    let ctx = make_test_context();
    let bad = compile_predicate(&expr(serde_json::json!(["prev", ["prev", "req"]])), &ctx);
    assert!(matches!(bad, Err(CompileError::NestedHistory)));

    let bad = compile_predicate(&expr(serde_json::json!(["rose", ["prev", "req"]])), &ctx);
    assert!(matches!(bad, Err(CompileError::NestedHistory)));

    let bad = compile_predicate(&expr(serde_json::json!(["prev", ["rose", "req"]])), &ctx);
    assert!(matches!(bad, Err(CompileError::NestedHistory)));
}

#[test]
fn test_compile_rose_requires_bool() {
    let ctx = make_test_context();
    let bad = compile_predicate(&expr(serde_json::json!(["rose", ["sig", "insn"]])), &ctx);
    assert!(matches!(bad, Err(CompileError::TypeError { .. })));
}

#[test]
fn test_compile_complex_nested() {
    let ctx = make_test_context();
    // branch instruction seen while the bus is quiet
    let result = compile_predicate(
        &expr(serde_json::json!([
            "and",
            ["in", ["bits", "insn", 15, 12], [4, 5]],
            ["not", ["or", "req", "ack"]],
            ["implies", ["prev", "req"], ["not", "reset"]]
        ])),
        &ctx,
    );
    assert!(result.is_ok(), "compile failed: {:?}", result.err());
}
