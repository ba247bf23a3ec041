// Schema validation tests for MQTT wire format
//
// These tests construct JSON values directly (independent of Rust structs)
// and validate them against the JSON Schema files in schemas/mqtt/.

use serde_json::json;

fn load_schema(name: &str) -> serde_json::Value {
    let path = format!(
        "{}/schemas/mqtt/{name}",
        env!("CARGO_MANIFEST_DIR")
    );
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read schema {path}: {e}"));
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("Failed to parse schema {path}: {e}"))
}

fn build_validator(schema_name: &str) -> jsonschema::Validator {
    let schema = load_schema(schema_name);
    jsonschema::validator_for(&schema)
        .unwrap_or_else(|e| panic!("Failed to compile schema {schema_name}: {e}"))
}

fn validate(schema_name: &str, instance: &serde_json::Value) {
    let validator = build_validator(schema_name);
    let errors: Vec<_> = validator.iter_errors(instance).collect();
    if !errors.is_empty() {
        let msgs: Vec<String> = errors.iter().map(|e| format!("  - {e}")).collect();
        panic!(
            "Schema validation failed for {schema_name}:\n{}\nInstance: {}",
            msgs.join("\n"),
            serde_json::to_string_pretty(instance).unwrap()
        );
    }
}

fn validate_fails(schema_name: &str, instance: &serde_json::Value) {
    let validator = build_validator(schema_name);
    assert!(
        !validator.is_valid(instance),
        "Expected schema validation to fail for {schema_name}, but it passed.\nInstance: {}",
        serde_json::to_string_pretty(instance).unwrap()
    );
}

// =========================================================================
// State events
// =========================================================================

#[test]
fn state_event_disarmed() {
    validate(
        "state_event.schema.json",
        &json!({
            "now": 1770400000000_u64,
            "op": "STATE",
            "device": "Front Panel",
            "value": 0
        }),
    );
}

#[test]
fn state_event_armed_away() {
    validate(
        "state_event.schema.json",
        &json!({
            "now": 1770400000000_u64,
            "op": "STATE",
            "device": "Front Panel",
            "value": 1
        }),
    );
}

#[test]
fn state_event_armed_stay() {
    validate(
        "state_event.schema.json",
        &json!({
            "now": 1770400000000_u64,
            "op": "STATE",
            "device": "Front Panel",
            "value": 2
        }),
    );
}

#[test]
fn state_event_code_out_of_range_rejected() {
    validate_fails(
        "state_event.schema.json",
        &json!({
            "now": 1770400000000_u64,
            "op": "STATE",
            "device": "Front Panel",
            "value": 3
        }),
    );
}

#[test]
fn state_event_wrong_op_rejected() {
    validate_fails(
        "state_event.schema.json",
        &json!({
            "now": 1770400000000_u64,
            "op": "SNAPSHOT",
            "device": "Front Panel",
            "value": 0
        }),
    );
}

#[test]
fn state_event_missing_device_rejected() {
    validate_fails(
        "state_event.schema.json",
        &json!({ "now": 1770400000000_u64, "op": "STATE", "value": 0 }),
    );
}

#[test]
fn state_event_value_as_string_rejected() {
    validate_fails(
        "state_event.schema.json",
        &json!({
            "now": 1770400000000_u64,
            "op": "STATE",
            "device": "Front Panel",
            "value": "disarmed"
        }),
    );
}

#[test]
fn state_event_timestamp_string_rejected() {
    validate_fails(
        "state_event.schema.json",
        &json!({
            "now": "2026-01-01T00:00:00Z",
            "op": "STATE",
            "device": "Front Panel",
            "value": 0
        }),
    );
}

#[test]
fn state_event_extra_field_rejected() {
    validate_fails(
        "state_event.schema.json",
        &json!({
            "now": 1770400000000_u64,
            "op": "STATE",
            "device": "Front Panel",
            "value": 0,
            "status": "disarmed"
        }),
    );
}

// =========================================================================
// CMD_ACK
// =========================================================================

#[test]
fn cmd_ack_success() {
    validate(
        "command_ack.schema.json",
        &json!({
            "now": 1770400000000_u64,
            "op": "CMD_ACK",
            "success": true
        }),
    );
}

#[test]
fn cmd_ack_failure() {
    validate(
        "command_ack.schema.json",
        &json!({
            "now": 1770400000000_u64,
            "op": "CMD_ACK",
            "success": false
        }),
    );
}

#[test]
fn cmd_ack_with_src() {
    validate(
        "command_ack.schema.json",
        &json!({
            "now": 1770400000000_u64,
            "op": "CMD_ACK",
            "success": true,
            "src": { "op": "PING" }
        }),
    );
}

#[test]
fn cmd_ack_with_value_data() {
    validate(
        "command_ack.schema.json",
        &json!({
            "now": 1770400000000_u64,
            "op": "CMD_ACK",
            "success": true,
            "src": { "op": "SET_STATE", "value": 1 },
            "data": { "value": 1 }
        }),
    );
}

#[test]
fn cmd_ack_wrong_op_rejected() {
    validate_fails(
        "command_ack.schema.json",
        &json!({
            "now": 1770400000000_u64,
            "op": "PONG",
            "success": true
        }),
    );
}

#[test]
fn cmd_ack_missing_success_rejected() {
    validate_fails(
        "command_ack.schema.json",
        &json!({
            "now": 1770400000000_u64,
            "op": "CMD_ACK"
        }),
    );
}

#[test]
fn cmd_ack_data_without_value_rejected() {
    validate_fails(
        "command_ack.schema.json",
        &json!({
            "now": 1770400000000_u64,
            "op": "CMD_ACK",
            "success": true,
            "data": { "state": 1 }
        }),
    );
}

// =========================================================================
// Inbound commands
// =========================================================================

#[test]
fn command_ping() {
    validate(
        "command.schema.json",
        &json!({ "op": "PING" }),
    );
}

#[test]
fn command_get_state() {
    validate(
        "command.schema.json",
        &json!({ "op": "GET_STATE" }),
    );
}

#[test]
fn command_get_state_with_device() {
    validate(
        "command.schema.json",
        &json!({ "op": "GET_STATE", "device": "Front Panel" }),
    );
}

#[test]
fn command_set_state() {
    validate(
        "command.schema.json",
        &json!({ "op": "SET_STATE", "value": 1 }),
    );
}

#[test]
fn command_set_state_with_device() {
    validate(
        "command.schema.json",
        &json!({ "op": "SET_STATE", "device": "Front Panel", "value": 3 }),
    );
}

#[test]
fn command_set_state_missing_value_rejected() {
    validate_fails(
        "command.schema.json",
        &json!({ "op": "SET_STATE" }),
    );
}

#[test]
fn command_set_state_value_out_of_range_rejected() {
    validate_fails(
        "command.schema.json",
        &json!({ "op": "SET_STATE", "value": 4 }),
    );
    validate_fails(
        "command.schema.json",
        &json!({ "op": "SET_STATE", "value": -1 }),
    );
}

#[test]
fn command_unknown_op_rejected() {
    validate_fails(
        "command.schema.json",
        &json!({ "op": "ARM_AWAY" }),
    );
}

#[test]
fn command_missing_op_rejected() {
    validate_fails(
        "command.schema.json",
        &json!({ "value": 1 }),
    );
}

#[test]
fn command_extra_field_rejected() {
    validate_fails(
        "command.schema.json",
        &json!({ "op": "PING", "extra": true }),
    );
}

#[test]
fn command_value_as_string_rejected() {
    validate_fails(
        "command.schema.json",
        &json!({ "op": "SET_STATE", "value": "away" }),
    );
}
