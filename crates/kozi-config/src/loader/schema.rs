//! Schema validation helpers for Kozi JSON5 configuration.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a single config layer, or the merged config, against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(map, &["$schema", "chat", "responder", "storage"], layer, "")?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("chat") {
        validate_chat(value, layer, "chat")?;
    }
    if let Some(value) = map.get("responder") {
        validate_responder(value, layer, "responder")?;
    }
    if let Some(value) = map.get("storage") {
        validate_storage(value, layer, "storage")?;
    }

    Ok(())
}

/// Validate the "chat" block.
fn validate_chat(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &["welcome_message", "apology_message", "latency"],
        layer,
        path,
    )?;
    if let Some(value) = map.get("welcome_message") {
        expect_string(value, layer, &join_path(path, "welcome_message"))?;
    }
    if let Some(value) = map.get("apology_message") {
        expect_string(value, layer, &join_path(path, "apology_message"))?;
    }
    if let Some(value) = map.get("latency") {
        let latency_path = join_path(path, "latency");
        let latency = expect_object(value, layer, &latency_path)?;
        ensure_allowed_keys(latency, &["min_ms", "max_ms"], layer, &latency_path)?;
        for key in ["min_ms", "max_ms"] {
            if let Some(value) = latency.get(key) {
                expect_u64(value, layer, &join_path(&latency_path, key))?;
            }
        }
    }
    Ok(())
}

/// Validate the "responder" block.
fn validate_responder(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["rules", "fallback", "seed"], layer, path)?;
    if let Some(rules) = map.get("rules") {
        let rules_path = join_path(path, "rules");
        let arr = expect_array(rules, layer, &rules_path)?;
        for (idx, entry) in arr.iter().enumerate() {
            validate_category(entry, layer, &format!("{rules_path}[{idx}]"))?;
        }
    }
    if let Some(value) = map.get("fallback") {
        validate_string_array(value, layer, &join_path(path, "fallback"))?;
    }
    if let Some(value) = map.get("seed") {
        expect_u64(value, layer, &join_path(path, "seed"))?;
    }
    Ok(())
}

/// Validate a single keyword category.
fn validate_category(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["name", "keywords", "replies"], layer, path)?;
    for key in ["name", "keywords", "replies"] {
        if !map.contains_key(key) {
            return Err(invalid_field(layer, &join_path(path, key), "missing key"));
        }
    }
    if let Some(value) = map.get("name") {
        expect_string(value, layer, &join_path(path, "name"))?;
    }
    if let Some(value) = map.get("keywords") {
        validate_string_array(value, layer, &join_path(path, "keywords"))?;
    }
    if let Some(value) = map.get("replies") {
        validate_string_array(value, layer, &join_path(path, "replies"))?;
    }
    Ok(())
}

/// Validate the "storage" block.
fn validate_storage(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &["backend", "path", "key", "restore_on_start"],
        layer,
        path,
    )?;
    if let Some(value) = map.get("backend") {
        let backend_path = join_path(path, "backend");
        match value.as_str() {
            Some("file" | "memory") => {}
            Some(_) => {
                return Err(invalid_field(
                    layer,
                    &backend_path,
                    "expected \"file\" or \"memory\"",
                ));
            }
            None => return Err(invalid_field(layer, &backend_path, "expected string")),
        }
    }
    if let Some(value) = map.get("path") {
        expect_string(value, layer, &join_path(path, "path"))?;
    }
    if let Some(value) = map.get("key") {
        expect_string(value, layer, &join_path(path, "key"))?;
    }
    if let Some(value) = map.get("restore_on_start") {
        expect_bool(value, layer, &join_path(path, "restore_on_start"))?;
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Expect a JSON array or return a typed error.
fn expect_array<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Vec<Value>, ConfigError> {
    match value {
        Value::Array(arr) => Ok(arr),
        _ => Err(invalid_field(layer, path, "expected array")),
    }
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Expect a JSON boolean or return a typed error.
fn expect_bool(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if matches!(value, Value::Bool(_)) {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected bool"))
    }
}

/// Expect a non-negative JSON integer or return a typed error.
fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

/// Validate that a value is an array of strings.
fn validate_string_array(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let arr = expect_array(value, layer, path)?;
    for (idx, entry) in arr.iter().enumerate() {
        if entry.as_str().is_none() {
            return Err(invalid_field(
                layer,
                &format!("{path}[{idx}]"),
                "expected string",
            ));
        }
    }
    Ok(())
}

/// Reject keys that are not part of the schema.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
