//! JSON Schema builders for the catalog, plus validation and output projection.
//!
//! Input schemas are plain `type: object` schemas without `additionalProperties: false`; unknown
//! argument keys are ignored rather than rejected.

use crate::error::{Result, ToolError};
use jsonschema::Validator;
use rmcp::model::JsonObject;
use serde_json::{Map, Value, json};

pub(crate) fn string(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

pub(crate) fn boolean(description: &str) -> Value {
    json!({ "type": "boolean", "description": description })
}

pub(crate) fn string_enum(values: &[&str], description: &str) -> Value {
    json!({ "type": "string", "enum": values, "description": description })
}

/// `{currency, minorUnits}` money object.
pub(crate) fn amount(minor_units_description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "currency": string("Currency code (e.g., GBP)"),
            "minorUnits": { "type": "number", "description": minor_units_description },
        },
        "required": ["currency", "minorUnits"],
    })
}

pub(crate) fn describe(mut schema: Value, description: &str) -> Value {
    if let Some(obj) = schema.as_object_mut() {
        obj.insert("description".to_string(), json!(description));
    }
    schema
}

/// Object schema from `(name, schema, required)` triples.
pub(crate) fn object(properties: Vec<(&str, Value, bool)>) -> Value {
    let mut props = Map::new();
    let mut required = Vec::new();
    for (name, schema, is_required) in properties {
        if is_required {
            required.push(Value::String(name.to_string()));
        }
        props.insert(name.to_string(), schema);
    }
    let mut out = Map::new();
    out.insert("type".to_string(), json!("object"));
    out.insert("properties".to_string(), Value::Object(props));
    if !required.is_empty() {
        out.insert("required".to_string(), Value::Array(required));
    }
    Value::Object(out)
}

pub(crate) fn to_json_object(tool: &str, schema: Value) -> Result<JsonObject> {
    match schema {
        Value::Object(obj) => Ok(obj),
        other => Err(ToolError::Definition {
            tool: tool.to_string(),
            details: format!("schema must be an object, got {other}"),
        }),
    }
}

pub(crate) fn compile(tool: &str, schema: &JsonObject) -> Result<Validator> {
    jsonschema::validator_for(&Value::Object(schema.clone())).map_err(|e| ToolError::Definition {
        tool: tool.to_string(),
        details: format!("invalid JSON schema: {e}"),
    })
}

/// Collect every violation as `path: message`, joined with `; `. `None` when valid.
pub(crate) fn violations(validator: &Validator, instance: &Value) -> Option<String> {
    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| {
            let path = e.instance_path().to_string();
            if path.is_empty() {
                e.to_string()
            } else {
                format!("{path}: {e}")
            }
        })
        .collect();
    if errors.is_empty() {
        None
    } else {
        Some(errors.join("; "))
    }
}

/// Keep only the keys an object schema declares.
///
/// Mirrors how the tools' output contracts behave: validated fields pass through, anything else
/// the API sent is dropped from the structured payload.
pub(crate) fn project(value: &Value, schema: &JsonObject) -> Value {
    let (Some(obj), Some(props)) = (
        value.as_object(),
        schema.get("properties").and_then(Value::as_object),
    ) else {
        return value.clone();
    };
    let projected: Map<String, Value> = obj
        .iter()
        .filter(|(k, _)| props.contains_key(k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Value::Object(projected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer_schema() -> JsonObject {
        to_json_object(
            "t",
            object(vec![
                ("transferUid", json!({"type": "string"}), true),
                ("success", json!({"type": "boolean"}), false),
            ]),
        )
        .expect("object schema")
    }

    #[test]
    fn object_lists_only_required_fields() {
        let s = object(vec![
            ("a", string("A"), true),
            ("b", string("B"), false),
        ]);
        assert_eq!(s["required"], json!(["a"]));
        assert_eq!(s["properties"]["b"]["description"], json!("B"));

        let empty = object(vec![]);
        assert!(empty.get("required").is_none());
        assert_eq!(empty["type"], json!("object"));
    }

    #[test]
    fn violations_report_paths() {
        let schema = to_json_object(
            "t",
            object(vec![("amount", amount("Amount in minor units (e.g., pence)"), true)]),
        )
        .expect("object schema");
        let validator = compile("t", &schema).expect("compiles");

        assert!(violations(&validator, &json!({"amount": {"currency": "GBP", "minorUnits": 5}})).is_none());

        let msg = violations(&validator, &json!({"amount": {"currency": "GBP", "minorUnits": "5"}}))
            .expect("invalid");
        assert!(msg.contains("/amount/minorUnits"), "{msg}");

        let msg = violations(&validator, &json!({})).expect("missing required");
        assert!(msg.contains("amount"), "{msg}");
    }

    #[test]
    fn unknown_argument_keys_are_accepted() {
        let schema = transfer_schema();
        let validator = compile("t", &schema).expect("compiles");
        assert!(violations(&validator, &json!({"transferUid": "x", "extra": 1})).is_none());
    }

    #[test]
    fn project_drops_undeclared_keys() {
        let schema = transfer_schema();
        let v = project(
            &json!({"transferUid": "t1", "success": true, "errors": []}),
            &schema,
        );
        assert_eq!(v, json!({"transferUid": "t1", "success": true}));
        assert_eq!(project(&json!("text"), &schema), json!("text"));
    }

    #[test]
    fn non_object_schema_is_a_definition_error() {
        assert!(matches!(
            to_json_object("bad", json!(true)),
            Err(ToolError::Definition { .. })
        ));
    }
}
