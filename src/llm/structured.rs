//! Lenient decoding of structured (JSON-schema) replies.
//!
//! Models asked for JSON still sometimes wrap it in a Markdown fence, add a
//! sentence around it, or quote a boolean. The helpers here recover the
//! object and coerce scalar strings to the types the schema declares before
//! handing it to serde.

use crate::error::LlmError;
use crate::llm::types::ResponseSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Strip an optional code fence and return the outermost `{...}` span.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        // Drop the info string (`json`, `JSON`, ...) up to the first newline.
        body = rest.split_once('\n').map_or(rest, |(_, after)| after);
        body = body.trim_end().strip_suffix("```").unwrap_or(body);
    }

    let start = body.find('{')?;
    let end = body.rfind('}')?;
    (start < end).then(|| &body[start..=end])
}

/// Coerce string values whose property declares a scalar `type`.
#[must_use]
pub fn coerce_to_schema(value: &Value, schema: &Value) -> Value {
    let (Some(object), Some(properties)) = (
        value.as_object(),
        schema.get("properties").and_then(Value::as_object),
    ) else {
        return value.clone();
    };

    let coerced = object
        .iter()
        .map(|(key, field)| {
            let target = properties
                .get(key)
                .and_then(|prop| prop.get("type"))
                .and_then(Value::as_str);
            let field = match target {
                Some(target) => coerce_value(field, target),
                None => field.clone(),
            };
            (key.clone(), field)
        })
        .collect();

    Value::Object(coerced)
}

/// Coerce a string to `number`, `integer` or `boolean`. Anything that does
/// not convert is returned unchanged.
#[must_use]
pub fn coerce_value(value: &Value, target_type: &str) -> Value {
    let Value::String(s) = value else {
        return value.clone();
    };

    let coerced = match target_type {
        "number" => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        "integer" => s.trim().parse::<i64>().ok().map(|n| Value::Number(n.into())),
        "boolean" => match s.trim().to_lowercase().as_str() {
            "true" | "yes" => Some(Value::Bool(true)),
            "false" | "no" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    };
    coerced.unwrap_or_else(|| value.clone())
}

/// Decode a structured reply into `T`.
pub fn parse_structured<T: DeserializeOwned>(
    text: &str,
    schema: &ResponseSchema,
) -> Result<T, LlmError> {
    let object = extract_json_object(text).ok_or_else(|| {
        LlmError::StructuredOutput(format!("no JSON object in `{}` reply", schema.name))
    })?;
    let value: Value = serde_json::from_str(object)
        .map_err(|error| LlmError::StructuredOutput(format!("{}: {error}", schema.name)))?;
    serde_json::from_value(coerce_to_schema(&value, &schema.schema))
        .map_err(|error| LlmError::StructuredOutput(format!("{}: {error}", schema.name)))
}
