use serde::Serialize;
use serde_json::Value;

use super::domain::{FormType, RequiredField};

/// Result of checking a payload's required fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Checks that every required field of `form_type` is filled in.
///
/// Only presence is checked. A payload that is not a JSON object has every field missing.
pub fn validate(form_type: FormType, payload: &Value) -> ValidationOutcome {
    let errors: Vec<String> = form_type
        .required_fields()
        .iter()
        .filter(|field| !is_filled(lookup(payload, field)))
        .map(RequiredField::missing_message)
        .collect();

    ValidationOutcome {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn lookup<'a>(payload: &'a Value, field: &RequiredField) -> Option<&'a Value> {
    field
        .path
        .iter()
        .try_fold(payload, |value, segment| value.as_object()?.get(*segment))
}

// Numbers and booleans count as filled; blank strings and empty collections do not.
fn is_filled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(text)) => !text.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
        Some(Value::Bool(_)) | Some(Value::Number(_)) => true,
    }
}
