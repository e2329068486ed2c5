//! Value coercion before comparison
//!
//! Column values arriving from a physical source are often strings or
//! dialect-native primitives. Before any comparison they are coerced to the
//! type the mapping declares for the column — or, where the mapping is
//! silent, to the comparison operand's runtime type. Null coerces to null;
//! anything else that fails to convert raises [`EvalError::Coercion`].

use chrono::DateTime;
use serde_json::{json, Value};

use crate::mapping::ValueType;

use super::errors::{EvalError, EvalResult};

/// Coerces a value to the target type
pub fn coerce(value: &Value, target: ValueType) -> EvalResult<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    let coerced = match target {
        ValueType::Bool => coerce_bool(value),
        ValueType::Integer => coerce_integer(value),
        ValueType::Float => coerce_float(value),
        ValueType::Text => coerce_text(value),
        ValueType::Timestamp => coerce_timestamp(value),
    };
    coerced.ok_or_else(|| EvalError::Coercion {
        target,
        value: value.to_string(),
    })
}

/// Coerces `value` toward the runtime type of `operand`.
///
/// The direction is asymmetric on purpose: the row value moves toward the
/// operand, preserving compatibility with stores whose physical values are
/// all text.
pub fn coerce_to_operand(value: &Value, operand: &Value) -> EvalResult<Value> {
    match runtime_type(operand) {
        Some(target) => coerce(value, target),
        None => Ok(value.clone()),
    }
}

/// Runtime type of a value, where one is defined
pub fn runtime_type(value: &Value) -> Option<ValueType> {
    match value {
        Value::Bool(_) => Some(ValueType::Bool),
        Value::Number(n) if n.is_f64() => Some(ValueType::Float),
        Value::Number(_) => Some(ValueType::Integer),
        Value::String(_) => Some(ValueType::Text),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn coerce_bool(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(_) => Some(value.clone()),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(json!(true)),
            "false" | "0" => Some(json!(false)),
            _ => None,
        },
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(json!(false)),
            Some(1) => Some(json!(true)),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(json!(i))
            } else {
                // A float with no fractional part still counts
                n.as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| json!(f as i64))
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok().map(|i| json!(i)),
        _ => None,
    }
}

fn coerce_float(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) => n.as_f64().map(|f| json!(f)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| json!(f)),
        _ => None,
    }
}

fn coerce_text(value: &Value) -> Option<Value> {
    match value {
        Value::String(_) => Some(value.clone()),
        Value::Number(n) => Some(json!(n.to_string())),
        Value::Bool(b) => Some(json!(b.to_string())),
        _ => None,
    }
}

/// Timestamps normalize to epoch milliseconds so ordering is numeric
fn coerce_timestamp(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) => n.as_i64().map(|i| json!(i)),
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| json!(dt.timestamp_millis())),
        _ => None,
    }
}
