//! Order-insensitive structural equality for leaf values.
//!
//! Values are canonicalized (object keys sorted, integral floats folded into
//! integers) before comparison. Canonicalization refuses to descend past
//! [`MAX_CANONICAL_DEPTH`]; callers fall back to comparing serialized text.

use serde_json::{Map, Number, Value};
use thiserror::Error;

pub const MAX_CANONICAL_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanonicalError {
    #[error("value nesting exceeds {limit} levels")]
    DepthExceeded { limit: usize },
}

/// Rebuilds `value` with sorted object keys and normalized numbers.
pub fn canonicalize(value: &Value) -> Result<Value, CanonicalError> {
    canonicalize_at(value, 0)
}

fn canonicalize_at(value: &Value, depth: usize) -> Result<Value, CanonicalError> {
    if depth > MAX_CANONICAL_DEPTH {
        return Err(CanonicalError::DepthExceeded {
            limit: MAX_CANONICAL_DEPTH,
        });
    }
    Ok(match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::with_capacity(map.len());
            for key in keys {
                out.insert(key.clone(), canonicalize_at(&map[key], depth + 1)?);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| canonicalize_at(item, depth + 1))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Number(n) => Value::Number(canonical_number(n)),
        other => other.clone(),
    })
}

fn canonical_number(n: &Number) -> Number {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                return Number::from(f as i64);
            }
        }
    }
    n.clone()
}

/// Structural equality that reports when canonicalization is impossible.
pub fn try_structural_eq(a: &Value, b: &Value) -> Result<bool, CanonicalError> {
    Ok(canonicalize(a)? == canonicalize(b)?)
}

/// Structural equality with the serialized-text fallback applied.
pub fn structural_eq(a: &Value, b: &Value) -> bool {
    try_structural_eq(a, b).unwrap_or_else(|_| serialized_eq(a, b))
}

pub(crate) fn serialized_eq(a: &Value, b: &Value) -> bool {
    let left = serde_json::to_string(a).unwrap_or_else(|_| a.to_string());
    let right = serde_json::to_string(b).unwrap_or_else(|_| b.to_string());
    left == right
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested(depth: usize) -> Value {
        let mut value = json!(0);
        for _ in 0..depth {
            value = json!([value]);
        }
        value
    }

    #[test]
    fn object_key_order_is_irrelevant() {
        let a: Value = serde_json::from_str(r#"{"b": 1, "a": {"y": 2, "x": 3}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"a": {"x": 3, "y": 2}, "b": 1}"#).unwrap();
        assert_eq!(try_structural_eq(&a, &b), Ok(true));
    }

    #[test]
    fn canonical_form_sorts_keys() {
        let a: Value = serde_json::from_str(r#"{"b": 1, "a": 2}"#).unwrap();
        let text = serde_json::to_string(&canonicalize(&a).unwrap()).unwrap();
        assert_eq!(text, r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn array_order_matters() {
        assert!(!structural_eq(&json!([1, 2]), &json!([2, 1])));
    }

    #[test]
    fn integral_floats_equal_integers() {
        assert!(structural_eq(&json!(1.0), &json!(1)));
        assert!(!structural_eq(&json!(1.5), &json!(1)));
    }

    #[test]
    fn deep_values_fall_back_to_serialized_comparison() {
        let deep = nested(MAX_CANONICAL_DEPTH + 5);
        assert_eq!(
            try_structural_eq(&deep, &deep),
            Err(CanonicalError::DepthExceeded {
                limit: MAX_CANONICAL_DEPTH
            })
        );
        assert!(structural_eq(&deep, &deep.clone()));
        assert!(!structural_eq(&deep, &nested(MAX_CANONICAL_DEPTH + 6)));
    }
}
