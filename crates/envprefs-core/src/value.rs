// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Deep structural equality over JSON values.

use serde_json::{Number, Value};

/// Compare two JSON values structurally.
///
/// Objects are equal when they hold the same key set and every value compares
/// equal recursively; insertion order is ignored. Arrays compare element by
/// element, so order matters. An array and an object are compared as if the
/// array were an object keyed by its indices (`["x"]` equals `{"0": "x"}`).
/// Numbers compare by numeric value, which makes `1` and `1.0` equal.
pub fn structural_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_eq(x, y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| structural_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| structural_eq(x, y)))
        }
        (Value::Array(xs), Value::Object(ys)) | (Value::Object(ys), Value::Array(xs)) => {
            xs.len() == ys.len()
                && xs.iter().enumerate().all(|(i, x)| {
                    ys.get(&i.to_string())
                        .is_some_and(|y| structural_eq(x, y))
                })
        }
        _ => false,
    }
}

#[allow(clippy::float_cmp)]
fn numbers_eq(x: &Number, y: &Number) -> bool {
    if x == y {
        return true;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(fx), Some(fy)) => (x.is_f64() || y.is_f64()) && fx == fy,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn object_key_order_is_ignored() {
        let a: Value = serde_json::from_str(r#"{"a":1,"b":2}"#).unwrap_or_default();
        let b: Value = serde_json::from_str(r#"{"b":2,"a":1}"#).unwrap_or_default();
        assert!(structural_eq(&a, &b));
    }

    #[test]
    fn differing_values_or_keys_are_unequal() {
        assert!(!structural_eq(&json!({"a": 1}), &json!({"a": 2})));
        assert!(!structural_eq(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
        assert!(!structural_eq(&json!({"a": 1}), &json!({"b": 1})));
        assert!(!structural_eq(&json!({"a": null}), &json!({})));
    }

    #[test]
    fn array_order_matters() {
        assert!(structural_eq(&json!([1, 2]), &json!([1, 2])));
        assert!(!structural_eq(&json!([1, 2]), &json!([2, 1])));
        assert!(!structural_eq(&json!([1]), &json!([1, 1])));
    }

    #[test]
    fn nested_structures_recurse() {
        let a = json!({"filters": {"ns": "kube-system", "labels": ["x", "y"]}, "limit": 10});
        let b = json!({"limit": 10, "filters": {"labels": ["x", "y"], "ns": "kube-system"}});
        assert!(structural_eq(&a, &b));

        let c = json!({"limit": 10, "filters": {"labels": ["y", "x"], "ns": "kube-system"}});
        assert!(!structural_eq(&a, &c));
    }

    #[test]
    fn arrays_match_objects_keyed_by_index() {
        assert!(structural_eq(&json!([]), &json!({})));
        assert!(structural_eq(&json!(["x"]), &json!({"0": "x"})));
        assert!(structural_eq(&json!({"1": "b", "0": "a"}), &json!(["a", "b"])));
        assert!(!structural_eq(&json!(["x"]), &json!({"1": "x"})));
        assert!(!structural_eq(&json!(["x", "y"]), &json!({"0": "x"})));
        assert!(!structural_eq(&json!(["x"]), &json!({"0": "y"})));
    }

    #[test]
    fn scalars_and_mixed_variants() {
        assert!(structural_eq(&Value::Null, &Value::Null));
        assert!(!structural_eq(&Value::Null, &json!({})));
        assert!(!structural_eq(&json!("1"), &json!(1)));
        assert!(!structural_eq(&json!([]), &Value::Null));
        assert!(structural_eq(&json!(1), &json!(1.0)));
        assert!(!structural_eq(&json!(1), &json!(-1)));
        assert!(!structural_eq(&json!(1.5), &json!(1)));
    }
}
