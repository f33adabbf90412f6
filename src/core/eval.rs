//! Local evaluator for the expression subset this crate emits (`step`,
//! `all`, `>=`, `<=`, `==`, `get`, `to-number`). It exists so filter and
//! color behavior can be checked against in-memory features without a
//! rendering surface, and it deliberately reproduces the surface's
//! evaluation quirks: an attribute that fails numeric coercion falls to the
//! step base case for coloring and can never satisfy a comparison.

use crate::domain::model::{coerce_number, FeatureRecord};
use serde_json::Value;

/// True iff the record passes the filter. A `None` filter passes everything.
pub fn matches(filter: Option<&Value>, record: &FeatureRecord) -> bool {
    match filter {
        None => true,
        Some(expr) => eval_bool(expr, record),
    }
}

/// Resolves a step color expression for the record, `None` when the
/// expression is not a step expression.
pub fn eval_color(expr: &Value, record: &FeatureRecord) -> Option<String> {
    let arr = expr.as_array()?;
    if arr.first()?.as_str()? != "step" || arr.len() < 3 {
        return None;
    }

    let mut color = arr[2].as_str()?.to_string();
    let Some(v) = eval_number(&arr[1], record) else {
        // base case: unparseable input classifies into the lowest class
        return Some(color);
    };

    let mut i = 3;
    while i + 1 < arr.len() {
        let stop = arr[i].as_f64()?;
        if v > stop {
            color = arr[i + 1].as_str()?.to_string();
        } else {
            break;
        }
        i += 2;
    }
    Some(color)
}

fn eval_bool(expr: &Value, record: &FeatureRecord) -> bool {
    let Some(arr) = expr.as_array() else {
        return expr.as_bool().unwrap_or(false);
    };
    let Some(op) = arr.first().and_then(Value::as_str) else {
        return false;
    };

    match op {
        "all" => arr[1..].iter().all(|term| eval_bool(term, record)),
        ">=" | "<=" | ">" | "<" => {
            let (Some(lhs), Some(rhs)) = (
                arr.get(1).and_then(|e| eval_number(e, record)),
                arr.get(2).and_then(|e| eval_number(e, record)),
            ) else {
                return false;
            };
            match op {
                ">=" => lhs >= rhs,
                "<=" => lhs <= rhs,
                ">" => lhs > rhs,
                _ => lhs < rhs,
            }
        }
        "==" => match (arr.get(1), arr.get(2)) {
            (Some(a), Some(b)) => eval_eq(a, b, record),
            _ => false,
        },
        "!=" => match (arr.get(1), arr.get(2)) {
            (Some(a), Some(b)) => !eval_eq(a, b, record),
            _ => false,
        },
        other => {
            tracing::debug!("Unsupported filter operator: {}", other);
            false
        }
    }
}

fn eval_eq(a: &Value, b: &Value, record: &FeatureRecord) -> bool {
    let a = resolve(a, record);
    let b = resolve(b, record);
    // compare numerically when both sides coerce, structurally otherwise
    match (coerce_number(&a), coerce_number(&b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn eval_number(expr: &Value, record: &FeatureRecord) -> Option<f64> {
    coerce_number(&resolve(expr, record))
}

/// Resolves an operand to a plain value: `["get", key]` reads the attribute
/// (missing → null), `["to-number", e]` coerces (failure → null), anything
/// else is a literal.
fn resolve(expr: &Value, record: &FeatureRecord) -> Value {
    let Some(arr) = expr.as_array() else {
        return expr.clone();
    };
    match (arr.first().and_then(Value::as_str), arr.get(1)) {
        (Some("get"), Some(key)) => key
            .as_str()
            .and_then(|k| record.attr(k).cloned())
            .unwrap_or(Value::Null),
        (Some("to-number"), Some(inner)) => {
            let resolved = resolve(inner, record);
            match coerce_number(&resolved) {
                Some(n) => serde_json::Number::from_f64(n)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                None => Value::Null,
            }
        }
        _ => expr.clone(),
    }
}
