//! Builtin predicate specs.
//!
//! Type tests ([`is_int`], [`is_string`], ...) and comparisons against a
//! fixed operand ([`eq`], [`gt`], [`one_of`], ...). Each returns a labelled
//! [`TypeSpec`] ready to be nested in containers or connectives.

use std::cmp::Ordering;

use crate::{TypeSpec, Value};

fn type_test(label: &str, f: fn(&Value) -> bool) -> TypeSpec {
    TypeSpec::named(label, move |value: &Value, _| f(value))
}

/// `Null`, or a container whose leaves are all null (recursively).
#[must_use]
pub fn is_null() -> TypeSpec {
    type_test("is_null", null_like)
}

fn null_like(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Container(c) => c.values().all(null_like),
        _ => false,
    }
}

/// Booleans.
#[must_use]
pub fn is_bool() -> TypeSpec {
    type_test("is_bool", |v| matches!(v, Value::Bool(_)))
}

/// Integers.
#[must_use]
pub fn is_int() -> TypeSpec {
    type_test("is_int", |v| matches!(v, Value::Int(_)))
}

/// Floats.
#[must_use]
pub fn is_float() -> TypeSpec {
    type_test("is_float", |v| matches!(v, Value::Float(_)))
}

/// Numbers and numeric strings such as `"42"`, `" 1.5"` or `"1e3"`.
#[must_use]
pub fn is_numeric() -> TypeSpec {
    type_test("is_numeric", |v| match v {
        Value::Int(_) | Value::Float(_) => true,
        Value::String(s) => numeric_str(s),
        _ => false,
    })
}

fn numeric_str(s: &str) -> bool {
    let trimmed = s.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Strings.
#[must_use]
pub fn is_string() -> TypeSpec {
    type_test("is_string", |v| matches!(v, Value::String(_)))
}

/// Booleans, numbers and strings.
#[must_use]
pub fn is_scalar() -> TypeSpec {
    type_test("is_scalar", |v| {
        matches!(
            v,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_)
        )
    })
}

/// Arrays (lists and maps), not field bags.
#[must_use]
pub fn is_array() -> TypeSpec {
    type_test("is_array", |v| {
        v.as_container().is_some_and(|c| !c.is_object())
    })
}

/// Arrays keyed exactly `0..n`.
#[must_use]
pub fn is_list() -> TypeSpec {
    type_test("is_list", |v| v.as_container().is_some_and(|c| c.is_list()))
}

/// Field bags.
#[must_use]
pub fn is_object() -> TypeSpec {
    type_test("is_object", |v| {
        v.as_container().is_some_and(|c| c.is_object())
    })
}

/// Arrays and field bags.
#[must_use]
pub fn is_container() -> TypeSpec {
    type_test("is_container", Value::is_container)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Comparisons
// ═══════════════════════════════════════════════════════════════════════════════

/// Strict equality with `operand`. Unlike a literal spec, never a class check.
pub fn eq(operand: impl Into<Value>) -> TypeSpec {
    let operand = operand.into();
    TypeSpec::named("eq", move |value: &Value, _| *value == operand)
}

fn ordering(label: &str, operand: Value, accept: fn(Ordering) -> bool) -> TypeSpec {
    TypeSpec::named(label, move |value: &Value, _| {
        value.compare(&operand).is_some_and(accept)
    })
}

/// Greater than `operand`. Incomparable values are rejected.
pub fn gt(operand: impl Into<Value>) -> TypeSpec {
    ordering("gt", operand.into(), Ordering::is_gt)
}

/// Greater than or equal to `operand`.
pub fn gte(operand: impl Into<Value>) -> TypeSpec {
    ordering("gte", operand.into(), Ordering::is_ge)
}

/// Less than `operand`.
pub fn lt(operand: impl Into<Value>) -> TypeSpec {
    ordering("lt", operand.into(), Ordering::is_lt)
}

/// Less than or equal to `operand`.
pub fn lte(operand: impl Into<Value>) -> TypeSpec {
    ordering("lte", operand.into(), Ordering::is_le)
}

/// Membership, by strict equality.
///
/// # Example
///
/// ```
/// use patma::{is, one_of, Value};
///
/// let spec = one_of(["GET", "HEAD"]);
/// assert!(is(&spec, &Value::from("GET")));
/// assert!(!is(&spec, &Value::from("POST")));
/// ```
pub fn one_of<V: Into<Value>>(options: impl IntoIterator<Item = V>) -> TypeSpec {
    let options: Vec<Value> = options.into_iter().map(Into::into).collect();
    TypeSpec::named("one_of", move |value: &Value, _| options.contains(value))
}
