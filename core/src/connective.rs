//! Connectives and quantifiers over the matcher.
//!
//! Each function takes specs and returns a new predicate spec, so
//! connectives nest freely inside containers and each other.
//!
//! | Spec | Accepts when | Result |
//! |------|--------------|--------|
//! | [`all`] | every sub-spec accepts | `Right(x)`, or `Left(first failing sub-result)` |
//! | [`any`] | some sub-spec accepts | `Right(first passing sub-result)`, or `Left(x)` |
//! | [`not`] | the sub-spec rejects | plain boolean |
//! | [`every`] | every element accepts | per-element results, same shape as `x` |
//! | [`some`] | some element accepts | `Right(x)` / `Left(x)` |
//! | [`maybe`] | `x` is null or the sub-spec accepts | sub-result |
//! | [`strict`] | the sub-spec accepts with no extra keys | sub-result |
//!
//! `all` short-circuits at the first rejection and `any` at the first
//! acceptance: later sub-specs are never evaluated.

use crate::spec::Predicate;
use crate::{create_at, is_at, Either, Path, TypeSpec, Value};

/// Logical AND.
///
/// # Example
///
/// ```
/// use patma::{all, create, gt, is_int, Value};
///
/// let spec = all([is_int(), gt(2)]);
/// assert!(create(&spec, &Value::from(3)).is_right());
/// assert_eq!(create(&spec, &Value::from(1)).lval(), Value::from(1));
/// ```
pub fn all<S: Into<TypeSpec>>(specs: impl IntoIterator<Item = S>) -> TypeSpec {
    let specs: Vec<TypeSpec> = specs.into_iter().map(Into::into).collect();
    let children = specs.clone();
    TypeSpec::Predicate(Predicate::composite(
        "all",
        children,
        move |value: &Value, path: &Path| {
            for spec in &specs {
                let result = create_at(spec, value, path, false);
                if result.is_left() {
                    return Either::Left(result.into());
                }
            }
            Either::right(value.clone())
        },
    ))
}

/// Logical OR.
///
/// On failure the original value is returned, not a sub-result.
pub fn any<S: Into<TypeSpec>>(specs: impl IntoIterator<Item = S>) -> TypeSpec {
    let specs: Vec<TypeSpec> = specs.into_iter().map(Into::into).collect();
    let children = specs.clone();
    TypeSpec::Predicate(Predicate::composite(
        "any",
        children,
        move |value: &Value, path: &Path| {
            for spec in &specs {
                let result = create_at(spec, value, path, false);
                if result.is_right() {
                    return Either::Right(result.into());
                }
            }
            Either::left(value.clone())
        },
    ))
}

/// Logical NOT. Path detail of the sub-result is dropped.
pub fn not(spec: impl Into<TypeSpec>) -> TypeSpec {
    let spec = spec.into();
    TypeSpec::Predicate(Predicate::composite(
        "not",
        vec![spec.clone()],
        move |value: &Value, path: &Path| !is_at(&spec, value, path, false),
    ))
}

/// Universal quantifier over a container's elements.
///
/// Each element is checked with its own key as path. `Null` follows the
/// sub-spec's verdict on `Null`; any other scalar is rejected.
///
/// # Example
///
/// ```
/// use patma::{create, every, is_string, Value};
///
/// let spec = every(is_string());
/// assert!(create(&spec, &Value::list(Vec::<Value>::new())).is_right());
/// assert!(create(&spec, &Value::list(["a", "b"])).is_right());
///
/// let result = create(&spec, &Value::list([Value::from("a"), "b".into(), 3.into()]));
/// assert!(result.is_left());
/// assert_eq!(result.lval(), Value::list([Value::Null, Value::Null, 3.into()]));
/// ```
pub fn every(spec: impl Into<TypeSpec>) -> TypeSpec {
    let spec = spec.into();
    TypeSpec::Predicate(Predicate::composite(
        "every",
        vec![spec.clone()],
        move |value: &Value, path: &Path| match value {
            Value::Container(items) => {
                let mut accepted = true;
                let results = items.map(|key, item| {
                    let result = create_at(&spec, item, &Path::from(key.clone()), false);
                    accepted &= result.is_right();
                    result
                });
                if accepted {
                    Either::Right(results.into())
                } else {
                    Either::Left(results.into())
                }
            }
            Value::Null => create_at(&spec, value, path, false),
            _ => Either::left(value.clone()),
        },
    ))
}

/// Existential quantifier over a container's elements.
///
/// Stops at the first accepted element.
pub fn some(spec: impl Into<TypeSpec>) -> TypeSpec {
    let spec = spec.into();
    TypeSpec::Predicate(Predicate::composite(
        "some",
        vec![spec.clone()],
        move |value: &Value, path: &Path| match value {
            Value::Container(items) => Either::verdict(
                items
                    .iter()
                    .any(|(key, item)| is_at(&spec, item, &Path::from(key.clone()), false)),
                value.clone(),
            ),
            Value::Null => Either::verdict(is_at(&spec, value, path, false), Value::Null),
            _ => Either::left(value.clone()),
        },
    ))
}

/// Accept `Null`, or whatever the sub-spec accepts.
pub fn maybe(spec: impl Into<TypeSpec>) -> TypeSpec {
    let spec = spec.into();
    TypeSpec::Predicate(Predicate::composite(
        "maybe",
        vec![spec.clone()],
        move |value: &Value, path: &Path| {
            if value.is_null() {
                Either::right(Value::Null)
            } else {
                create_at(&spec, value, path, false)
            }
        },
    ))
}

/// Check with the closed-world flag: a container spec rejects extra keys.
pub fn strict(spec: impl Into<TypeSpec>) -> TypeSpec {
    let spec = spec.into();
    TypeSpec::Predicate(Predicate::composite(
        "strict",
        vec![spec.clone()],
        move |value: &Value, path: &Path| create_at(&spec, value, path, true),
    ))
}
