//! `TypeSpec` — Composable type specifications and the recursive matcher
//!
//! A [`TypeSpec`] is a plain value describing what a matching [`Value`] looks
//! like. [`create`] checks a value against it and returns an [`Either`];
//! [`is`] is the boolean projection of the same check.
//!
//! Variants are tried in a fixed precedence:
//!
//! 1. **Container** vs a container value: structural recursion per spec key
//! 2. **Custom**: a [`Matchable`] says yes or no
//! 3. **Predicate**: a closure over `(value, path)` answers a bool or an `Either`
//! 4. **Literal class name**: a string spec checked with *is-a* when the value
//!    is an object, or when the name is declared by the active
//!    [`TypeRegistry`](crate::TypeRegistry); anything else is then rejected
//! 5. **Literal**: strict equality
//! 6. **Var**: a [`MatchVariable`] unifies with the value
//!
//! # Container rules
//!
//! - A data entry that is `Null` counts as absent.
//! - An absent key is accepted iff its sub-spec accepts `Null` (optional fields).
//! - In strict mode, data keys the spec does not name are rejected.
//! - The result payload mirrors the data: same kind, same keys, data order.
//!   Extra keys surface as `Right(v)` (or `Left(v)` when strict); a rejected
//!   absent key is appended as `Left(null)`.

use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

use crate::registry::{instance_of, is_declared};
use crate::{
    Container, Either, Key, Matchable, MatchVariable, Outcome, Path, SpecError, Value, MAX_DEPTH,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Predicate
// ═══════════════════════════════════════════════════════════════════════════════

type PredicateFn = Rc<dyn Fn(&Value, &Path) -> Outcome>;

/// A closure spec with the fixed `(value, path)` signature.
///
/// Predicates built by connectives remember the specs they close over so
/// that [`TypeSpec::depth`] can see through them.
#[derive(Clone)]
pub struct Predicate {
    label: Rc<str>,
    children: Rc<[TypeSpec]>,
    f: PredicateFn,
}

impl Predicate {
    /// Wrap a closure returning `bool`, `Either`, `Outcome` or `()`.
    pub fn new<R, F>(f: F) -> Self
    where
        R: Into<Outcome>,
        F: Fn(&Value, &Path) -> R + 'static,
    {
        Self::named("predicate", f)
    }

    /// Wrap a closure with a label shown in `Debug` output.
    pub fn named<R, F>(label: &str, f: F) -> Self
    where
        R: Into<Outcome>,
        F: Fn(&Value, &Path) -> R + 'static,
    {
        Self::composite(label, Vec::new(), f)
    }

    pub(crate) fn composite<R, F>(label: &str, children: Vec<TypeSpec>, f: F) -> Self
    where
        R: Into<Outcome>,
        F: Fn(&Value, &Path) -> R + 'static,
    {
        let f: PredicateFn = Rc::new(move |value: &Value, path: &Path| f(value, path).into());
        Self {
            label: Rc::from(label),
            children: children.into(),
            f,
        }
    }

    /// The label.
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Specs this predicate closes over.
    #[must_use]
    pub fn children(&self) -> &[TypeSpec] {
        &self.children
    }

    /// Run the closure.
    #[must_use]
    pub fn test(&self, value: &Value, path: &Path) -> Outcome {
        (self.f)(value, path)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.children.is_empty() {
            f.debug_tuple("Predicate").field(&self.label).finish()
        } else {
            f.debug_tuple("Predicate")
                .field(&self.label)
                .field(&self.children)
                .finish()
        }
    }
}

/// Build a predicate spec from a closure.
///
/// # Example
///
/// ```
/// use patma::{is, pred, Value};
///
/// let even = pred(|v: &Value, _| v.as_int().is_some_and(|i| i % 2 == 0));
/// assert!(is(&even, &Value::from(4)));
/// assert!(!is(&even, &Value::from("4")));
/// ```
pub fn pred<R, F>(f: F) -> TypeSpec
where
    R: Into<Outcome>,
    F: Fn(&Value, &Path) -> R + 'static,
{
    TypeSpec::Predicate(Predicate::new(f))
}

// ═══════════════════════════════════════════════════════════════════════════════
// TypeSpec
// ═══════════════════════════════════════════════════════════════════════════════

/// A composable type specification.
///
/// Cheap to clone: every non-literal variant is reference counted.
#[derive(Debug, Clone)]
pub enum TypeSpec {
    /// Per-key sub-specs, checked against a container value.
    Container(Container<TypeSpec>),
    /// Custom acceptance capability.
    Custom(Rc<dyn Matchable>),
    /// Closure over `(value, path)`.
    Predicate(Predicate),
    /// Exact value. A string doubles as a class name against objects and
    /// whenever the active registry declares it.
    Literal(Value),
    /// Logic variable leaf.
    Var(MatchVariable),
}

impl TypeSpec {
    /// A positional spec, keyed `0..n`.
    pub fn list<S: Into<TypeSpec>>(items: impl IntoIterator<Item = S>) -> Self {
        Self::Container(Container::list(items.into_iter().map(Into::into)))
    }

    /// A keyed spec from `(key, spec)` pairs.
    pub fn map<K: Into<Key>, S: Into<TypeSpec>>(entries: impl IntoIterator<Item = (K, S)>) -> Self {
        Self::Container(
            entries
                .into_iter()
                .map(|(key, spec)| (key.into(), spec.into()))
                .collect(),
        )
    }

    /// A predicate spec.
    pub fn predicate<R, F>(f: F) -> Self
    where
        R: Into<Outcome>,
        F: Fn(&Value, &Path) -> R + 'static,
    {
        Self::Predicate(Predicate::new(f))
    }

    /// A labelled predicate spec.
    pub fn named<R, F>(label: &str, f: F) -> Self
    where
        R: Into<Outcome>,
        F: Fn(&Value, &Path) -> R + 'static,
    {
        Self::Predicate(Predicate::named(label, f))
    }

    /// A custom spec.
    pub fn custom(matcher: impl Matchable + 'static) -> Self {
        Self::Custom(Rc::new(matcher))
    }

    /// An exact-value spec, even for containers.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Nesting depth of this spec tree.
    ///
    /// Leaves have depth 1. Containers, connectives and constrained variables
    /// add one level over their deepest child. Measuring stops at
    /// `MAX_DEPTH + 1`, which is also what a variable reached again through
    /// its own constraint reports.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.measure(MAX_DEPTH + 1, &mut Vec::new())
    }

    fn measure(&self, cap: usize, open: &mut Vec<MatchVariable>) -> usize {
        if cap <= 1 {
            return cap;
        }
        let below = cap - 1;
        match self {
            Self::Container(fields) => {
                1 + fields
                    .values()
                    .map(|spec| spec.measure(below, open))
                    .max()
                    .unwrap_or(0)
            }
            Self::Predicate(p) => {
                1 + p
                    .children()
                    .iter()
                    .map(|spec| spec.measure(below, open))
                    .max()
                    .unwrap_or(0)
            }
            Self::Var(var) => {
                if open.iter().any(|outer| outer.ptr_eq(var)) {
                    return cap;
                }
                let Some(constraint) = var.constraint() else {
                    return 1;
                };
                open.push(var.clone());
                let depth = 1 + constraint.measure(below, open);
                open.pop();
                depth
            }
            Self::Custom(_) | Self::Literal(_) => 1,
        }
    }

    /// Reject specs nested deeper than [`MAX_DEPTH`].
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::DepthExceeded`] with the measured depth.
    pub fn validate(&self) -> Result<(), SpecError> {
        let depth = self.depth();
        if depth > MAX_DEPTH {
            tracing::warn!(target: "patma", depth, max = MAX_DEPTH, "spec rejected");
            return Err(SpecError::DepthExceeded {
                depth,
                max: MAX_DEPTH,
            });
        }
        Ok(())
    }
}

impl From<Value> for TypeSpec {
    /// Containers become container specs; scalars become literals.
    fn from(value: Value) -> Self {
        match value {
            Value::Container(c) => Self::Container(c.map(|_, child| Self::from(child.clone()))),
            scalar => Self::Literal(scalar),
        }
    }
}

impl From<&str> for TypeSpec {
    fn from(s: &str) -> Self {
        Self::Literal(Value::from(s))
    }
}

impl From<String> for TypeSpec {
    fn from(s: String) -> Self {
        Self::Literal(Value::String(s))
    }
}

impl From<i64> for TypeSpec {
    fn from(i: i64) -> Self {
        Self::Literal(Value::Int(i))
    }
}

impl From<i32> for TypeSpec {
    fn from(i: i32) -> Self {
        Self::Literal(Value::from(i))
    }
}

impl From<f64> for TypeSpec {
    fn from(f: f64) -> Self {
        Self::Literal(Value::Float(f))
    }
}

impl From<bool> for TypeSpec {
    fn from(b: bool) -> Self {
        Self::Literal(Value::Bool(b))
    }
}

impl From<Vec<TypeSpec>> for TypeSpec {
    fn from(items: Vec<TypeSpec>) -> Self {
        Self::list(items)
    }
}

impl From<Container<TypeSpec>> for TypeSpec {
    fn from(fields: Container<TypeSpec>) -> Self {
        Self::Container(fields)
    }
}

impl From<MatchVariable> for TypeSpec {
    fn from(var: MatchVariable) -> Self {
        Self::Var(var)
    }
}

impl From<&MatchVariable> for TypeSpec {
    fn from(var: &MatchVariable) -> Self {
        Self::Var(var.clone())
    }
}

impl From<Predicate> for TypeSpec {
    fn from(p: Predicate) -> Self {
        Self::Predicate(p)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Matcher
// ═══════════════════════════════════════════════════════════════════════════════

/// Check a root value against a spec.
///
/// # Example
///
/// ```
/// use patma::{create, is_int, is_string, TypeSpec, Value};
///
/// let spec = TypeSpec::map([("name", is_string()), ("age", is_int())]);
/// let result = create(&spec, &Value::map([("name", Value::from("bo")), ("age", "x".into())]));
///
/// assert!(result.is_left());
/// assert_eq!(result.lval(), Value::map([("name", Value::Null), ("age", "x".into())]));
/// ```
#[must_use]
pub fn create(spec: &TypeSpec, value: &Value) -> Either {
    create_at(spec, value, &Path::root(), false)
}

/// Check a value found at `path` against a spec.
///
/// With `strict`, a container spec also rejects data keys it does not name.
/// Strictness applies to the outermost container only.
#[must_use]
pub fn create_at(spec: &TypeSpec, value: &Value, path: &Path, strict: bool) -> Either {
    match spec {
        TypeSpec::Container(fields) => match value {
            Value::Container(data) => check_container(fields, data, strict),
            _ => Either::left(value.clone()),
        },
        TypeSpec::Custom(matcher) => Either::verdict(matcher.accepts(value), value.clone()),
        TypeSpec::Predicate(p) => p.test(value, path).into_either(value),
        TypeSpec::Literal(Value::String(name)) if is_object(value) || is_declared(name) => {
            Either::verdict(instance_of(value, name), value.clone())
        }
        TypeSpec::Literal(literal) => Either::verdict(literal == value, value.clone()),
        TypeSpec::Var(var) => var.unify(value, path),
    }
}

/// Boolean projection of [`create`].
#[must_use]
pub fn is(spec: &TypeSpec, value: &Value) -> bool {
    create(spec, value).is_right()
}

/// Boolean projection of [`create_at`].
#[must_use]
pub fn is_at(spec: &TypeSpec, value: &Value, path: &Path, strict: bool) -> bool {
    create_at(spec, value, path, strict).is_right()
}

fn is_object(value: &Value) -> bool {
    value.as_container().is_some_and(Container::is_object)
}

fn check_container(fields: &Container<TypeSpec>, data: &Container<Value>, strict: bool) -> Either {
    let mut accepted = true;
    let mut verdicts: IndexMap<Key, Either> = IndexMap::with_capacity(fields.len());
    let mut missing = Vec::new();
    let null = Value::Null;

    for (key, spec) in fields {
        let child = data.get(key).filter(|v| !v.is_null()).unwrap_or(&null);
        let verdict = create_at(spec, child, &Path::from(key.clone()), false);
        accepted &= verdict.is_right();
        if data.contains_key(key) {
            verdicts.insert(key.clone(), verdict);
        } else if verdict.is_left() {
            missing.push((key.clone(), verdict));
        }
    }

    let mut payload = Container::with_kind(data.kind().clone());
    for (key, child) in data {
        let verdict = verdicts.swap_remove(key).unwrap_or_else(|| {
            if strict {
                accepted = false;
                Either::left(child.clone())
            } else {
                Either::right(child.clone())
            }
        });
        payload.insert(key.clone(), verdict);
    }
    for (key, verdict) in missing {
        payload.insert(key, verdict);
    }

    if accepted {
        Either::Right(payload.into())
    } else {
        Either::Left(payload.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{any, is_int, is_string, lval, rval, Class};

    #[test]
    fn test_literal_is_strict() {
        assert!(is(&"a".into(), &Value::from("a")));
        assert!(!is(&1.into(), &Value::from("1")));
        assert!(!is(&1.into(), &Value::Float(1.0)));
        assert!(is(&TypeSpec::literal(Value::Null), &Value::Null));
    }

    #[test]
    fn test_container_spec_against_scalar_rejects() {
        let spec = TypeSpec::list([is_int()]);
        assert_eq!(create(&spec, &Value::from(1)), Either::left(1));
    }

    #[test]
    fn test_all_leaves_accept() {
        let spec = TypeSpec::list([is_string(), is_int()]);
        let data = Value::list([Value::from("a"), Value::from(1)]);
        let result = create(&spec, &data);
        assert!(result.is_right());
        assert_eq!(rval(&result), data);
        assert_eq!(lval(&result), Value::list([Value::Null, Value::Null]));
    }

    #[test]
    fn test_siblings_keep_being_checked() {
        let spec = TypeSpec::list([is_int(), is_int(), is_int()]);
        let data = Value::list([Value::from("a"), Value::from(2), Value::from("c")]);
        let result = create(&spec, &data);
        assert_eq!(
            result.lval(),
            Value::list([Value::from("a"), Value::Null, Value::from("c")])
        );
    }

    #[test]
    fn test_optional_field_accepts_missing() {
        let spec = TypeSpec::map([("a", is_int()), ("b", crate::maybe(is_int()))]);
        let result = create(&spec, &Value::map([("a", 1)]));
        assert!(result.is_right());
        // an accepted absent key does not appear in the payload
        assert_eq!(result.rval(), Value::map([("a", 1)]));
    }

    #[test]
    fn test_required_field_rejects_missing() {
        let spec = TypeSpec::map([("a", is_int()), ("b", is_int())]);
        let result = create(&spec, &Value::map([("a", 1)]));
        assert!(result.is_left());
        assert_eq!(
            result.lval(),
            Value::map([("a", Value::Null), ("b", Value::Null)])
        );
        match result.payload() {
            crate::Payload::Container(c) => {
                assert_eq!(c.get(&Key::from("b")), Some(&Either::left(Value::Null)));
            }
            other => panic!("expected container payload, got {other:?}"),
        }
    }

    #[test]
    fn test_null_entry_counts_as_absent() {
        let spec = TypeSpec::map([("a", is_int())]);
        let result = create(&spec, &Value::map([("a", Value::Null)]));
        assert!(result.is_left());
    }

    #[test]
    fn test_extra_keys_follow_strictness() {
        let spec = TypeSpec::map([("a", is_int())]);
        let data = Value::map([("a", Value::from(1)), ("z", Value::from("extra"))]);

        let open = create_at(&spec, &data, &Path::root(), false);
        assert!(open.is_right());
        assert_eq!(open.rval(), data);

        let closed = create_at(&spec, &data, &Path::root(), true);
        assert!(closed.is_left());
        assert_eq!(
            closed.lval(),
            Value::map([("a", Value::Null), ("z", Value::from("extra"))])
        );
    }

    #[test]
    fn test_payload_in_data_order() {
        let spec = TypeSpec::map([("b", is_int()), ("a", is_int())]);
        let data = Value::map([("a", 1), ("b", 2)]);
        let keys: Vec<Key> = create(&spec, &data)
            .rval()
            .as_container()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec![Key::from("a"), Key::from("b")]);
    }

    #[test]
    fn test_children_see_their_own_key() {
        let spec = TypeSpec::map([(
            "name",
            pred(|_: &Value, path: &Path| path == &Path::new(["name"])),
        )]);
        assert!(is(&spec, &Value::map([("name", "x")])));
    }

    #[test]
    fn test_predicate_outcomes() {
        assert!(is(&pred(|_: &Value, _: &Path| ()), &Value::Null));
        assert!(!is(&pred(|_: &Value, _: &Path| false), &Value::Null));
        let detailed = pred(|v: &Value, _: &Path| Either::left(v.clone()));
        assert_eq!(create(&detailed, &Value::from(7)), Either::left(7));
    }

    #[test]
    fn test_class_name_against_anonymous_object() {
        let bag = Value::object([("x", 1)]);
        assert!(!is(&"Anything".into(), &bag));
        let class = Rc::new(Class::new("Point", []));
        let point = Value::Container(Container::object(Some(class)).with("x", Value::from(1)));
        assert!(is(&"Point".into(), &point));
    }

    #[test]
    fn test_object_spec_matches_object_fields() {
        let spec = TypeSpec::map([("x", is_int())]);
        let bag = Value::object([("x", 1)]);
        let result = create(&spec, &bag);
        assert!(result.is_right());
        assert!(result.rval().as_container().unwrap().is_object());
    }

    #[test]
    fn test_from_value_builds_container_spec() {
        let spec = TypeSpec::from(Value::list(["a", "b"]));
        assert!(matches!(spec, TypeSpec::Container(_)));
        assert!(is(&spec, &Value::list(["a", "b", "c"])));
        assert!(!is(&TypeSpec::literal(Value::list(["a", "b"])), &Value::list(["a", "b", "c"])));
    }

    #[test]
    fn test_depth_and_validate() {
        assert_eq!(is_int().depth(), 1);
        assert_eq!(TypeSpec::list([TypeSpec::list([is_int()])]).depth(), 3);

        let mut spec = is_int();
        for _ in 0..MAX_DEPTH {
            spec = TypeSpec::list([spec]);
        }
        assert_eq!(
            spec.validate(),
            Err(SpecError::DepthExceeded {
                depth: MAX_DEPTH + 1,
                max: MAX_DEPTH
            })
        );
    }

    #[test]
    fn test_depth_saturates() {
        let mut spec = is_int();
        for _ in 0..MAX_DEPTH * 2 {
            spec = TypeSpec::list([spec]);
        }
        assert_eq!(spec.depth(), MAX_DEPTH + 1);
    }

    #[test]
    fn test_self_constrained_variable_is_too_deep() {
        let x = MatchVariable::new();
        x.constrain(TypeSpec::list([&x]));
        assert_eq!(x.constraint().map(|spec| spec.depth()), Some(MAX_DEPTH + 1));
        assert_eq!(
            TypeSpec::from(&x).validate(),
            Err(SpecError::DepthExceeded {
                depth: MAX_DEPTH + 1,
                max: MAX_DEPTH
            })
        );

        let y = MatchVariable::new();
        y.constrain(any([TypeSpec::list([&y, &y]), is_int()]));
        assert!(TypeSpec::from(&y).validate().is_err());

        // a variable repeated side by side is not a cycle
        let z = MatchVariable::constrained(is_int());
        assert_eq!(TypeSpec::list([&z, &z]).depth(), 3);
    }

    #[test]
    fn test_determinism() {
        let spec = TypeSpec::list([is_string(), is_int()]);
        let data = Value::list([Value::from("a"), Value::from("b")]);
        assert_eq!(create(&spec, &data), create(&spec, &data));
    }
}
