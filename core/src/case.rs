//! `Case` — Spec + `Handler` combination
//!
//! A [`Case`] binds a spec to what a [`Dispatcher`] produces when the spec
//! accepts. Handlers come in three shapes:
//!
//! - [`Handler::Value`]: returned verbatim
//! - [`Handler::Template`]: a container of handlers, each resolved against
//!   the same `(value, path)`
//! - [`Handler::Call`]: a closure over `(value, path, dispatcher)`; the
//!   dispatcher is the table being evaluated, for handler-side recursion
//! - [`Handler::Table`]: a nested table called on the matched value
//!
//! Templates and nested tables count toward the depth of the case.

use std::fmt;
use std::rc::Rc;

use crate::{is_at, Container, Dispatcher, Key, MatchVariable, Path, TypeSpec, Value};

type HandlerFn = Rc<dyn Fn(&Value, &Path, &Dispatcher) -> Value>;

/// What a matched case produces.
#[derive(Clone)]
pub enum Handler {
    /// A fixed result.
    Value(Value),
    /// A container of handlers, resolved leaf by leaf.
    Template(Container<Handler>),
    /// A closure.
    Call(HandlerFn),
    /// A nested table; no match there yields `Null`.
    Table(Dispatcher),
}

impl Handler {
    /// Wrap a closure.
    pub fn call<R, F>(f: F) -> Self
    where
        R: Into<Value>,
        F: Fn(&Value, &Path, &Dispatcher) -> R + 'static,
    {
        let f: HandlerFn = Rc::new(move |value: &Value, path: &Path, dispatcher: &Dispatcher| {
            f(value, path, dispatcher).into()
        });
        Self::Call(f)
    }

    /// Return the matched value unchanged.
    #[must_use]
    pub fn identity() -> Self {
        Self::call(|value: &Value, _: &Path, _: &Dispatcher| value.clone())
    }

    /// A keyed template from `(key, handler)` pairs.
    pub fn template<K: Into<Key>, H: Into<Handler>>(
        entries: impl IntoIterator<Item = (K, H)>,
    ) -> Self {
        Self::Template(
            entries
                .into_iter()
                .map(|(key, handler)| (key.into(), handler.into()))
                .collect(),
        )
    }

    /// Resolve against a matched value.
    #[must_use]
    pub fn invoke(&self, value: &Value, path: &Path, dispatcher: &Dispatcher) -> Value {
        match self {
            Self::Value(v) => v.clone(),
            Self::Template(handlers) => {
                Value::Container(handlers.map(|_, h| h.invoke(value, path, dispatcher)))
            }
            Self::Call(f) => f(value, path, dispatcher),
            Self::Table(nested) => nested.call_at(value, path).unwrap_or_default(),
        }
    }

    /// Nesting depth: templates add a level over their deepest entry,
    /// nested tables report their own depth, values and closures are flat.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Value(_) | Self::Call(_) => 0,
            Self::Template(handlers) => {
                1 + handlers.values().map(Self::depth).max().unwrap_or(0)
            }
            Self::Table(nested) => nested.depth(),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Self::Call(_) => f.write_str("Call(..)"),
            Self::Table(nested) => f.debug_tuple("Table").field(nested).finish(),
        }
    }
}

/// Evaluate several handlers against the same match and collect a list.
///
/// # Example
///
/// ```
/// use patma::{dispatch, fanout, Case, MatchVariable, TypeSpec, Value};
///
/// let [x, y] = [MatchVariable::new(), MatchVariable::new()];
/// let table = dispatch([Case::new(
///     TypeSpec::list([x.clone(), y.clone()]),
///     fanout([y, x]),
/// )]);
///
/// assert_eq!(
///     table.call(&Value::list([1, 2])),
///     Some(Value::list([2, 1]))
/// );
/// ```
pub fn fanout<H: Into<Handler>>(handlers: impl IntoIterator<Item = H>) -> Handler {
    Handler::Template(Container::list(handlers.into_iter().map(Into::into)))
}

impl From<Value> for Handler {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

impl From<&str> for Handler {
    fn from(s: &str) -> Self {
        Self::Value(Value::from(s))
    }
}

impl From<String> for Handler {
    fn from(s: String) -> Self {
        Self::Value(Value::String(s))
    }
}

impl From<i64> for Handler {
    fn from(i: i64) -> Self {
        Self::Value(Value::Int(i))
    }
}

impl From<i32> for Handler {
    fn from(i: i32) -> Self {
        Self::Value(Value::from(i))
    }
}

impl From<bool> for Handler {
    fn from(b: bool) -> Self {
        Self::Value(Value::Bool(b))
    }
}

/// Reads the variable at invocation time.
impl From<MatchVariable> for Handler {
    fn from(var: MatchVariable) -> Self {
        Self::call(move |_: &Value, _: &Path, _: &Dispatcher| var.value())
    }
}

impl From<&MatchVariable> for Handler {
    fn from(var: &MatchVariable) -> Self {
        Self::from(var.clone())
    }
}

impl From<Dispatcher> for Handler {
    fn from(nested: Dispatcher) -> Self {
        Self::Table(nested)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Case
// ═══════════════════════════════════════════════════════════════════════════════

/// A dispatch case: spec + handler.
#[derive(Debug, Clone)]
pub struct Case {
    /// The spec to check.
    pub spec: TypeSpec,

    /// What to produce when the spec accepts.
    pub handler: Handler,
}

impl Case {
    /// Create a new case.
    pub fn new(spec: impl Into<TypeSpec>, handler: impl Into<Handler>) -> Self {
        Self {
            spec: spec.into(),
            handler: handler.into(),
        }
    }

    /// Returns `true` if the spec accepts the value at `path`.
    #[must_use]
    pub fn matches(&self, value: &Value, path: &Path) -> bool {
        is_at(&self.spec, value, path, false)
    }

    /// Nesting depth of the spec or the handler, whichever is deeper.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.spec.depth().max(self.handler.depth())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is_string;

    #[test]
    fn test_case_matches() {
        let case = Case::new(is_string(), "matched");
        assert!(case.matches(&Value::from("hello"), &Path::root()));
        assert!(!case.matches(&Value::from(1), &Path::root()));
    }

    #[test]
    fn test_template_resolves_each_leaf() {
        let table = Dispatcher::new(Vec::new());
        let handler = Handler::template([
            ("kind", Handler::from("user")),
            ("raw", Handler::identity()),
            (
                "at",
                Handler::call(|_: &Value, path: &Path, _: &Dispatcher| path.to_string()),
            ),
        ]);
        let result = handler.invoke(&Value::from(7), &Path::new(["id"]), &table);
        assert_eq!(
            result,
            Value::map([
                ("kind", Value::from("user")),
                ("raw", Value::from(7)),
                ("at", Value::from("id")),
            ])
        );
    }

    #[test]
    fn test_variable_handler_reads_late() {
        let var = MatchVariable::new();
        let handler = Handler::from(&var);
        let table = Dispatcher::new(Vec::new());
        assert_eq!(handler.invoke(&Value::Null, &Path::root(), &table), Value::Null);
        var.unify(&Value::from("bound"), &Path::root());
        assert_eq!(
            handler.invoke(&Value::Null, &Path::root(), &table),
            Value::from("bound")
        );
    }

    #[test]
    fn test_debug_hides_closures() {
        assert_eq!(format!("{:?}", Handler::identity()), "Call(..)");
    }

    #[test]
    fn test_handler_depth() {
        assert_eq!(Handler::from(1).depth(), 0);
        assert_eq!(Handler::identity().depth(), 0);
        let template = Handler::template([("a", Handler::template([("b", 1)]))]);
        assert_eq!(template.depth(), 2);

        let nested = Dispatcher::new([Case::new(TypeSpec::list([is_string()]), 1)]);
        assert_eq!(Handler::from(nested.clone()).depth(), 3);
        assert_eq!(Case::new(is_string(), nested).depth(), 3);
        assert_eq!(Case::new(TypeSpec::list([is_string()]), template).depth(), 2);
    }

    #[test]
    fn test_table_handler_delegates() {
        let nested = Dispatcher::new([Case::new(is_string(), "inner")]);
        let handler = Handler::from(nested);
        let table = Dispatcher::new(Vec::new());
        assert_eq!(handler.invoke(&"s".into(), &Path::root(), &table), Value::from("inner"));
        assert_eq!(handler.invoke(&1.into(), &Path::root(), &table), Value::Null);
    }
}
