//! Dispatcher — Ordered case table with first-match-wins semantics
//!
//! A [`Dispatcher`] holds an ordered list of [`Case`]s. Calling it checks
//! each case's spec against the value in declaration order and resolves the
//! handler of the first one that accepts. Later cases are never checked.
//!
//! [`rmatch`] appends [`recurse()`]: a container that no explicit case
//! accepts is rebuilt by dispatching each child through the same table, with
//! the child's key appended to the path.

use std::fmt;
use std::rc::Rc;

use crate::{
    create_at, is_container, Case, DispatchStep, DispatchTrace, Handler, Path, SpecError,
    TypeSpec, Value, MAX_CASES, MAX_DEPTH,
};

/// Ordered case table with first-match-wins semantics.
///
/// Cheap to clone: cases are shared.
///
/// # Example
///
/// ```
/// use patma::{Dispatcher, Handler, Value};
///
/// let table = Dispatcher::builder()
///     .case("a", "b")
///     .call(2, |x: &Value, _, _| format!(":{x}"))
///     .case("d", Handler::identity())
///     .build();
///
/// assert_eq!(table.call(&"a".into()), Some(Value::from("b")));
/// assert_eq!(table.call(&2.into()), Some(Value::from(":2")));
/// assert_eq!(table.call(&"d".into()), Some(Value::from("d")));
/// assert_eq!(table.call(&"z".into()), None);
/// ```
#[derive(Clone)]
pub struct Dispatcher {
    cases: Rc<[Case]>,
}

impl Dispatcher {
    /// Create a table from its cases.
    pub fn new(cases: impl IntoIterator<Item = Case>) -> Self {
        Self {
            cases: cases.into_iter().collect(),
        }
    }

    /// Start building a table.
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Dispatch a root value.
    #[must_use]
    pub fn call(&self, value: &Value) -> Option<Value> {
        self.call_at(value, &Path::root())
    }

    /// Dispatch a value found at `path`.
    ///
    /// Returns the first accepting case's result, or `None` when no case
    /// accepts.
    #[must_use]
    pub fn call_at(&self, value: &Value, path: &Path) -> Option<Value> {
        for (index, case) in self.cases.iter().enumerate() {
            if case.matches(value, path) {
                tracing::trace!(target: "patma", index, %path, "case selected");
                return Some(case.handler.invoke(value, path, self));
            }
        }
        tracing::trace!(target: "patma", %path, cases = self.cases.len(), "no case matched");
        None
    }

    /// Dispatch a root value, recording each case's verdict.
    ///
    /// Every checked spec is evaluated exactly once, so the trace is safe for
    /// tables containing logic variables.
    #[must_use]
    pub fn call_with_trace(&self, value: &Value) -> DispatchTrace {
        let path = Path::root();
        let mut steps = Vec::new();
        for (index, case) in self.cases.iter().enumerate() {
            let verdict = create_at(&case.spec, value, &path, false);
            let matched = verdict.is_right();
            steps.push(DispatchStep {
                index,
                matched,
                verdict,
            });
            if matched {
                return DispatchTrace {
                    result: Some(case.handler.invoke(value, &path, self)),
                    steps,
                    matched_case: Some(index),
                };
            }
        }
        DispatchTrace {
            result: None,
            steps,
            matched_case: None,
        }
    }

    /// The cases, in order.
    #[must_use]
    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    /// Returns the number of cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns `true` if there are no cases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Table depth: one level over its deepest case, counting handler
    /// templates and nested tables.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.cases.iter().map(Case::depth).max().unwrap_or(0)
    }

    /// Validate against [`MAX_CASES`] and [`MAX_DEPTH`].
    ///
    /// # Errors
    ///
    /// - [`SpecError::TooManyCases`] if the table is too long
    /// - [`SpecError::DepthExceeded`] if a case spec or handler is nested too deeply
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.cases.len() > MAX_CASES {
            tracing::warn!(target: "patma", cases = self.cases.len(), max = MAX_CASES, "table rejected");
            return Err(SpecError::TooManyCases {
                count: self.cases.len(),
                max: MAX_CASES,
            });
        }
        let depth = self.depth();
        if depth > MAX_DEPTH {
            tracing::warn!(target: "patma", depth, max = MAX_DEPTH, "table rejected");
            return Err(SpecError::DepthExceeded {
                depth,
                max: MAX_DEPTH,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("cases_len", &self.cases.len())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Builder
// ═══════════════════════════════════════════════════════════════════════════════

/// Builder for a [`Dispatcher`]. Case order is declaration order.
#[derive(Debug, Default)]
pub struct DispatcherBuilder {
    cases: Vec<Case>,
}

impl DispatcherBuilder {
    /// Add a case.
    #[must_use]
    pub fn case(mut self, spec: impl Into<TypeSpec>, handler: impl Into<Handler>) -> Self {
        self.cases.push(Case::new(spec, handler));
        self
    }

    /// Add a case with a closure handler.
    #[must_use]
    pub fn call<R, F>(self, spec: impl Into<TypeSpec>, f: F) -> Self
    where
        R: Into<Value>,
        F: Fn(&Value, &Path, &Dispatcher) -> R + 'static,
    {
        self.case(spec, Handler::call(f))
    }

    /// Append the structural recursion case (see [`recurse`]).
    #[must_use]
    pub fn recurse(mut self) -> Self {
        self.cases.push(recurse());
        self
    }

    /// Freeze the table.
    #[must_use]
    pub fn build(self) -> Dispatcher {
        Dispatcher::new(self.cases)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Free functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Build a table from cases.
pub fn dispatch(cases: impl IntoIterator<Item = Case>) -> Dispatcher {
    Dispatcher::new(cases)
}

/// The structural recursion case.
///
/// Accepts any container and rebuilds it with each child dispatched through
/// the calling table at `path/key`. Children no case accepts become `Null`.
#[must_use]
pub fn recurse() -> Case {
    Case::new(
        is_container(),
        Handler::call(|value: &Value, path: &Path, dispatcher: &Dispatcher| match value {
            Value::Container(children) => {
                tracing::trace!(target: "patma", %path, children = children.len(), "descending");
                Value::Container(children.map(|key, child| {
                    dispatcher
                        .call_at(child, &path.child(key.clone()))
                        .unwrap_or_default()
                }))
            }
            other => other.clone(),
        }),
    )
}

/// Build a table from cases, followed by [`recurse()`].
///
/// # Example
///
/// ```
/// use patma::{k, rmatch, Case, Value};
///
/// // nested paths are key lists: compare the last segment
/// let secret = k(Value::list(["secret"])).slice(-1, None);
/// let table = rmatch([Case::new(secret, "***")]);
/// let input = Value::map([
///     ("user", Value::map([("name", "ann"), ("secret", "hunter2")])),
/// ]);
///
/// assert_eq!(
///     table.call(&input),
///     Some(Value::map([
///         ("user", Value::map([("name", Value::Null), ("secret", "***".into())])),
///     ]))
/// );
/// ```
pub fn rmatch(cases: impl IntoIterator<Item = Case>) -> Dispatcher {
    Dispatcher::new(cases.into_iter().chain(std::iter::once(recurse())))
}
