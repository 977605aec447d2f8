//! `MatchVariable` — Logic variables as spec leaves
//!
//! A [`MatchVariable`] is a shared mutable cell. Used as a spec leaf it
//! accepts any value its optional constraint accepts and remembers it; a
//! rejected value resets the cell to unbound. There is no rollback: a binding
//! made inside a branch that later fails stays in place.
//!
//! Each occurrence of a variable in a spec is an independent leaf. The
//! engine does not require repeated occurrences to see equal values.
//!
//! # Example
//!
//! ```
//! use patma::{is, MatchVariable, TypeSpec, Value};
//!
//! let x = MatchVariable::new();
//! let spec = TypeSpec::list(["A".into(), TypeSpec::from(&x), "Z".into()]);
//!
//! assert!(is(&spec, &Value::list(["A", "C", "Z"])));
//! assert_eq!(x.value(), Value::from("C"));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{is_at, Either, Path, TypeSpec, Value};

#[derive(Default)]
struct Slot {
    constraint: Option<TypeSpec>,
    bound: Option<Value>,
}

/// A logic variable.
///
/// Clones share the same cell; equality is identity. Read a binding right
/// after the match that wrote it, and never share one variable between
/// matches that are in flight at the same time.
#[derive(Clone, Default)]
pub struct MatchVariable(Rc<RefCell<Slot>>);

impl MatchVariable {
    /// An unconstrained, unbound variable.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An unbound variable that only binds values `spec` accepts.
    pub fn constrained(spec: impl Into<TypeSpec>) -> Self {
        let var = Self::new();
        var.0.borrow_mut().constraint = Some(spec.into());
        var
    }

    /// Replace the constraint of this cell, returning a handle to it.
    ///
    /// A constraint may mention the variable itself. The cell then owns a
    /// reference to itself and is never freed; [`TypeSpec::validate`] rejects
    /// such a spec as too deep.
    pub fn constrain(&self, spec: impl Into<TypeSpec>) -> Self {
        self.0.borrow_mut().constraint = Some(spec.into());
        self.clone()
    }

    /// `n` independent unbound variables.
    #[must_use]
    pub fn batch(n: usize) -> Vec<Self> {
        (0..n).map(|_| Self::new()).collect()
    }

    /// The constraint, if any.
    #[must_use]
    pub fn constraint(&self) -> Option<TypeSpec> {
        self.0.borrow().constraint.clone()
    }

    /// The bound value, if any.
    #[must_use]
    pub fn get(&self) -> Option<Value> {
        self.0.borrow().bound.clone()
    }

    /// The bound value, or `Null` when unbound.
    #[must_use]
    pub fn value(&self) -> Value {
        self.get().unwrap_or_default()
    }

    /// Returns `true` if a value is bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.0.borrow().bound.is_some()
    }

    /// Forget the bound value.
    pub fn unbind(&self) {
        self.0.borrow_mut().bound = None;
    }

    /// Returns `true` if both handles share one cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Bind `value` if the constraint accepts it, else reset to unbound.
    ///
    /// Returns `Right(value)` on binding and `Left(value)` on reset.
    pub fn unify(&self, value: &Value, path: &Path) -> Either {
        // the constraint may mention this variable, so no borrow is held while it runs
        let constraint = self.constraint();
        let accepted = constraint
            .as_ref()
            .map_or(true, |spec| is_at(spec, value, path, false));

        let mut slot = self.0.borrow_mut();
        if accepted {
            tracing::debug!(target: "patma", %path, %value, "variable bound");
            slot.bound = Some(value.clone());
            Either::right(value.clone())
        } else {
            tracing::debug!(target: "patma", %path, %value, "variable reset");
            slot.bound = None;
            Either::left(value.clone())
        }
    }
}

impl PartialEq for MatchVariable {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for MatchVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(slot) => f
                .debug_struct("MatchVariable")
                .field("bound", &slot.bound)
                .field("constrained", &slot.constraint.is_some())
                .finish(),
            Err(_) => f.write_str("MatchVariable(<in use>)"),
        }
    }
}
