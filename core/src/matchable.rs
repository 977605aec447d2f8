//! `Matchable` — Custom-type acceptance capability
//!
//! Any type that can say yes or no to a [`Value`] can be used as a spec leaf
//! through [`TypeSpec::custom`](crate::TypeSpec::custom). Custom types are tried
//! before predicates and literals.
//!
//! The one built-in implementation is [`InstanceOf`](crate::InstanceOf),
//! handed out by [`TypeRegistry::class_spec`](crate::TypeRegistry::class_spec).

use crate::Value;
use std::fmt::Debug;

/// Accepts or rejects a [`Value`].
///
/// Unlike predicates, a `Matchable` never sees the value's path and always
/// answers with a plain boolean. A rejection becomes `Left(value)`.
///
/// # Example
///
/// ```
/// use patma::{is, Matchable, TypeSpec, Value};
///
/// #[derive(Debug)]
/// struct Even;
///
/// impl Matchable for Even {
///     fn accepts(&self, value: &Value) -> bool {
///         value.as_int().is_some_and(|i| i % 2 == 0)
///     }
/// }
///
/// let spec = TypeSpec::custom(Even);
/// assert!(is(&spec, &Value::from(4)));
/// assert!(!is(&spec, &Value::from(3)));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Matchable`",
    label = "this type cannot be used as a custom spec",
    note = "implement `accepts(&self, &Value) -> bool`, or use a predicate closure via `pred(...)`"
)]
pub trait Matchable: Debug {
    /// Returns `true` if the value is accepted.
    fn accepts(&self, value: &Value) -> bool;
}

#[diagnostic::do_not_recommend]
impl Matchable for Box<dyn Matchable> {
    fn accepts(&self, value: &Value) -> bool {
        (**self).accepts(value)
    }
}
