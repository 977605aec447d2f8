//! `Either` — Shape-preserving success/failure results
//!
//! Every check produces an [`Either`]: `Right` for acceptance, `Left` for
//! rejection. A container check produces a container of per-child results,
//! so one result can hold failures and successes at different paths.
//!
//! [`lval`] and [`rval`] project a result back into plain values:
//!
//! | Leaf | `lval` | `rval` |
//! |------|--------|--------|
//! | `Left(v)` | `v` | `nullish(v)` |
//! | `Right(v)` | `nullish(v)` | `v` |
//!
//! where `nullish(v)` keeps the container shape of `v` with every leaf `Null`.
//! Bare booleans are accepted wherever an `Either` is: `false ≅ Left`,
//! `true ≅ Right` (see [`Outcome`]).

use crate::{Container, Value};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// Payload
// ═══════════════════════════════════════════════════════════════════════════════

/// What a `Left` or `Right` carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A checked value.
    Value(Value),
    /// Per-child results of a container check, same keys and kind as the input.
    Container(Container<Either>),
    /// A sub-result, wrapped by a connective.
    Nested(Box<Either>),
}

impl Payload {
    /// Reconstruct the checked value, ignoring every verdict.
    #[must_use]
    pub fn value(&self) -> Value {
        match self {
            Self::Value(v) => v.clone(),
            Self::Container(c) => Value::Container(c.map(|_, e| e.value())),
            Self::Nested(e) => e.value(),
        }
    }
}

impl From<Value> for Payload {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

impl From<Container<Either>> for Payload {
    fn from(c: Container<Either>) -> Self {
        Self::Container(c)
    }
}

impl From<Either> for Payload {
    fn from(e: Either) -> Self {
        Self::Nested(Box::new(e))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Either
// ═══════════════════════════════════════════════════════════════════════════════

/// Left (rejected) or Right (accepted).
///
/// # Example
///
/// ```
/// use patma::{Container, Either, Value};
///
/// let result = Either::Left(
///     Container::list([Either::right("a"), Either::left(3)]).into(),
/// );
/// assert!(result.is_left());
/// assert_eq!(result.lval(), Value::list([Value::Null, Value::from(3)]));
/// assert_eq!(result.rval(), Value::list([Value::from("a"), Value::Null]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Either {
    /// Rejection.
    Left(Payload),
    /// Acceptance.
    Right(Payload),
}

impl Either {
    /// A rejected value.
    pub fn left(value: impl Into<Value>) -> Self {
        Self::Left(Payload::Value(value.into()))
    }

    /// An accepted value.
    pub fn right(value: impl Into<Value>) -> Self {
        Self::Right(Payload::Value(value.into()))
    }

    /// `Right(value)` when `accepted`, else `Left(value)`.
    pub fn verdict(accepted: bool, value: impl Into<Value>) -> Self {
        if accepted {
            Self::right(value)
        } else {
            Self::left(value)
        }
    }

    /// Returns `true` for `Left`.
    #[inline]
    #[must_use]
    pub fn is_left(&self) -> bool {
        matches!(self, Self::Left(_))
    }

    /// Returns `true` for `Right`.
    #[inline]
    #[must_use]
    pub fn is_right(&self) -> bool {
        matches!(self, Self::Right(_))
    }

    /// The payload, regardless of side.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &Payload {
        match self {
            Self::Left(p) | Self::Right(p) => p,
        }
    }

    /// Consume into the payload.
    #[must_use]
    pub fn into_payload(self) -> Payload {
        match self {
            Self::Left(p) | Self::Right(p) => p,
        }
    }

    /// Reconstruct the checked value, ignoring every verdict.
    #[must_use]
    pub fn value(&self) -> Value {
        self.payload().value()
    }

    /// Project the failing parts; passing parts become `Null`.
    #[must_use]
    pub fn lval(&self) -> Value {
        match self {
            Self::Left(Payload::Value(v)) => v.clone(),
            Self::Right(Payload::Value(v)) => v.nullish(),
            Self::Left(Payload::Container(c)) | Self::Right(Payload::Container(c)) => {
                Value::Container(c.map(|_, e| e.lval()))
            }
            Self::Left(Payload::Nested(e)) => e.lval(),
            Self::Right(Payload::Nested(e)) => e.value().nullish(),
        }
    }

    /// Project the passing parts; failing parts become `Null`.
    #[must_use]
    pub fn rval(&self) -> Value {
        match self {
            Self::Right(Payload::Value(v)) => v.clone(),
            Self::Left(Payload::Value(v)) => v.nullish(),
            Self::Left(Payload::Container(c)) | Self::Right(Payload::Container(c)) => {
                Value::Container(c.map(|_, e| e.rval()))
            }
            Self::Right(Payload::Nested(e)) => e.rval(),
            Self::Left(Payload::Nested(e)) => e.value().nullish(),
        }
    }
}

impl fmt::Display for Either {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left(p) => write!(f, "Left({})", p.value()),
            Self::Right(p) => write!(f, "Right({})", p.value()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Outcome
// ═══════════════════════════════════════════════════════════════════════════════

/// What a predicate may answer: a bare boolean or a detailed [`Either`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// `false ≅ Left`, `true ≅ Right`.
    Bool(bool),
    /// A detailed result.
    Either(Either),
}

impl Outcome {
    /// Returns `true` for `true` or a `Right`.
    #[must_use]
    pub fn is_right(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Either(e) => e.is_right(),
        }
    }

    /// Returns `true` for `false` or a `Left`.
    #[must_use]
    pub fn is_left(&self) -> bool {
        !self.is_right()
    }

    /// Failing projection. `false` projects to itself, `true` to `Null`.
    #[must_use]
    pub fn lval(&self) -> Value {
        match self {
            Self::Bool(false) => Value::Bool(false),
            Self::Bool(true) => Value::Null,
            Self::Either(e) => e.lval(),
        }
    }

    /// Passing projection. `true` projects to itself, `false` to `Null`.
    #[must_use]
    pub fn rval(&self) -> Value {
        match self {
            Self::Bool(true) => Value::Bool(true),
            Self::Bool(false) => Value::Null,
            Self::Either(e) => e.rval(),
        }
    }

    /// Resolve against the checked value: a bare boolean wraps `value`.
    #[must_use]
    pub fn into_either(self, value: &Value) -> Either {
        match self {
            Self::Bool(accepted) => Either::verdict(accepted, value.clone()),
            Self::Either(e) => e,
        }
    }
}

impl From<bool> for Outcome {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Either> for Outcome {
    fn from(e: Either) -> Self {
        Self::Either(e)
    }
}

impl From<&Either> for Outcome {
    fn from(e: &Either) -> Self {
        Self::Either(e.clone())
    }
}

/// A predicate that answers nothing accepts.
impl From<()> for Outcome {
    fn from((): ()) -> Self {
        Self::Bool(true)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Free functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Wrap a value as rejected.
pub fn left(value: impl Into<Value>) -> Either {
    Either::left(value)
}

/// Wrap a value as accepted.
pub fn right(value: impl Into<Value>) -> Either {
    Either::right(value)
}

/// Returns `true` for `Left` or `false`.
pub fn is_left(result: impl Into<Outcome>) -> bool {
    result.into().is_left()
}

/// Returns `true` for `Right` or `true`.
pub fn is_right(result: impl Into<Outcome>) -> bool {
    result.into().is_right()
}

/// Failing projection of a result.
pub fn lval(result: impl Into<Outcome>) -> Value {
    result.into().lval()
}

/// Passing projection of a result.
pub fn rval(result: impl Into<Outcome>) -> Value {
    result.into().rval()
}

#[cfg(feature = "serde")]
mod ser {
    use super::{Either, Payload};
    use serde::ser::SerializeMap;

    impl serde::Serialize for Payload {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Value(v) => v.serialize(serializer),
                Self::Container(c) => c.serialize(serializer),
                Self::Nested(e) => e.serialize(serializer),
            }
        }
    }

    /// `{"left": ...}` or `{"right": ...}`.
    impl serde::Serialize for Either {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(1))?;
            match self {
                Self::Left(p) => map.serialize_entry("left", p)?,
                Self::Right(p) => map.serialize_entry("right", p)?,
            }
            map.end()
        }
    }
}
