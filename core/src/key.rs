//! `k` — Specs over a value's key path
//!
//! Dispatch tables usually test *what* a value is. [`k`] builds a spec that
//! tests *where* it is: the spec is checked against the value's path (see
//! [`Path::to_value`]) instead of the value itself.
//!
//! - a literal matches a top-level key exactly
//! - a predicate tests the key (or key list, for nested values)
//! - a list spec with a negative start compares trailing path segments
//!
//! # Slicing
//!
//! [`KeyMatch::slice`] narrows the key before the check. Strings are sliced by
//! characters and key lists by segments. A negative `start` counts from the
//! end; a negative `length` stops that many before the end. Other keys slice
//! to `Null`. `slice(0, None)` and `slice(0, Some(0))` leave the key as is.
//!
//! ```
//! use patma::{is_at, k, Path, TypeSpec, Value};
//!
//! let initial_a: TypeSpec = k("a").slice(0, Some(1)).into();
//! assert!(is_at(&initial_a, &Value::Null, &Path::new(["apple"]), false));
//!
//! let ends_in_b_c: TypeSpec = k(Value::list(["b", "c"])).slice(-2, None).into();
//! assert!(is_at(&ends_in_b_c, &Value::Null, &Path::new(["b", "e", "b", "c"]), false));
//! ```

use crate::spec::Predicate;
use crate::{is_at, Path, TypeSpec, Value};

/// A spec over the key path, built by [`k`].
#[derive(Debug, Clone)]
pub struct KeyMatch {
    spec: TypeSpec,
    start: i64,
    length: Option<i64>,
}

/// Match against the key path instead of the value.
pub fn k(spec: impl Into<TypeSpec>) -> KeyMatch {
    KeyMatch {
        spec: spec.into(),
        start: 0,
        length: None,
    }
}

impl KeyMatch {
    /// Compare only `length` characters or segments from `start`.
    #[must_use]
    pub fn slice(mut self, start: i64, length: Option<i64>) -> Self {
        self.start = start;
        self.length = length;
        self
    }

    /// The key spec.
    #[must_use]
    pub fn spec(&self) -> &TypeSpec {
        &self.spec
    }

    /// The key as seen by the spec.
    #[must_use]
    pub fn key_of(&self, path: &Path) -> Value {
        let key = path.to_value();
        // a zero slice is no slice
        if self.start == 0 && self.length.unwrap_or(0) == 0 {
            return key;
        }
        match key {
            Value::String(s) => {
                let chars: Vec<char> = s.chars().collect();
                let (begin, end) = bounds(chars.len(), self.start, self.length);
                Value::String(chars[begin..end].iter().collect())
            }
            Value::Container(segments) => {
                let segments: Vec<&Value> = segments.values().collect();
                let (begin, end) = bounds(segments.len(), self.start, self.length);
                Value::list(segments[begin..end].iter().map(|v| (*v).clone()))
            }
            _ => Value::Null,
        }
    }

    /// Check a path.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        is_at(&self.spec, &self.key_of(path), path, false)
    }
}

impl From<KeyMatch> for TypeSpec {
    fn from(key: KeyMatch) -> Self {
        let child = key.spec.clone();
        TypeSpec::Predicate(Predicate::composite(
            "k",
            vec![child],
            move |_: &Value, path: &Path| key.matches(path),
        ))
    }
}

/// Resolve `start`/`length` against `len` into a clamped `begin..end` range.
#[allow(
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn bounds(len: usize, start: i64, length: Option<i64>) -> (usize, usize) {
    let len = len as i64;
    let begin = if start < 0 {
        (len + start).max(0)
    } else {
        start.min(len)
    };
    let end = match length {
        None => len,
        Some(n) if n < 0 => len + n,
        Some(n) => begin.saturating_add(n).min(len),
    };
    (begin as usize, end.max(begin) as usize)
}
