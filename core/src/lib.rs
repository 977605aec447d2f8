//! patma - Structural pattern matching over dynamic values
//!
//! A matcher engine for heterogeneous, dynamically shaped data. Type
//! specifications are plain composable values; checking a value against one
//! yields a shape-preserving success/failure result.
//!
//! # Architecture
//!
//! - [`Value`] — Uniform view over scalars and keyed containers
//! - [`Either`] — Left (failure) / Right (success) result that mirrors the checked shape
//! - [`TypeSpec`] — Closed union of spec variants (container, custom, predicate, literal, variable)
//! - [`create`] / [`is`] — Recursive matcher and its boolean projection
//! - [`all`], [`any`], [`not`], [`every`], [`some`] — Connectives and quantifiers over the matcher
//! - [`Dispatcher`] — Ordered `(spec, handler)` table with first-match-wins semantics
//! - [`MatchVariable`] — Mutable logic cell usable as a spec leaf
//!
//! # Key Design Insights
//!
//! 1. **Rejection is data**: matching never fails with an error. A mismatch is a
//!    `Left` leaf inside the result, and siblings keep being checked.
//!
//! 2. **Shape preservation**: the payload of a container check has one
//!    `Left`/`Right` leaf per input leaf, so [`lval`] and [`rval`] can extract
//!    exactly the failing or exactly the passing fields.
//!
//! 3. **First match wins**: a dispatch table evaluates its cases in declaration
//!    order and never looks at later cases once one has accepted.
//!
//! # Example
//!
//! ```
//! use patma::prelude::*;
//!
//! let spec = TypeSpec::list([is_bool(), is_string(), is_int()]);
//! let result = create(&spec, &Value::list([Value::from(true), "a".into(), "1".into()]));
//!
//! assert!(result.is_left());
//! assert_eq!(result.lval(), Value::list([Value::Null, Value::Null, "1".into()]));
//! assert_eq!(result.rval(), Value::list([Value::from(true), "a".into(), Value::Null]));
//! ```
//!
//! # Thread Safety
//!
//! Specs, handlers and variables are built on `Rc` and are deliberately `!Send`.
//! A [`MatchVariable`] is a single-writer cell: read it right after the match
//! that wrote it, and never share it between in-flight matches.

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod case;
mod connective;
mod dispatch;
mod either;
mod key;
mod matchable;
mod predicates;
mod registry;
mod spec;
mod trace;
mod value;
mod variable;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use case::{fanout, Case, Handler};
pub use dispatch::{dispatch, recurse, rmatch, Dispatcher, DispatcherBuilder};
pub use either::{is_left, is_right, left, lval, right, rval, Either, Outcome, Payload};
pub use key::{k, KeyMatch};
pub use matchable::Matchable;
pub use registry::{Class, InstanceOf, RegistryGuard, TypeRegistry, TypeRegistryBuilder};
pub use spec::{create, create_at, is, is_at, pred, Predicate, TypeSpec};
pub use value::{Container, Key, Kind, Path, Value};
pub use variable::MatchVariable;

// Connectives and quantifiers
pub use connective::{all, any, every, maybe, not, some, strict};

// Builtin predicates
pub use predicates::{
    eq, gt, gte, is_array, is_bool, is_container, is_float, is_int, is_list, is_null,
    is_numeric, is_object, is_scalar, is_string, lt, lte, one_of,
};

// Trace types
pub use trace::{DispatchStep, DispatchTrace};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use patma::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Connectives
        all,
        any,
        // Matcher
        create,
        create_at,
        // Dispatch
        dispatch,
        // Builtin predicates
        eq,
        every,
        fanout,
        gt,
        gte,
        is,
        is_array,
        is_at,
        is_bool,
        is_container,
        is_float,
        is_int,
        // Either algebra
        is_left,
        is_list,
        is_null,
        is_numeric,
        is_object,
        is_right,
        is_scalar,
        is_string,
        k,
        left,
        lt,
        lte,
        lval,
        maybe,
        not,
        one_of,
        pred,
        recurse,
        right,
        rmatch,
        rval,
        some,
        strict,
        // Core types
        Case,
        Container,
        DispatchStep,
        DispatchTrace,
        Dispatcher,
        Either,
        Handler,
        Key,
        KeyMatch,
        Kind,
        MatchVariable,
        Matchable,
        Outcome,
        Path,
        Payload,
        Predicate,
        SpecError,
        TypeRegistry,
        TypeSpec,
        Value,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum allowed nesting depth for specs and dispatch tables.
///
/// Matching is plain recursion with no cycle guard. Validate specs built from
/// untrusted input via [`TypeSpec::validate`] or [`Dispatcher::validate`].
pub const MAX_DEPTH: usize = 32;

/// Maximum number of cases in a single [`Dispatcher`].
pub const MAX_CASES: usize = 256;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from spec construction and validation.
///
/// Matching itself never fails: a value that does not fit a spec produces a
/// `Left` result. These errors are raised while building specs, tables and
/// type registries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    /// Spec or table nesting exceeds [`MAX_DEPTH`].
    #[error(
        "spec nesting depth is {depth}, but maximum allowed is {max} \
         — reduce nesting or split the spec"
    )]
    DepthExceeded {
        /// Actual depth of the spec tree.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },

    /// Too many cases in a single dispatch table.
    #[error("dispatch table has {count} cases, but maximum allowed is {max}")]
    TooManyCases {
        /// Actual count of cases.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// A type name was not found in the type registry.
    #[error("unknown type \"{name}\"{}", registered(.available))]
    UnknownType {
        /// The unregistered type name.
        name: String,
        /// Type names that ARE registered (for self-correcting error messages).
        available: Vec<String>,
    },

    /// A type name was declared twice.
    #[error("type \"{name}\" is already registered")]
    DuplicateType {
        /// The duplicated type name.
        name: String,
    },
}

fn registered(available: &[String]) -> String {
    if available.is_empty() {
        " — no types are registered".to_owned()
    } else {
        format!(" — registered: {}", available.join(", "))
    }
}
