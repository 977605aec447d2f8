//! Dispatch trace types for debugging case selection.
//!
//! [`Dispatcher::call_with_trace`](crate::Dispatcher::call_with_trace) returns a
//! [`DispatchTrace`]: the same result as `call()` plus the verdict of every
//! case that was checked.
//!
//! # Example
//!
//! ```
//! use patma::{dispatch, is_int, is_string, Case, Value};
//!
//! let table = dispatch([Case::new(is_int(), "int"), Case::new(is_string(), "string")]);
//! let trace = table.call_with_trace(&Value::from("x"));
//!
//! assert_eq!(trace.result, Some(Value::from("string")));
//! assert_eq!(trace.matched_case, Some(1));
//! assert!(!trace.steps[0].matched);
//! ```

use std::fmt;

use crate::{Either, Value};

/// Trace of a full [`Dispatcher`](crate::Dispatcher) call.
///
/// `result` always equals what [`Dispatcher::call`](crate::Dispatcher::call)
/// returns for the same input.
#[derive(Clone, PartialEq)]
pub struct DispatchTrace {
    /// The final result (identical to what `call()` returns).
    pub result: Option<Value>,
    /// Each case that was checked, in order. Stops after the first match.
    pub steps: Vec<DispatchStep>,
    /// Index of the case whose handler ran.
    pub matched_case: Option<usize>,
}

impl DispatchTrace {
    /// Returns `true` if some case matched.
    #[must_use]
    pub fn matched(&self) -> bool {
        self.matched_case.is_some()
    }
}

impl fmt::Debug for DispatchTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTrace")
            .field("result", &self.result)
            .field("steps", &self.steps)
            .field("matched_case", &self.matched_case)
            .finish()
    }
}

/// One case's check in a trace.
#[derive(Clone, PartialEq)]
pub struct DispatchStep {
    /// Index in the table (0-based).
    pub index: usize,
    /// Did the spec accept?
    pub matched: bool,
    /// Full result of the spec check.
    pub verdict: Either,
}

impl fmt::Debug for DispatchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchStep")
            .field("index", &self.index)
            .field("matched", &self.matched)
            .field("verdict", &format_args!("{}", self.verdict))
            .finish()
    }
}
