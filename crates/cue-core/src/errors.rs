//! The ADT-level error value: `Bottom` (spec.md §7).
//!
//! `Bottom` is a first-class `Value` — evaluation never throws across the
//! evaluator call boundary. Errors are stored as a vertex's `BaseValue` or
//! surfaced as a list of `ErrorRecord`s via [`collect`].

use std::fmt;

use rowan::TextRange;

use crate::feature::Feature;

/// The taxonomy of spec.md §7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Produced by the `error` builtin or an explicit user constraint.
    UserError,
    /// Type mismatch, closed-field violation, out-of-range, list overflow.
    EvalError,
    /// A structural cycle that never resolves to a concrete value.
    CycleError,
    /// Non-terminal: discharged if a later conjunct makes the value concrete.
    IncompleteError,
    /// Compile-time: an identifier resolves to nothing.
    UnresolvedReference,
    /// Compile-time: a construct requires a newer language version/experiment.
    VersionError,
    /// The disjunction search budget was exhausted.
    TooManyDisjuncts,
    /// An evaluator invariant was violated; must never be swallowed.
    InternalError,
}

impl ErrorCode {
    /// `IncompleteError` is the only non-terminal, non-sticky code (spec.md
    /// §3 invariants: "A Bottom with Code = IncompleteError may be
    /// overwritten by a later, concrete value; any other Bottom is sticky").
    pub fn is_sticky(self) -> bool {
        !matches!(self, ErrorCode::IncompleteError)
    }

    pub fn is_compile_time(self) -> bool {
        matches!(
            self,
            ErrorCode::UnresolvedReference | ErrorCode::VersionError
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::UserError => "user error",
            ErrorCode::EvalError => "eval error",
            ErrorCode::CycleError => "cycle error",
            ErrorCode::IncompleteError => "incomplete",
            ErrorCode::UnresolvedReference => "unresolved reference",
            ErrorCode::VersionError => "version error",
            ErrorCode::TooManyDisjuncts => "too many disjuncts",
            ErrorCode::InternalError => "internal error",
        };
        write!(f, "{s}")
    }
}

/// The `Bottom` value of spec.md §3/§7: `{Code, Err, Path}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bottom {
    pub code: ErrorCode,
    pub message: String,
    pub path: Vec<Feature>,
    pub position: Option<TextRange>,
}

impl Bottom {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Vec::new(),
            position: None,
        }
    }

    pub fn eval(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EvalError, message)
    }

    pub fn incomplete(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IncompleteError, message)
    }

    pub fn cycle(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CycleError, message)
    }

    pub fn user(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UserError, message)
    }

    pub fn with_path(mut self, path: Vec<Feature>) -> Self {
        self.path = path;
        self
    }

    pub fn with_position(mut self, position: TextRange) -> Self {
        self.position = Some(position);
        self
    }

    /// Sticky Bottoms may not be overwritten by a later conjunct; an
    /// `IncompleteError` may (spec.md §3 invariants).
    pub fn is_sticky(&self) -> bool {
        self.code.is_sticky()
    }
}

impl fmt::Display for Bottom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A rendered error record for the external error surface (spec.md §6):
/// `{position, kind, message, path[]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub position: Option<TextRange>,
    pub kind: ErrorCode,
    pub message: String,
    pub path: Vec<String>,
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(pos) = self.position {
            write!(f, " at {}..{}", u32::from(pos.start()), u32::from(pos.end()))?;
        }
        if !self.path.is_empty() {
            write!(f, " ({})", self.path.join("."))?;
        }
        write!(f, ": {}", self.message)
    }
}

/// A list of [`ErrorRecord`]s, surfaced to callers (spec.md §6).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors(pub Vec<ErrorRecord>);

impl Errors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, record: ErrorRecord) {
        self.0.push(record);
    }

    /// Render every record one per line, in the shape of `plotnik-lib`'s
    /// `DiagnosticMessage::fmt`: kind, position, path, message. Used by
    /// `cue_core::diagnostics::DiagnosticsPrinter` and by `cue_lib::Error`'s
    /// `Display` impl.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod errors_tests {
    use super::*;

    #[test]
    fn incomplete_is_not_sticky() {
        let b = Bottom::incomplete("missing value");
        assert!(!b.is_sticky());
    }

    #[test]
    fn eval_error_is_sticky() {
        let b = Bottom::eval("conflicting values: 4 != 5");
        assert!(b.is_sticky());
    }

    #[test]
    fn errors_display_joins_with_path() {
        let mut errs = Errors::default();
        errs.push(ErrorRecord {
            position: None,
            kind: ErrorCode::EvalError,
            message: "field not allowed".into(),
            path: vec!["v".into(), "b".into()],
        });
        assert_eq!(errs.to_string(), "eval error (v.b): field not allowed");
    }
}
