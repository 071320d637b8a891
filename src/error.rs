//! Inference errors.
//!
//! Grounded on the teacher's `diagnostics/mod.rs`: a hand-rolled `Error`
//! enum with a manual `Display` impl instead of `thiserror` (the teacher's
//! own Cargo.toml notes this crate was dropped in favor of exactly this
//! pattern), plus an optional `ariadne`-backed pretty report for callers
//! that have the original source text to hand.

use crate::span::Span;
use crate::types::Monotype;
use std::fmt;

/// The result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Everything that can go wrong while generating or solving constraints.
#[derive(Debug, Clone)]
pub enum Error {
    /// A variable would have to bind to a type that contains itself.
    OccursCheck { var: String, ty: Monotype, span: Span },
    /// A value-kinded variable met a row, or vice versa.
    KindMismatch { expected: &'static str, found: &'static str, span: Span },
    /// Two nullary constants disagree, or two applications disagree on
    /// their constructor name.
    ConstantMismatch { expected: Monotype, found: Monotype, span: Span },
    /// Two applications of the same constructor disagree on argument count
    /// (most commonly: a function call's argument count).
    ArityMismatch { expected: usize, found: usize, span: Span },
    /// A closed row is missing a label required of it.
    RowLabelMissing { label: String, row: Monotype, span: Span },
    /// A label was found, but its row's kind didn't match the row it was
    /// being unified against (only possible if a bug lets a value type
    /// leak into row position).
    RowKindMismatch { label: String, span: Span },
    /// An annotation's `user_specified` variable would have to be
    /// instantiated more narrowly than written, i.e. the inferred use is
    /// broader than the annotation allows.
    AnnotationTooGeneral { var: String, span: Span },
    /// A type alias expands into itself with no base case.
    RecursiveTypeAlias { name: String, cycle: Vec<String> },
    /// The solver made no progress for a full pass over a non-empty
    /// constraint set: none of the remaining constraints are solvable
    /// (typically an `ImplicitInstance` whose active variables never
    /// settle).
    SolverStuck { remaining: usize },
    /// A name wasn't bound anywhere: not in the module being checked, and
    /// not in the external environment it was checked against.
    UnboundVariable { name: String, span: Span },
}

impl Error {
    /// Creates an occurs-check failure.
    pub fn occurs_check(var: impl Into<String>, ty: Monotype, span: Span) -> Self {
        Self::OccursCheck { var: var.into(), ty, span }
    }

    /// Creates a kind-mismatch failure.
    pub fn kind_mismatch(expected: &'static str, found: &'static str, span: Span) -> Self {
        Self::KindMismatch { expected, found, span }
    }

    /// Creates a constant/constructor mismatch failure.
    pub fn constant_mismatch(expected: Monotype, found: Monotype, span: Span) -> Self {
        Self::ConstantMismatch { expected, found, span }
    }

    /// Creates an arity-mismatch failure.
    pub fn arity_mismatch(expected: usize, found: usize, span: Span) -> Self {
        Self::ArityMismatch { expected, found, span }
    }

    /// Creates a row-label-missing failure.
    pub fn row_label_missing(label: impl Into<String>, row: Monotype, span: Span) -> Self {
        Self::RowLabelMissing { label: label.into(), row, span }
    }

    /// Creates a row-kind-mismatch failure.
    pub fn row_kind_mismatch(label: impl Into<String>, span: Span) -> Self {
        Self::RowKindMismatch { label: label.into(), span }
    }

    /// Creates an annotation-too-general failure.
    pub fn annotation_too_general(var: impl Into<String>, span: Span) -> Self {
        Self::AnnotationTooGeneral { var: var.into(), span }
    }

    /// Creates a recursive-type-alias failure.
    pub fn recursive_type_alias(name: impl Into<String>, cycle: Vec<String>) -> Self {
        Self::RecursiveTypeAlias { name: name.into(), cycle }
    }

    /// Creates a solver-stuck failure.
    pub fn solver_stuck(remaining: usize) -> Self {
        Self::SolverStuck { remaining }
    }

    /// Creates an unbound-variable failure.
    pub fn unbound_variable(name: impl Into<String>, span: Span) -> Self {
        Self::UnboundVariable { name: name.into(), span }
    }

    /// Boxes this error for use with [`Result`].
    pub fn boxed(self) -> Box<Error> {
        Box::new(self)
    }

    /// The primary span to underline, if this error has exactly one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::OccursCheck { span, .. }
            | Error::KindMismatch { span, .. }
            | Error::ConstantMismatch { span, .. }
            | Error::ArityMismatch { span, .. }
            | Error::RowLabelMissing { span, .. }
            | Error::RowKindMismatch { span, .. }
            | Error::AnnotationTooGeneral { span, .. }
            | Error::UnboundVariable { span, .. } => Some(*span),
            Error::RecursiveTypeAlias { .. } | Error::SolverStuck { .. } => None,
        }
    }

    /// Renders this error against the original source text using
    /// `ariadne`, producing a highlighted, human-readable report. Falls
    /// back to the plain `Display` message when there's no span to anchor
    /// a report to (alias cycles, solver deadlock).
    pub fn report(&self, source_name: &str, source: &str) -> String {
        use ariadne::{Label, Report, ReportKind, Source};

        let Some(span) = self.span() else {
            return self.to_string();
        };
        let range = span.start..span.end();
        let mut out = Vec::new();
        Report::build(ReportKind::Error, source_name, span.start)
            .with_message(self.to_string())
            .with_label(Label::new((source_name, range)).with_message("here"))
            .finish()
            .write((source_name, Source::from(source)), &mut out)
            .expect("ariadne report writes to an in-memory buffer");
        String::from_utf8_lossy(&out).into_owned()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OccursCheck { var, ty, .. } => {
                write!(f, "occurs check: {var} occurs in {ty}")
            }
            Error::KindMismatch { expected, found, .. } => {
                write!(f, "kind mismatch: expected a {expected}, found a {found}")
            }
            Error::ConstantMismatch { expected, found, .. } => {
                write!(f, "type mismatch: expected {expected}, found {found}")
            }
            Error::ArityMismatch { expected, found, .. } => {
                write!(f, "arity mismatch: expected {expected} argument(s), found {found}")
            }
            Error::RowLabelMissing { label, row, .. } => {
                write!(f, "missing field `{label}` in {row}")
            }
            Error::RowKindMismatch { label, .. } => {
                write!(f, "field `{label}` has the wrong kind for this row")
            }
            Error::AnnotationTooGeneral { var, .. } => {
                write!(f, "annotation too general: `{var}` is used more broadly than written")
            }
            Error::RecursiveTypeAlias { name, cycle } => {
                write!(f, "recursive type alias `{name}`: {}", cycle.join(" -> "))
            }
            Error::SolverStuck { remaining } => {
                write!(f, "solver stuck with {remaining} constraint(s) left unsolved")
            }
            Error::UnboundVariable { name, .. } => write!(f, "unbound variable `{name}`"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occurs_check_message_names_the_variable() {
        let err = Error::occurs_check("α", Monotype::number(), Span::at(0));
        assert!(err.to_string().contains('α'));
    }

    #[test]
    fn solver_stuck_has_no_span() {
        let err = Error::solver_stuck(3);
        assert!(err.span().is_none());
    }
}
