//! The four constraint kinds the generator emits and the solver consumes.
//!
//! Grounded on the teacher's `types/constraint.rs` `TypeConstraint` enum —
//! same shape (a span plus per-kind payload) — replaced with the kinds
//! this design actually needs: plain equality splits into value and
//! effect-row equality, and the type-class `Instance` constraint is
//! replaced by the two let-polymorphism constraints, `ImplicitInstance`
//! and `ExplicitInstance`.

use crate::span::Span;
use crate::types::{Monotype, Scheme, TypeVar};

/// A constraint generated while walking one expression, to be resolved by
/// the solver against the accumulating substitution.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Two monotypes must be equal.
    Equal { left: Monotype, right: Monotype, span: Span },
    /// Two effect rows must be equal. Kept distinct from `Equal` so the
    /// solver can report a dedicated message when an effect escapes a
    /// context that promised not to perform it.
    EffectEqual { left: Monotype, right: Monotype, span: Span },
    /// `ty` must be an instance of the scheme that generalizing
    /// `monomorphic_vars` out of `ty` would produce, once every other
    /// constraint mentioning those variables has been solved. Models a
    /// `let`-bound variable's polymorphic use: deferred until the
    /// variables active in the surrounding context have settled, so the
    /// scheme isn't generalized over something that's still being solved
    /// for unrelated reasons.
    ImplicitInstance { ty: Monotype, monomorphic_vars: Vec<TypeVar>, scheme_body: Monotype, span: Span },
    /// `ty` must be an instance of `scheme` — used for references to
    /// already-generalized bindings: primitives, imports, and anything
    /// else pulled from an [`crate::env::ExternalEnv`].
    ExplicitInstance { ty: Monotype, scheme: Scheme, span: Span },
}

impl Constraint {
    /// The span this constraint was generated from.
    pub fn span(&self) -> Span {
        match self {
            Constraint::Equal { span, .. }
            | Constraint::EffectEqual { span, .. }
            | Constraint::ImplicitInstance { span, .. }
            | Constraint::ExplicitInstance { span, .. } => *span,
        }
    }

    /// Every type variable free in this constraint, used by the solver's
    /// active-variables check for `ImplicitInstance`.
    pub fn free_vars(&self) -> Vec<TypeVar> {
        match self {
            Constraint::Equal { left, right, .. } | Constraint::EffectEqual { left, right, .. } => {
                let mut vars = left.free_vars();
                vars.extend(right.free_vars());
                vars
            }
            Constraint::ImplicitInstance { ty, monomorphic_vars, scheme_body, .. } => {
                let mut vars = ty.free_vars();
                vars.extend(monomorphic_vars.iter().cloned());
                vars.extend(scheme_body.free_vars());
                vars
            }
            Constraint::ExplicitInstance { ty, scheme, .. } => {
                let mut vars = ty.free_vars();
                vars.extend(scheme.free_vars());
                vars
            }
        }
    }
}

/// A reference to a name whose binding hasn't been resolved yet at
/// generation time: `name` was used at `ty` somewhere in the tree. The
/// module driver partitions these into internal bindings (solved via
/// `ImplicitInstance`), external bindings (solved via `ExplicitInstance`
/// against an [`crate::env::ExternalEnv`]), and unresolved names reported
/// back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Assumption {
    pub name: String,
    pub ty: Monotype,
    pub span: Span,
}
