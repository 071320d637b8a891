//! The constraint solver: an iterative scheduler that resolves constraints
//! against an accumulating substitution until none are left or none can
//! make progress.
//!
//! Grounded on the teacher's `constraints.rs` `ConstraintSolver::solve`
//! loop — drain the constraint list each pass, apply the current
//! substitution, try each constraint, keep what's still unresolved,
//! bound the number of passes — generalized from that file's `Equal`-only
//! case to the four constraint kinds and the `ImplicitInstance`
//! active-variables deferral rule the teacher's type-class solver never
//! needed.

use crate::constraint::Constraint;
use crate::error::{Error, Result};
use crate::types::{unify::unify, Monotype, Substitution, TypeVar, VarGen};

/// Bounds the number of solver passes before giving up and reporting
/// `solver-stuck`, matching the teacher's own `MAX_ITERATIONS` guard
/// against a constraint set that can never converge.
#[derive(Debug, Clone, Copy)]
pub struct InferenceOptions {
    pub max_iterations: usize,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self { max_iterations: 100 }
    }
}

/// Solves a list of constraints to completion, returning the final
/// substitution. Fails with `solver-stuck` if a full pass makes no
/// progress while constraints remain, or if `max_iterations` is reached.
pub fn solve(constraints: Vec<Constraint>, gen_: &mut VarGen, options: InferenceOptions) -> Result<Substitution> {
    let mut pending = constraints;
    let mut subst = Substitution::empty();
    let mut iterations = 0;

    loop {
        if pending.is_empty() {
            return Ok(subst);
        }
        if iterations >= options.max_iterations {
            return Err(Error::solver_stuck(pending.len()).boxed());
        }
        iterations += 1;

        let resolved: Vec<Constraint> = pending.iter().map(|c| apply_to_constraint(&subst, c)).collect();
        let active_vars = active_variables(&resolved);

        let mut next = Vec::new();
        let mut progressed = false;
        for constraint in resolved {
            match try_solve(&constraint, &active_vars, gen_)? {
                Some(step) => {
                    subst = step.compose(&subst);
                    progressed = true;
                }
                None => next.push(constraint),
            }
        }
        pending = next;

        if !progressed {
            return Err(Error::solver_stuck(pending.len()).boxed());
        }
    }
}

/// Attempts to solve one constraint. Returns `None` when the constraint
/// can't be solved this pass yet (only possible for `ImplicitInstance`,
/// deferred until the variables it's active over stop changing).
fn try_solve(constraint: &Constraint, active_vars: &[TypeVar], gen_: &mut VarGen) -> Result<Option<Substitution>> {
    match constraint {
        Constraint::Equal { left, right, span } | Constraint::EffectEqual { left, right, span } => {
            unify(left, right, *span, gen_).map(Some)
        }
        Constraint::ExplicitInstance { ty, scheme, span } => {
            let instantiated = scheme.instantiate(gen_);
            unify(ty, &instantiated, *span, gen_).map(Some)
        }
        Constraint::ImplicitInstance { ty, monomorphic_vars, scheme_body, span } => {
            if is_solvable(monomorphic_vars, active_vars) {
                let scheme = crate::types::Scheme::generalize(monomorphic_vars, scheme_body.clone());
                let instantiated = scheme.instantiate(gen_);
                unify(ty, &instantiated, *span, gen_).map(Some)
            } else {
                Ok(None)
            }
        }
    }
}

/// An `ImplicitInstance` constraint is solvable once none of its
/// monomorphic variables are still active elsewhere in the pending
/// constraint set — generalizing early would quantify over a variable
/// some other constraint still needs to pin down.
fn is_solvable(monomorphic_vars: &[TypeVar], active_vars: &[TypeVar]) -> bool {
    monomorphic_vars.iter().all(|v| !active_vars.contains(v))
}

/// Every type variable mentioned by any pending constraint, used as the
/// "active variables" set for the `ImplicitInstance` solvability check.
fn active_variables(constraints: &[Constraint]) -> Vec<TypeVar> {
    let mut vars = Vec::new();
    for c in constraints {
        for v in c.free_vars() {
            if !vars.contains(&v) {
                vars.push(v);
            }
        }
    }
    vars
}

fn apply_to_constraint(subst: &Substitution, constraint: &Constraint) -> Constraint {
    match constraint {
        Constraint::Equal { left, right, span } => {
            Constraint::Equal { left: subst.apply(left), right: subst.apply(right), span: *span }
        }
        Constraint::EffectEqual { left, right, span } => {
            Constraint::EffectEqual { left: subst.apply(left), right: subst.apply(right), span: *span }
        }
        Constraint::ImplicitInstance { ty, monomorphic_vars, scheme_body, span } => Constraint::ImplicitInstance {
            ty: subst.apply(ty),
            monomorphic_vars: monomorphic_vars
                .iter()
                .map(|v| match subst.apply(&Monotype::Var(v.clone())) {
                    Monotype::Var(v) => v,
                    _ => v.clone(),
                })
                .collect(),
            scheme_body: subst.apply(scheme_body),
            span: *span,
        },
        Constraint::ExplicitInstance { ty, scheme, span } => {
            Constraint::ExplicitInstance { ty: subst.apply(ty), scheme: subst.apply_scheme(scheme), span: *span }
        }
    }
}
