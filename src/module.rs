//! The module driver: runs constraint generation over every top-level
//! definition, partitions the resulting assumptions against internal and
//! external bindings, solves, and reports the types (or the unresolved
//! names) that come out the other end.

use crate::alias::AliasTable;
use crate::ast::Expr;
use crate::constraint::{Assumption, Constraint};
use crate::env::ExternalEnv;
use crate::error::{Error, Result};
use crate::infer::Generator;
use crate::solver::{self, InferenceOptions};
use crate::types::{Kind, Monotype, Scheme, Substitution, VarGen};
use std::collections::HashMap;

/// One top-level definition: a name bound to an expression, checked
/// against every other definition in the same module and against the
/// external environment.
pub struct Definition {
    pub name: String,
    pub expr: Expr,
}

/// The outcome of checking a module: each definition's solved, generalized
/// scheme, plus any name nothing in the module or the external
/// environment could resolve.
#[derive(Debug)]
pub struct ModuleResult {
    pub schemes: HashMap<String, Scheme>,
    pub unresolved: Vec<Assumption>,
}

/// Infers types for every definition in a module against `env`.
///
/// Internal definitions may refer to each other and to themselves — the
/// module is treated as one large mutually-recursive `letrec`, matching
/// how top-level definitions behave in the rest of the language — so
/// assumptions about another internal name become `ImplicitInstance`
/// constraints against that name's own (not-yet-generalized) body type,
/// deferred by the solver's active-variables rule exactly like a nested
/// `let`'s bindings are.
pub fn check_module(
    definitions: &[Definition],
    env: &ExternalEnv,
    aliases: &AliasTable,
    options: InferenceOptions,
) -> Result<ModuleResult> {
    aliases.check_acyclic()?;

    let mut gen_ = VarGen::new();
    let mut all_constraints = Vec::new();
    let mut all_assumptions = Vec::new();
    let mut body_types = HashMap::new();

    for def in definitions {
        let ambient_effect = Monotype::Var(gen_.fresh_kind(Kind::Row));
        let mut generator = Generator::new(&mut gen_, aliases);
        let generated = generator.generate(&def.expr, &ambient_effect);
        all_constraints.extend(generated.constraints);
        all_assumptions.extend(generated.assumptions);
        body_types.insert(def.name.clone(), generated.ty);
    }

    let monomorphic_vars = env_free_vars(&all_assumptions, &all_constraints);
    let mut unresolved = Vec::new();

    for assumption in all_assumptions {
        if let Some(body_ty) = body_types.get(&assumption.name) {
            all_constraints.push(Constraint::ImplicitInstance {
                ty: assumption.ty,
                monomorphic_vars: monomorphic_vars.clone(),
                scheme_body: body_ty.clone(),
                span: assumption.span,
            });
        } else if let Some(scheme) = env.lookup(&assumption.name) {
            all_constraints.push(Constraint::ExplicitInstance { ty: assumption.ty, scheme: scheme.clone(), span: assumption.span });
        } else {
            unresolved.push(assumption);
        }
    }

    let subst = solver::solve(all_constraints, &mut gen_, options)?;

    let schemes = body_types
        .into_iter()
        .map(|(name, ty)| {
            let solved = subst.apply(&ty);
            (name, Scheme::generalize(&[], solved))
        })
        .collect();

    Ok(ModuleResult { schemes, unresolved })
}

fn env_free_vars(assumptions: &[Assumption], constraints: &[Constraint]) -> Vec<crate::types::TypeVar> {
    let mut vars = Vec::new();
    for a in assumptions {
        for v in a.ty.free_vars() {
            if !vars.contains(&v) {
                vars.push(v);
            }
        }
    }
    for c in constraints {
        for v in c.free_vars() {
            if !vars.contains(&v) {
                vars.push(v);
            }
        }
    }
    vars
}

/// Reports an unresolved name as an error, for callers that want module
/// checking to fail outright rather than inspect [`ModuleResult::unresolved`].
pub fn require_resolved(result: &ModuleResult) -> Result<()> {
    if let Some(first) = result.unresolved.first() {
        return Err(Error::unbound_variable(first.name.clone(), first.span).boxed());
    }
    Ok(())
}
