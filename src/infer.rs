//! Constraint generation: the structural walk that turns an [`Expr`] into
//! a type, a set of constraints, and the free-variable assumptions about
//! names it couldn't resolve on its own.
//!
//! The teacher's `inference.rs` runs Algorithm W directly: `infer_expr`
//! returns a `Type` immediately, consulting a `TypeEnv` for every
//! variable reference as it goes. This design splits that in two —
//! generation here, solving in [`crate::solver`] — so a name can be used
//! before its binding's scheme is known (an `(let ((f ...)) ...)` whose
//! polymorphic uses are resolved only once the solver has settled
//! whatever that binding turned out to need). Every variable reference
//! becomes an [`Assumption`] instead of an environment lookup; the module
//! driver in [`crate::module`] is what eventually turns assumptions into
//! `ImplicitInstance`/`ExplicitInstance` constraints and reports the ones
//! that resolve to nothing.

use crate::ast::{Annotation, Binding, Expr, Literal, MatchArm};
use crate::constraint::{Assumption, Constraint};
use crate::types::{row, Kind, Monotype, Scheme, TypeVar, VarGen};

/// The result of generating constraints for one expression: its type, the
/// ambient effect it performs, the constraints it requires to hold, and
/// the free-variable assumptions still unresolved.
#[derive(Debug, Clone)]
pub struct Generated {
    pub ty: Monotype,
    pub effect: Monotype,
    pub constraints: Vec<Constraint>,
    pub assumptions: Vec<Assumption>,
}

/// Walks one expression, generating fresh variables from `gen_` and
/// resolving any inline type annotations against `aliases`.
pub struct Generator<'a> {
    gen_: &'a mut VarGen,
    aliases: &'a crate::alias::AliasTable,
}

impl<'a> Generator<'a> {
    /// Creates a generator sharing `gen_`'s fresh-variable counter and
    /// resolving annotations against `aliases`.
    pub fn new(gen_: &'a mut VarGen, aliases: &'a crate::alias::AliasTable) -> Self {
        Self { gen_, aliases }
    }

    fn resolve_annotation(&mut self, annotation: &Annotation) -> Monotype {
        let expanded = crate::alias::expand(self.aliases, annotation);
        crate::annotation::resolve(&expanded, self.gen_)
    }

    /// Generates constraints for `expr`, given the effect row the
    /// surrounding context allows it to perform.
    pub fn generate(&mut self, expr: &Expr, ambient_effect: &Monotype) -> Generated {
        match expr {
            Expr::Literal { value, .. } => self.generate_literal(value),
            Expr::Variable { name, span } => {
                let var = Monotype::Var(self.gen_.fresh());
                Generated {
                    ty: var.clone(),
                    effect: ambient_effect.clone(),
                    constraints: Vec::new(),
                    assumptions: vec![Assumption { name: name.clone(), ty: var, span: *span }],
                }
            }
            Expr::Vector { elements, span } => self.generate_vector(elements, ambient_effect, *span),
            Expr::Record { fields, span } => self.generate_record(fields, ambient_effect, *span),
            Expr::If { cond, then_branch, else_branch, span } => {
                self.generate_if(cond, then_branch, else_branch, ambient_effect, *span)
            }
            Expr::Lambda { params, body, .. } => self.generate_lambda(params, body),
            Expr::Call { function, args, span } => self.generate_call(function, args, ambient_effect, *span),
            Expr::Let { bindings, body, .. } => self.generate_let(bindings, body, ambient_effect),
            Expr::Annotated { annotation, expr, span } => self.generate_annotated(annotation, expr, ambient_effect, *span),
            Expr::Do { exprs, span } => self.generate_do(exprs, ambient_effect, *span),
            Expr::Match { scrutinee, arms, span } => self.generate_match(scrutinee, arms, ambient_effect, *span),
            Expr::Values { exprs, .. } => self.generate_values(exprs, ambient_effect),
            Expr::MultipleValueBind { names, producer, body, span } => {
                self.generate_mv_bind(names, producer, body, ambient_effect, *span)
            }
        }
    }

    fn generate_literal(&mut self, value: &Literal) -> Generated {
        let ty = match value {
            Literal::Number(_) => Monotype::number(),
            Literal::String(_) => Monotype::string(),
            Literal::Boolean(_) => Monotype::boolean(),
        };
        Generated { ty, effect: Monotype::Var(self.gen_.fresh_kind(Kind::Row)), constraints: Vec::new(), assumptions: Vec::new() }
    }

    fn generate_vector(&mut self, elements: &[Expr], ambient: &Monotype, span: crate::span::Span) -> Generated {
        let elem_var = Monotype::Var(self.gen_.fresh());
        let mut constraints = Vec::new();
        let mut assumptions = Vec::new();
        for element in elements {
            let generated = self.generate(element, ambient);
            constraints.push(Constraint::Equal { left: generated.ty, right: elem_var.clone(), span });
            constraints.push(Constraint::EffectEqual { left: generated.effect, right: ambient.clone(), span });
            constraints.extend(generated.constraints);
            assumptions.extend(generated.assumptions);
        }
        Generated { ty: Monotype::vector(elem_var), effect: ambient.clone(), constraints, assumptions }
    }

    fn generate_record(&mut self, fields: &[(String, Expr)], ambient: &Monotype, span: crate::span::Span) -> Generated {
        let mut constraints = Vec::new();
        let mut assumptions = Vec::new();
        let mut field_types = Vec::new();
        for (label, value) in fields {
            let generated = self.generate(value, ambient);
            constraints.push(Constraint::EffectEqual { left: generated.effect, right: ambient.clone(), span });
            constraints.extend(generated.constraints);
            assumptions.extend(generated.assumptions);
            field_types.push((label.clone(), generated.ty));
        }
        let row = row::row_from_fields(field_types, Monotype::RowEmpty);
        Generated { ty: Monotype::record(row), effect: ambient.clone(), constraints, assumptions }
    }

    fn generate_if(
        &mut self,
        cond: &Expr,
        then_branch: &Expr,
        else_branch: &Expr,
        ambient: &Monotype,
        span: crate::span::Span,
    ) -> Generated {
        let cond_g = self.generate(cond, ambient);
        let then_g = self.generate(then_branch, ambient);
        let else_g = self.generate(else_branch, ambient);
        let mut constraints = vec![
            Constraint::Equal { left: cond_g.ty, right: Monotype::boolean(), span: cond.span() },
            Constraint::Equal { left: then_g.ty.clone(), right: else_g.ty.clone(), span },
            Constraint::EffectEqual { left: cond_g.effect, right: ambient.clone(), span },
            Constraint::EffectEqual { left: then_g.effect, right: ambient.clone(), span },
            Constraint::EffectEqual { left: else_g.effect, right: ambient.clone(), span },
        ];
        constraints.extend(cond_g.constraints);
        constraints.extend(then_g.constraints);
        constraints.extend(else_g.constraints);
        let mut assumptions = cond_g.assumptions;
        assumptions.extend(then_g.assumptions);
        assumptions.extend(else_g.assumptions);
        Generated { ty: then_g.ty, effect: ambient.clone(), constraints, assumptions }
    }

    fn generate_lambda(&mut self, params: &[Binding], body: &Expr) -> Generated {
        let param_types: Vec<(String, Monotype)> = params
            .iter()
            .map(|p| {
                let ty = match &p.annotation {
                    Some(ann) => self.resolve_annotation(ann),
                    None => Monotype::Var(self.gen_.fresh()),
                };
                (p.name.clone(), ty)
            })
            .collect();
        let body_effect = Monotype::Var(self.gen_.fresh_kind(Kind::Row));
        let body_g = self.generate(body, &body_effect);
        let (constraints, assumptions) = discharge_many(&param_types, body_g.constraints, body_g.assumptions);
        let fn_ty =
            Monotype::function(param_types.into_iter().map(|(_, t)| t).collect(), body_effect.clone(), body_g.ty);
        Generated {
            ty: fn_ty,
            effect: Monotype::Var(self.gen_.fresh_kind(Kind::Row)),
            constraints,
            assumptions,
        }
    }

    fn generate_call(&mut self, function: &Expr, args: &[Expr], ambient: &Monotype, span: crate::span::Span) -> Generated {
        let fn_g = self.generate(function, ambient);
        let mut constraints = fn_g.constraints;
        let mut assumptions = fn_g.assumptions;
        let mut arg_types = Vec::new();
        for arg in args {
            let arg_g = self.generate(arg, ambient);
            constraints.extend(arg_g.constraints);
            assumptions.extend(arg_g.assumptions);
            constraints.push(Constraint::EffectEqual { left: arg_g.effect, right: ambient.clone(), span });
            arg_types.push(arg_g.ty);
        }
        constraints.push(Constraint::EffectEqual { left: fn_g.effect, right: ambient.clone(), span });
        let result = Monotype::Var(self.gen_.fresh());
        let expected_fn = Monotype::function(arg_types, ambient.clone(), result.clone());
        constraints.push(Constraint::Equal { left: fn_g.ty, right: expected_fn, span });
        Generated { ty: result, effect: ambient.clone(), constraints, assumptions }
    }

    fn generate_let(&mut self, bindings: &[(Binding, Expr)], body: &Expr, ambient: &Monotype) -> Generated {
        let mut constraints = Vec::new();
        let mut assumptions = Vec::new();
        let mut schemes = Vec::new();
        for (binding, value) in bindings {
            let value_g = self.generate(value, ambient);
            constraints.extend(value_g.constraints.clone());
            assumptions.extend(value_g.assumptions.clone());
            constraints.push(Constraint::EffectEqual { left: value_g.effect, right: ambient.clone(), span: value.span() });

            let monomorphic_vars = env_free_vars(&assumptions, &constraints);
            let mut ty = value_g.ty;
            if let Some(ann) = &binding.annotation {
                let declared = self.resolve_annotation(ann);
                constraints.push(Constraint::Equal { left: ty.clone(), right: declared.clone(), span: binding.span });
                ty = declared;
            }
            let scheme = Scheme::generalize(&monomorphic_vars, ty);
            schemes.push((binding.name.clone(), scheme));
        }

        let body_g = self.generate(body, ambient);
        let mut body_constraints = body_g.constraints;
        let mut body_assumptions = body_g.assumptions;
        for (name, scheme) in &schemes {
            let (matched, rest) = partition_assumptions(body_assumptions, name);
            body_assumptions = rest;
            for a in matched {
                body_constraints.push(Constraint::ImplicitInstance {
                    ty: a.ty,
                    monomorphic_vars: env_free_vars(&assumptions, &constraints),
                    scheme_body: scheme.ty.clone(),
                    span: a.span,
                });
            }
        }
        constraints.extend(body_constraints);
        assumptions.extend(body_assumptions);
        Generated { ty: body_g.ty, effect: ambient.clone(), constraints, assumptions }
    }

    fn generate_annotated(&mut self, annotation: &Annotation, expr: &Expr, ambient: &Monotype, span: crate::span::Span) -> Generated {
        let declared = self.resolve_annotation(annotation);
        let mut inner = self.generate(expr, ambient);
        inner.constraints.push(Constraint::Equal { left: inner.ty, right: declared.clone(), span });
        inner.ty = declared;
        inner
    }

    fn generate_do(&mut self, exprs: &[Expr], ambient: &Monotype, span: crate::span::Span) -> Generated {
        let mut constraints = Vec::new();
        let mut assumptions = Vec::new();
        let mut last_ty = Monotype::void();
        for expr in exprs {
            let g = self.generate(expr, ambient);
            constraints.extend(g.constraints);
            assumptions.extend(g.assumptions);
            constraints.push(Constraint::EffectEqual { left: g.effect, right: ambient.clone(), span });
            last_ty = g.ty;
        }
        Generated { ty: last_ty, effect: ambient.clone(), constraints, assumptions }
    }

    fn generate_match(&mut self, scrutinee: &Expr, arms: &[MatchArm], ambient: &Monotype, span: crate::span::Span) -> Generated {
        let scrutinee_g = self.generate(scrutinee, ambient);
        let mut constraints = scrutinee_g.constraints;
        let mut assumptions = scrutinee_g.assumptions;
        constraints.push(Constraint::EffectEqual { left: scrutinee_g.effect, right: ambient.clone(), span });

        let result_ty = Monotype::Var(self.gen_.fresh());
        let mut variant_fields = Vec::new();
        for arm in arms {
            let bound_ty = Monotype::Var(self.gen_.fresh());
            let arm_g = self.generate(&arm.body, ambient);
            let (arm_constraints, arm_assumptions) = discharge_many(
                &[(arm.bound_name.clone(), bound_ty.clone())],
                arm_g.constraints,
                arm_g.assumptions,
            );
            constraints.extend(arm_constraints);
            assumptions.extend(arm_assumptions);
            constraints.push(Constraint::Equal { left: arm_g.ty, right: result_ty.clone(), span: arm.span });
            constraints.push(Constraint::EffectEqual { left: arm_g.effect, right: ambient.clone(), span: arm.span });
            variant_fields.push((arm.label.clone(), bound_ty));
        }
        let variant_row = row::row_from_fields(variant_fields, Monotype::RowEmpty);
        constraints.push(Constraint::Equal { left: scrutinee_g.ty, right: Monotype::variant(variant_row), span });

        Generated { ty: result_ty, effect: ambient.clone(), constraints, assumptions }
    }

    fn generate_values(&mut self, exprs: &[Expr], ambient: &Monotype) -> Generated {
        let mut constraints = Vec::new();
        let mut assumptions = Vec::new();
        let mut tys = Vec::new();
        for expr in exprs {
            let g = self.generate(expr, ambient);
            constraints.extend(g.constraints);
            assumptions.extend(g.assumptions);
            constraints.push(Constraint::EffectEqual { left: g.effect, right: ambient.clone(), span: expr.span() });
            tys.push(g.ty);
        }
        Generated { ty: Monotype::values(tys), effect: ambient.clone(), constraints, assumptions }
    }

    fn generate_mv_bind(&mut self, names: &[String], producer: &Expr, body: &Expr, ambient: &Monotype, span: crate::span::Span) -> Generated {
        let producer_g = self.generate(producer, ambient);
        let bound_types: Vec<(String, Monotype)> =
            names.iter().map(|n| (n.clone(), Monotype::Var(self.gen_.fresh()))).collect();
        let expected = Monotype::values(bound_types.iter().map(|(_, t)| t.clone()).collect());
        let mut constraints = producer_g.constraints;
        constraints.push(Constraint::Equal { left: producer_g.ty, right: expected, span });
        constraints.push(Constraint::EffectEqual { left: producer_g.effect, right: ambient.clone(), span });
        let mut assumptions = producer_g.assumptions;

        let body_g = self.generate(body, ambient);
        let (body_constraints, body_assumptions) = discharge_many(&bound_types, body_g.constraints, body_g.assumptions);
        constraints.extend(body_constraints);
        assumptions.extend(body_assumptions);
        Generated { ty: body_g.ty, effect: ambient.clone(), constraints, assumptions }
    }
}

/// Converts every assumption about a now-bound name into an `Equal`
/// constraint against that name's (monomorphic) binding type, leaving
/// every other assumption untouched. Used for lambda parameters and
/// match-arm bindings, which are never generalized — only `let`
/// introduces polymorphism.
fn discharge_many(
    bindings: &[(String, Monotype)],
    mut constraints: Vec<Constraint>,
    assumptions: Vec<Assumption>,
) -> (Vec<Constraint>, Vec<Assumption>) {
    let mut remaining = Vec::new();
    for assumption in assumptions {
        match bindings.iter().find(|(name, _)| *name == assumption.name) {
            Some((_, ty)) => constraints.push(Constraint::Equal {
                left: assumption.ty,
                right: ty.clone(),
                span: assumption.span,
            }),
            None => remaining.push(assumption),
        }
    }
    (constraints, remaining)
}

/// Splits assumptions about `name` off from the rest, for `let`'s
/// polymorphic discharge via `ImplicitInstance`.
fn partition_assumptions(assumptions: Vec<Assumption>, name: &str) -> (Vec<Assumption>, Vec<Assumption>) {
    assumptions.into_iter().partition(|a| a.name == name)
}

/// The free variables active in the surrounding context at the point a
/// `let`-binding is generalized: every variable still mentioned by an
/// unresolved assumption or an already-emitted constraint. Kept out of a
/// scheme's quantifier list, since a type still tied to its environment
/// isn't safe to generalize yet.
fn env_free_vars(assumptions: &[Assumption], constraints: &[Constraint]) -> Vec<TypeVar> {
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
