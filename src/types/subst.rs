//! Substitutions mapping type variables to monotypes.
//!
//! Grounded on the teacher's `substitution.rs`: the same map-plus-compose
//! shape, narrowed to the four-case `Monotype` algebra and without the
//! `Forall`/`Exists`/`Constrained` quantifier cases, since generalization
//! lives at the [`super::scheme::Scheme`] level rather than inside the
//! monotype itself.

use super::{Monotype, Scheme, TypeVar};
use std::collections::HashMap;
use std::fmt;

/// A finite map from type variables to the monotypes they've been solved
/// to. Built up incrementally by the solver as constraints are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Substitution {
    mapping: HashMap<TypeVar, Monotype>,
}

impl Substitution {
    /// The identity substitution.
    pub fn empty() -> Self {
        Self { mapping: HashMap::new() }
    }

    /// A substitution binding exactly one variable.
    pub fn single(var: TypeVar, ty: Monotype) -> Self {
        let mut mapping = HashMap::new();
        mapping.insert(var, ty);
        Self { mapping }
    }

    /// True if this substitution binds nothing.
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Looks up a variable's binding without following chains.
    pub fn get(&self, var: &TypeVar) -> Option<&Monotype> {
        self.mapping.get(var)
    }

    /// True if `var` is bound by this substitution.
    pub fn contains_var(&self, var: &TypeVar) -> bool {
        self.mapping.contains_key(var)
    }

    /// Applies this substitution to a monotype, following chains of
    /// bound variables to a fixed point.
    pub fn apply(&self, ty: &Monotype) -> Monotype {
        match ty {
            Monotype::Var(v) => match self.mapping.get(v) {
                Some(bound) => self.apply(bound),
                None => ty.clone(),
            },
            Monotype::Constant(_) | Monotype::RowEmpty => ty.clone(),
            Monotype::App { op, args } => {
                Monotype::App { op: op.clone(), args: args.iter().map(|a| self.apply(a)).collect() }
            }
            Monotype::RowExt { label, field_type, tail } => Monotype::RowExt {
                label: label.clone(),
                field_type: Box::new(self.apply(field_type)),
                tail: Box::new(self.apply(tail)),
            },
        }
    }

    /// Applies this substitution to a type scheme, leaving the scheme's
    /// own quantified variables untouched.
    pub fn apply_scheme(&self, scheme: &Scheme) -> Scheme {
        let filtered = self.remove_vars(&scheme.vars);
        Scheme { vars: scheme.vars.clone(), ty: filtered.apply(&scheme.ty) }
    }

    /// Composes two substitutions so that applying the result equals
    /// applying `other` and then `self`.
    pub fn compose(&self, other: &Substitution) -> Substitution {
        let mut mapping: HashMap<TypeVar, Monotype> =
            other.mapping.iter().map(|(v, t)| (v.clone(), self.apply(t))).collect();
        for (var, ty) in &self.mapping {
            mapping.entry(var.clone()).or_insert_with(|| ty.clone());
        }
        Substitution { mapping }
    }

    /// Removes a variable from the substitution's domain.
    pub fn remove_var(&self, var: &TypeVar) -> Substitution {
        let mut mapping = self.mapping.clone();
        mapping.remove(var);
        Substitution { mapping }
    }

    /// Removes several variables from the substitution's domain, used to
    /// keep a scheme's own quantified variables from being captured.
    pub fn remove_vars(&self, vars: &[TypeVar]) -> Substitution {
        let mut mapping = self.mapping.clone();
        for var in vars {
            mapping.remove(var);
        }
        Substitution { mapping }
    }

    /// Extends this substitution with a new binding.
    ///
    /// The caller is expected to have already run the occurs check and
    /// kind check; this only guards against silently rebinding a variable
    /// to something different from what it already maps to.
    pub fn extend(&mut self, var: TypeVar, ty: Monotype) {
        self.mapping.insert(var, ty);
    }

    /// Every variable bound by this substitution.
    pub fn domain(&self) -> Vec<TypeVar> {
        self.mapping.keys().cloned().collect()
    }

    /// Every variable mentioned in the range of this substitution's
    /// bindings, after the substitution has been applied to itself.
    pub fn range_vars(&self) -> Vec<TypeVar> {
        let mut vars = Vec::new();
        for ty in self.mapping.values() {
            for v in self.apply(ty).free_vars() {
                if !vars.contains(&v) {
                    vars.push(v);
                }
            }
        }
        vars
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mapping.is_empty() {
            return write!(f, "∅");
        }
        write!(f, "[")?;
        for (i, (var, ty)) in self.mapping.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{var} ↦ {ty}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kind;

    #[test]
    fn empty_substitution_is_identity() {
        let subst = Substitution::empty();
        assert!(subst.is_empty());
        assert_eq!(subst.apply(&Monotype::number()), Monotype::number());
    }

    #[test]
    fn single_substitution_resolves_its_variable() {
        let var = TypeVar::with_id(1, Kind::Value);
        let subst = Substitution::single(var.clone(), Monotype::number());
        assert_eq!(subst.apply(&Monotype::Var(var)), Monotype::number());
    }

    #[test]
    fn compose_follows_a_chain() {
        let v1 = TypeVar::with_id(1, Kind::Value);
        let v2 = TypeVar::with_id(2, Kind::Value);
        let s1 = Substitution::single(v1.clone(), Monotype::Var(v2.clone()));
        let s2 = Substitution::single(v2.clone(), Monotype::number());
        let composed = s1.compose(&s2);
        assert_eq!(composed.apply(&Monotype::Var(v1)), Monotype::number());
        assert_eq!(composed.apply(&Monotype::Var(v2)), Monotype::number());
    }

    #[test]
    fn apply_recurses_into_function_types() {
        let v = TypeVar::with_id(1, Kind::Value);
        let func = Monotype::function(vec![Monotype::Var(v.clone())], Monotype::RowEmpty, Monotype::Var(v.clone()));
        let subst = Substitution::single(v, Monotype::number());
        assert_eq!(
            subst.apply(&func),
            Monotype::function(vec![Monotype::number()], Monotype::RowEmpty, Monotype::number())
        );
    }

    #[test]
    fn remove_vars_protects_quantified_variables() {
        let v = TypeVar::with_id(1, Kind::Value);
        let scheme = Scheme { vars: vec![v.clone()], ty: Monotype::Var(v.clone()) };
        let subst = Substitution::single(v, Monotype::number());
        let result = subst.apply_scheme(&scheme);
        assert_eq!(result, scheme);
    }
}
