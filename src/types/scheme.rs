//! Type schemes: let-bound polymorphism over monotypes.
//!
//! Grounded on the teacher's `type_scheme.rs` (`TypeScheme::polymorphic` /
//! `instantiate`), dropped down to the four-case `Monotype` algebra and
//! without the type-class `constraints` field, which this design has no
//! use for.

use super::{Monotype, Substitution, TypeVar, VarGen};

/// A `forall vars. ty` polymorphic type. Quantified variables are
/// instantiated fresh at every use site; any other free variable in `ty`
/// is monomorphic and shared across uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheme {
    /// The variables this scheme is polymorphic over.
    pub vars: Vec<TypeVar>,
    /// The underlying monotype, possibly mentioning `vars`.
    pub ty: Monotype,
}

impl Scheme {
    /// A monomorphic scheme: no quantified variables.
    pub fn monomorphic(ty: Monotype) -> Self {
        Self { vars: Vec::new(), ty }
    }

    /// Quantifies every free variable of `ty` that is not free in the
    /// surrounding environment (`env_free`) and is not marked
    /// `user_specified`. A variable written explicitly by the programmer
    /// in an annotation keeps its identity across generalization instead
    /// of being folded into the scheme's quantifier list — generalizing it
    /// away would let an inferred use be broader than what was written,
    /// which is exactly what `annotation-too-general` exists to catch.
    pub fn generalize(env_free: &[TypeVar], ty: Monotype) -> Self {
        let vars = ty
            .free_vars()
            .into_iter()
            .filter(|v| !v.is_user_specified() && !env_free.contains(v))
            .collect();
        Self { vars, ty }
    }

    /// Instantiates this scheme by replacing every quantified variable
    /// with a fresh one of the same kind, leaving any non-quantified free
    /// variable shared with the rest of the program.
    pub fn instantiate(&self, gen_: &mut VarGen) -> Monotype {
        if self.vars.is_empty() {
            return self.ty.clone();
        }
        let mut subst = Substitution::empty();
        for var in &self.vars {
            subst.extend(var.clone(), Monotype::Var(gen_.fresh_kind(var.kind())));
        }
        subst.apply(&self.ty)
    }

    /// Every free variable of the scheme not bound by its own quantifier —
    /// i.e. the variables an enclosing environment must still account for.
    pub fn free_vars(&self) -> Vec<TypeVar> {
        self.ty.free_vars().into_iter().filter(|v| !self.vars.contains(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kind;

    #[test]
    fn monomorphic_scheme_instantiates_to_itself() {
        let scheme = Scheme::monomorphic(Monotype::number());
        let mut gen_ = VarGen::new();
        assert_eq!(scheme.instantiate(&mut gen_), Monotype::number());
    }

    #[test]
    fn generalize_quantifies_vars_not_free_in_env() {
        let mut gen_ = VarGen::new();
        let v = gen_.fresh();
        let scheme = Scheme::generalize(&[], Monotype::Var(v.clone()));
        assert_eq!(scheme.vars, vec![v]);
    }

    #[test]
    fn generalize_keeps_env_free_vars_monomorphic() {
        let mut gen_ = VarGen::new();
        let v = gen_.fresh();
        let scheme = Scheme::generalize(&[v.clone()], Monotype::Var(v));
        assert!(scheme.vars.is_empty());
    }

    #[test]
    fn instantiate_produces_fresh_variables_each_time() {
        let mut gen_ = VarGen::new();
        let v = gen_.fresh();
        let scheme = Scheme::generalize(&[], Monotype::function(vec![Monotype::Var(v.clone())], Monotype::RowEmpty, Monotype::Var(v)));
        let mut call_gen = VarGen::new();
        call_gen.fresh_kind(Kind::Value);
        let first = scheme.instantiate(&mut call_gen);
        let second = scheme.instantiate(&mut call_gen);
        assert_ne!(first, second);
    }

    #[test]
    fn user_specified_vars_are_never_generalized() {
        let mut gen_ = VarGen::new();
        let v = gen_.fresh_named("a", Kind::Value);
        let scheme = Scheme::generalize(&[], Monotype::Var(v));
        assert!(scheme.vars.is_empty());
    }
}
