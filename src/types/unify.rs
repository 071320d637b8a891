//! Unification: the most general unifier of two monotypes under an
//! accumulating substitution.
//!
//! Grounded on the teacher's `unification.rs` — same `Unifier` holding a
//! running `Substitution`, same variable-binding-with-occurs-check shape —
//! generalized to the row rewrite rule (bring a label to the head) instead
//! of the teacher's closed-HashMap row unification, which had no way to
//! reorder labels or open a row.

use super::row::{self, RowRewrite};
use super::{Kind, Monotype, Substitution, TypeVar, VarGen};
use crate::error::{Error, Result};
use crate::span::Span;

/// Accumulates a substitution across a sequence of unifications.
pub struct Unifier<'g> {
    subst: Substitution,
    gen_: &'g mut VarGen,
}

impl<'g> Unifier<'g> {
    /// Creates a unifier with an empty substitution, using `gen_` to mint
    /// the fresh row-tail variables row unification sometimes needs.
    pub fn new(gen_: &'g mut VarGen) -> Self {
        Self { subst: Substitution::empty(), gen_ }
    }

    /// Creates a unifier seeded with a substitution already solved so far.
    pub fn with_substitution(subst: Substitution, gen_: &'g mut VarGen) -> Self {
        Self { subst, gen_ }
    }

    /// The substitution accumulated so far.
    pub fn substitution(&self) -> &Substitution {
        &self.subst
    }

    /// Consumes the unifier, returning its substitution.
    pub fn into_substitution(self) -> Substitution {
        self.subst
    }

    /// Unifies two monotypes, extending the running substitution.
    pub fn unify(&mut self, a: &Monotype, b: &Monotype, span: Span) -> Result<()> {
        let a = self.subst.apply(a);
        let b = self.subst.apply(b);
        self.unify_resolved(&a, &b, span)
    }

    fn unify_resolved(&mut self, a: &Monotype, b: &Monotype, span: Span) -> Result<()> {
        match (a, b) {
            (a, b) if a == b => Ok(()),

            (Monotype::Var(v), other) | (other, Monotype::Var(v)) => self.bind(v, other, span),

            (Monotype::Constant(_), Monotype::Constant(_)) => {
                Err(Error::constant_mismatch(a.clone(), b.clone(), span).boxed())
            }

            (Monotype::App { op: op1, args: args1 }, Monotype::App { op: op2, args: args2 }) => {
                if op1 != op2 {
                    return Err(Error::constant_mismatch(a.clone(), b.clone(), span).boxed());
                }
                if args1.len() != args2.len() {
                    return Err(Error::arity_mismatch(args1.len(), args2.len(), span).boxed());
                }
                for (x, y) in args1.iter().zip(args2.iter()) {
                    self.unify(x, y, span)?;
                }
                Ok(())
            }

            (Monotype::RowEmpty, Monotype::RowEmpty) => Ok(()),

            (row_a @ Monotype::RowExt { .. }, row_b) | (row_b, row_a @ Monotype::RowExt { .. })
                if matches!(row_b, Monotype::RowExt { .. } | Monotype::RowEmpty) =>
            {
                self.unify_rows(row_a, row_b, span)
            }

            _ => Err(Error::constant_mismatch(a.clone(), b.clone(), span).boxed()),
        }
    }

    fn bind(&mut self, var: &TypeVar, ty: &Monotype, span: Span) -> Result<()> {
        if let Monotype::Var(other) = ty {
            if other == var {
                return Ok(());
            }
        }
        if var.kind() != ty.kind() {
            return Err(Error::kind_mismatch(kind_name(var.kind()), kind_name(ty.kind()), span).boxed());
        }
        if ty.contains_var(var) {
            return Err(Error::occurs_check(var.to_string(), ty.clone(), span).boxed());
        }
        let mut extension = Substitution::single(var.clone(), ty.clone());
        extension = extension.compose(&self.subst);
        self.subst = extension;
        Ok(())
    }

    /// Unifies two rows per the Rémy/Cardelli rewrite rule: find each
    /// label of the left row in the right row (bringing it to the head by
    /// peeling off and remembering any labels in front of it), unify the
    /// matched field types, then recurse on what's left. A label missing
    /// from a closed row is an error; a label missing because the
    /// opposing row's tail is still an unsolved variable extends that
    /// tail with a fresh field instead.
    fn unify_rows(&mut self, left: &Monotype, right: &Monotype, span: Span) -> Result<()> {
        match left {
            Monotype::RowEmpty => self.unify(left, right, span),
            Monotype::RowExt { label, field_type, tail } => {
                match row::find_label(right, label) {
                    RowRewrite::AtHead { field_type: other_field, rest } => {
                        self.unify(field_type, &other_field, span)?;
                        self.unify(tail, &rest, span)
                    }
                    RowRewrite::Found { field_type: other_field, prefix, rest } => {
                        self.unify(field_type, &other_field, span)?;
                        let rebuilt = row::rebuild_without_match(prefix, rest);
                        self.unify(tail, &rebuilt, span)
                    }
                    RowRewrite::Missing => {
                        Err(Error::row_label_missing(label.clone(), right.clone(), span).boxed())
                    }
                    RowRewrite::OpenTail { tail_var } => {
                        let (fresh_field, extended, new_tail_var) =
                            row::extend_open_tail(self.gen_, label, field_type.kind());
                        self.bind(&tail_var, &extended, span)?;
                        self.unify(field_type, &fresh_field, span)?;
                        self.unify(tail, &Monotype::Var(new_tail_var), span)
                    }
                }
            }
            _ => unreachable!("unify_rows only called with a RowExt or RowEmpty on the left"),
        }
    }
}

fn kind_name(kind: Kind) -> &'static str {
    match kind {
        Kind::Value => "value",
        Kind::Row => "row",
    }
}

/// Unifies two monotypes starting from an empty substitution.
pub fn unify(a: &Monotype, b: &Monotype, span: Span, gen_: &mut VarGen) -> Result<Substitution> {
    let mut unifier = Unifier::new(gen_);
    unifier.unify(a, b, span)?;
    Ok(unifier.into_substitution())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::row::row_from_fields;

    #[test]
    fn identical_constants_unify_trivially() {
        let mut gen_ = VarGen::new();
        let subst = unify(&Monotype::number(), &Monotype::number(), Span::at(0), &mut gen_).unwrap();
        assert!(subst.is_empty());
    }

    #[test]
    fn mismatched_constants_fail() {
        let mut gen_ = VarGen::new();
        assert!(unify(&Monotype::number(), &Monotype::string(), Span::at(0), &mut gen_).is_err());
    }

    #[test]
    fn variable_binds_to_a_concrete_type() {
        let mut gen_ = VarGen::new();
        let v = gen_.fresh();
        let subst = unify(&Monotype::Var(v.clone()), &Monotype::number(), Span::at(0), &mut gen_).unwrap();
        assert_eq!(subst.apply(&Monotype::Var(v)), Monotype::number());
    }

    #[test]
    fn occurs_check_rejects_infinite_types() {
        let mut gen_ = VarGen::new();
        let v = gen_.fresh();
        let recursive = Monotype::vector(Monotype::Var(v.clone()));
        assert!(unify(&Monotype::Var(v), &recursive, Span::at(0), &mut gen_).is_err());
    }

    #[test]
    fn function_arity_mismatch_fails() {
        let mut gen_ = VarGen::new();
        let f1 = Monotype::function(vec![Monotype::number()], Monotype::RowEmpty, Monotype::number());
        let f2 = Monotype::function(
            vec![Monotype::number(), Monotype::string()],
            Monotype::RowEmpty,
            Monotype::number(),
        );
        assert!(unify(&f1, &f2, Span::at(0), &mut gen_).is_err());
    }

    #[test]
    fn rows_unify_regardless_of_label_order() {
        let mut gen_ = VarGen::new();
        let row1 = row_from_fields(
            vec![("x".to_string(), Monotype::number()), ("y".to_string(), Monotype::string())],
            Monotype::RowEmpty,
        );
        let row2 = row_from_fields(
            vec![("y".to_string(), Monotype::string()), ("x".to_string(), Monotype::number())],
            Monotype::RowEmpty,
        );
        let subst = unify(&row1, &row2, Span::at(0), &mut gen_).unwrap();
        assert!(subst.is_empty());
    }

    #[test]
    fn closed_row_missing_a_label_is_an_error() {
        let mut gen_ = VarGen::new();
        let row1 = row_from_fields(vec![("x".to_string(), Monotype::number())], Monotype::RowEmpty);
        let row2 = row_from_fields(vec![("y".to_string(), Monotype::string())], Monotype::RowEmpty);
        assert!(unify(&row1, &row2, Span::at(0), &mut gen_).is_err());
    }

    #[test]
    fn open_row_extends_to_match_a_missing_label() {
        let mut gen_ = VarGen::new();
        let tail_var = gen_.fresh_kind(Kind::Row);
        let open_row = row_from_fields(vec![("x".to_string(), Monotype::number())], Monotype::Var(tail_var));
        let closed_row = row_from_fields(
            vec![("x".to_string(), Monotype::number()), ("y".to_string(), Monotype::string())],
            Monotype::RowEmpty,
        );
        let subst = unify(&open_row, &closed_row, Span::at(0), &mut gen_).unwrap();
        assert_eq!(subst.apply(&open_row), closed_row);
    }
}
