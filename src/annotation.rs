//! Resolving a surface type annotation to a [`Monotype`].
//!
//! Re-exports [`crate::ast::Annotation`] as the type this module works
//! over, so alias expansion (which only ever rewrites annotations, never
//! monotypes) and resolution can both live close to the wildcard-handling
//! rule they share.

pub use crate::ast::Annotation;
use crate::types::{Kind, Monotype, TypeVar, VarGen};
use std::collections::HashMap;

/// Resolves one annotation to a monotype.
///
/// `_` is a wildcard: each occurrence gets its own fresh, unconstrained
/// variable. `_name` is a named wildcard: every occurrence of the same
/// `_name` within one call to [`resolve`] shares one fresh variable,
/// tracked in `named_wildcards`, so `(-> _a _a)` means "some type, used
/// twice" rather than two unrelated types. Both kinds of wildcard produce
/// ordinary generated variables, not `user_specified` ones — they stand
/// for "don't care", not for a name the programmer is pinning down.
///
/// Every other named reference becomes a `user_specified` variable if it
/// isn't a known constant, so it can't later be generalized wider than
/// what was written (see [`crate::types::Scheme::generalize`]).
pub fn resolve(annotation: &Annotation, gen_: &mut VarGen) -> Monotype {
    let mut named_wildcards = HashMap::new();
    resolve_with(annotation, gen_, &mut named_wildcards, &mut HashMap::new())
}

fn resolve_with(
    annotation: &Annotation,
    gen_: &mut VarGen,
    named_wildcards: &mut HashMap<String, TypeVar>,
    user_vars: &mut HashMap<String, TypeVar>,
) -> Monotype {
    match annotation {
        Annotation::Named(name) => match name.as_str() {
            "number" => Monotype::number(),
            "string" => Monotype::string(),
            "boolean" => Monotype::boolean(),
            "void" => Monotype::void(),
            _ => {
                let var = user_vars
                    .entry(name.clone())
                    .or_insert_with(|| gen_.fresh_named(name.clone(), Kind::Value))
                    .clone();
                Monotype::Var(var)
            }
        },
        Annotation::Wildcard => Monotype::Var(gen_.fresh()),
        Annotation::NamedWildcard(name) => {
            let var = named_wildcards.entry(name.clone()).or_insert_with(|| gen_.fresh_kind(Kind::Value)).clone();
            Monotype::Var(var)
        }
        Annotation::Function { params, effect, result } => {
            let params = params.iter().map(|p| resolve_with(p, gen_, named_wildcards, user_vars)).collect();
            let effect = resolve_with(effect, gen_, named_wildcards, user_vars);
            let result = resolve_with(result, gen_, named_wildcards, user_vars);
            Monotype::function(params, effect, result)
        }
        Annotation::Vector(elem) => Monotype::vector(resolve_with(elem, gen_, named_wildcards, user_vars)),
        Annotation::Record { fields, tail } => {
            Monotype::record(resolve_row(fields, tail, gen_, named_wildcards, user_vars))
        }
        Annotation::Variant { fields, tail } => {
            Monotype::variant(resolve_row(fields, tail, gen_, named_wildcards, user_vars))
        }
        Annotation::Effect { labels, tail } => {
            let fields: Vec<(String, Annotation)> =
                labels.iter().map(|l| (l.clone(), Annotation::Named("void".to_string()))).collect();
            Monotype::effect(resolve_row(&fields, tail, gen_, named_wildcards, user_vars))
        }
    }
}

fn resolve_row(
    fields: &[(String, Annotation)],
    tail: &Option<Box<Annotation>>,
    gen_: &mut VarGen,
    named_wildcards: &mut HashMap<String, TypeVar>,
    user_vars: &mut HashMap<String, TypeVar>,
) -> Monotype {
    let tail_ty = match tail {
        Some(t) => resolve_with(t, gen_, named_wildcards, user_vars),
        None => Monotype::RowEmpty,
    };
    fields.iter().rev().fold(tail_ty, |tail, (label, field_annotation)| Monotype::RowExt {
        label: label.clone(),
        field_type: Box::new(resolve_with(field_annotation, gen_, named_wildcards, user_vars)),
        tail: Box::new(tail),
    })
}
