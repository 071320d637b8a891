//! Row construction and the rewrite rule used to unify rows whose labels
//! appear in different orders.
//!
//! Rows are represented directly as `Monotype::RowEmpty` /
//! `Monotype::RowExt` rather than as a separate `Row` struct with a
//! `HashMap` of fields — a row is just a type, and unification treats it
//! like one. This module holds the small amount of row-specific logic:
//! building a row from a label list, reading one back out, and the
//! "bring a label to the head" rewrite that [`super::unify`] uses to line
//! up two rows whose labels were generated in different orders.

use super::{Kind, Monotype, TypeVar, VarGen};

/// Builds a row `{:l1 t1 :l2 t2 … | tail}` from a field list and a tail.
/// `tail` is `Monotype::RowEmpty` for a closed row, or a row variable for
/// one left open for further extension.
pub fn row_from_fields(fields: Vec<(String, Monotype)>, tail: Monotype) -> Monotype {
    fields.into_iter().rev().fold(tail, |tail, (label, field_type)| Monotype::RowExt {
        label,
        field_type: Box::new(field_type),
        tail: Box::new(tail),
    })
}

/// Builds an effect row `(lbl1 lbl2 … | tail)` — each label's field type is
/// `void` since effect rows track only which effects are performed, not a
/// payload type.
pub fn effect_row_from_labels(labels: Vec<String>, tail: Monotype) -> Monotype {
    row_from_fields(labels.into_iter().map(|l| (l, Monotype::void())).collect(), tail)
}

/// Walks a row's `RowExt` spine, returning `(fields, tail)` where `tail` is
/// `RowEmpty` for a closed row or whatever non-row-literal type terminates
/// it (normally a `Var`).
pub fn decompose_row(row: &Monotype) -> (Vec<(String, Monotype)>, Monotype) {
    let mut fields = Vec::new();
    let mut cur = row;
    loop {
        match cur {
            Monotype::RowExt { label, field_type, tail } => {
                fields.push((label.clone(), (**field_type).clone()));
                cur = tail;
            }
            other => return (fields, other.clone()),
        }
    }
}

/// True if this row is closed: its spine terminates in `RowEmpty` rather
/// than a variable. A closed row rejects further extension —
/// `row-label-missing` is raised when an update tries to open one.
pub fn is_closed(row: &Monotype) -> bool {
    matches!(decompose_row(row).1, Monotype::RowEmpty)
}

/// The result of searching a row's spine for a label.
pub enum RowRewrite {
    /// The label was found at the head already; `field_type` and `rest`
    /// (the row with that one entry removed) are returned directly.
    AtHead { field_type: Monotype, rest: Monotype },
    /// The label was found further down the spine. `prefix` holds the
    /// entries that came before it, in order; rebuild the row as
    /// `row_from_fields(prefix, rest)` once the matched field has been
    /// unified, to restore the original label order minus the match.
    Found { field_type: Monotype, prefix: Vec<(String, Monotype)>, rest: Monotype },
    /// The label does not appear anywhere in the row's closed spine.
    Missing,
    /// The row's spine ends in a variable before the label was found: the
    /// label may or may not be present once that variable is solved.
    /// Unification extends the tail with a fresh row ending in a fresh
    /// field, per the Rémy row rule.
    OpenTail { tail_var: TypeVar },
}

/// Searches `row` for `label`, per the row-unification rewrite rule: a
/// label not at the head is brought to the head by peeling off and
/// remembering the entries in front of it, so the two matching fields can
/// be unified directly and the remaining tails unified against each other.
pub fn find_label(row: &Monotype, label: &str) -> RowRewrite {
    let mut prefix = Vec::new();
    let mut cur = row;
    loop {
        match cur {
            Monotype::RowExt { label: l, field_type, tail } if l == label => {
                return if prefix.is_empty() {
                    RowRewrite::AtHead { field_type: (**field_type).clone(), rest: (**tail).clone() }
                } else {
                    RowRewrite::Found {
                        field_type: (**field_type).clone(),
                        prefix,
                        rest: (**tail).clone(),
                    }
                };
            }
            Monotype::RowExt { label: l, field_type, tail } => {
                prefix.push((l.clone(), (**field_type).clone()));
                cur = tail;
            }
            Monotype::RowEmpty => return RowRewrite::Missing,
            Monotype::Var(v) => return RowRewrite::OpenTail { tail_var: v.clone() },
            _ => return RowRewrite::Missing,
        }
    }
}

/// Rebuilds a row from the `prefix`/`rest` pieces of a [`RowRewrite::Found`]
/// match, restoring every label except the one that was matched and
/// unified separately.
pub fn rebuild_without_match(prefix: Vec<(String, Monotype)>, rest: Monotype) -> Monotype {
    row_from_fields(prefix, rest)
}

/// Extends an open tail with a fresh field for `label`, used when
/// unification finds the label missing but the opposing row's tail is
/// still an unsolved variable (so the field might legally belong there).
/// Returns the fresh field's type and the new, still-open tail variable
/// for the remainder.
pub fn extend_open_tail(gen_: &mut VarGen, label: &str, field_kind: Kind) -> (Monotype, Monotype, TypeVar) {
    let field_type = Monotype::Var(gen_.fresh_kind(field_kind));
    let new_tail_var = gen_.fresh_kind(Kind::Row);
    let new_tail = Monotype::Var(new_tail_var.clone());
    let extended = Monotype::RowExt {
        label: label.to_string(),
        field_type: Box::new(field_type.clone()),
        tail: Box::new(new_tail.clone()),
    };
    (field_type, extended, new_tail_var)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_row(fields: &[(&str, Monotype)]) -> Monotype {
        row_from_fields(
            fields.iter().map(|(l, t)| (l.to_string(), t.clone())).collect(),
            Monotype::RowEmpty,
        )
    }

    #[test]
    fn decompose_recovers_fields_in_order() {
        let row = closed_row(&[("x", Monotype::number()), ("y", Monotype::string())]);
        let (fields, tail) = decompose_row(&row);
        assert_eq!(fields, vec![("x".to_string(), Monotype::number()), ("y".to_string(), Monotype::string())]);
        assert_eq!(tail, Monotype::RowEmpty);
        assert!(is_closed(&row));
    }

    #[test]
    fn find_label_at_head_has_no_prefix() {
        let row = closed_row(&[("x", Monotype::number())]);
        match find_label(&row, "x") {
            RowRewrite::AtHead { field_type, .. } => assert_eq!(field_type, Monotype::number()),
            _ => panic!("expected AtHead"),
        }
    }

    #[test]
    fn find_label_deeper_reports_prefix() {
        let row = closed_row(&[("x", Monotype::number()), ("y", Monotype::string())]);
        match find_label(&row, "y") {
            RowRewrite::Found { field_type, prefix, rest } => {
                assert_eq!(field_type, Monotype::string());
                assert_eq!(prefix, vec![("x".to_string(), Monotype::number())]);
                assert_eq!(rest, Monotype::RowEmpty);
            }
            _ => panic!("expected Found"),
        }
    }

    #[test]
    fn find_label_missing_on_closed_row() {
        let row = closed_row(&[("x", Monotype::number())]);
        assert!(matches!(find_label(&row, "z"), RowRewrite::Missing));
    }

    #[test]
    fn find_label_open_tail_defers() {
        let mut gen_ = VarGen::new();
        let tail = Monotype::Var(gen_.fresh_kind(Kind::Row));
        let row = row_from_fields(vec![("x".to_string(), Monotype::number())], tail);
        assert!(matches!(find_label(&row, "z"), RowRewrite::OpenTail { .. }));
    }
}
