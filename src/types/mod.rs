//! The type algebra: monotypes, kinds, and the row representation they share.
//!
//! The teacher's `Type` enum has roughly eighteen cases spanning gradual
//! typing, type classes, and a handful of Scheme-specific shapes
//! (`Pair`, `List`, `Bytevector`, …). The design this crate implements is
//! narrower and more uniform: every compound type is either a nullary
//! constant, a saturated application of a constructor, a variable, or a row.
//! Vectors, functions, records, variants, and effects all become `App`
//! nodes over different constructor names instead of dedicated variants —
//! the "tagged dispatch... sum type with exhaustive matching" shape the
//! design calls for, scaled down to four cases.

pub mod row;
pub mod scheme;
pub mod subst;
pub mod unify;
pub mod var;

pub use row::*;
pub use scheme::*;
pub use subst::*;
pub use unify::*;
pub use var::*;

use std::fmt;

/// Well-known constructor names used in `Monotype::App`. Function, vector,
/// record, variant, and effect types are all applications of these.
pub mod ctor {
    /// `App(ARROW, arg1, …, argn, effect, result)` — a function type.
    pub const ARROW: &str = "->";
    /// `App(VECTOR, element)` — a vector type.
    pub const VECTOR: &str = "vector";
    /// `App(RECORD, row)` — a record type over the given row.
    pub const RECORD: &str = "record";
    /// `App(VARIANT, row)` — a variant (sum) type over the given row.
    pub const VARIANT: &str = "variant";
    /// `App(EFFECT, row)` — an effect type: the row of effect labels performed.
    pub const EFFECT: &str = "effect";
    /// `App(VALUES, t1, …, tn)` — the pseudo-type of a multiple-values
    /// producer; only legal directly inside `values`/`multiple-value-bind`.
    pub const VALUES: &str = "values";
}

/// A monotype: a type containing no quantifiers.
///
/// `Constant` and `App` are of kind [`Kind::Value`]; `Var` carries its own
/// kind; `RowEmpty`/`RowExt` are always of kind [`Kind::Row`] and only ever
/// appear inside an `App` whose constructor is `record`, `variant`, or
/// `effect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Monotype {
    /// A nullary type constructor: `number`, `string`, `boolean`, `void`,
    /// or a user-defined named type.
    Constant(String),
    /// A saturated application of a constructor to its operand types.
    App { op: String, args: Vec<Monotype> },
    /// A type variable, either generated fresh or written by the
    /// programmer in an annotation.
    Var(TypeVar),
    /// The closed (empty) row.
    RowEmpty,
    /// `label: field_type` prepended onto `tail`. Kind `Row`.
    RowExt { label: String, field_type: Box<Monotype>, tail: Box<Monotype> },
}

impl Monotype {
    /// The `number` constant.
    pub fn number() -> Self {
        Monotype::Constant("number".to_string())
    }

    /// The `string` constant.
    pub fn string() -> Self {
        Monotype::Constant("string".to_string())
    }

    /// The `boolean` constant.
    pub fn boolean() -> Self {
        Monotype::Constant("boolean".to_string())
    }

    /// The `void` constant.
    pub fn void() -> Self {
        Monotype::Constant("void".to_string())
    }

    /// A user-defined nullary constant, e.g. from an unexpanded type alias
    /// reference or an opaque imported type.
    pub fn named(name: impl Into<String>) -> Self {
        Monotype::Constant(name.into())
    }

    /// Builds a function type `(-> arg1 … argn effect result)`.
    pub fn function(args: Vec<Monotype>, effect: Monotype, result: Monotype) -> Self {
        let mut all = args;
        all.push(effect);
        all.push(result);
        Monotype::App { op: ctor::ARROW.to_string(), args: all }
    }

    /// Decomposes a function type into `(params, effect, result)`.
    pub fn as_function(&self) -> Option<(&[Monotype], &Monotype, &Monotype)> {
        match self {
            Monotype::App { op, args } if op == ctor::ARROW && args.len() >= 2 => {
                let (params, rest) = args.split_at(args.len() - 2);
                Some((params, &rest[0], &rest[1]))
            }
            _ => None,
        }
    }

    /// Builds a vector type `(vector t)`.
    pub fn vector(element: Monotype) -> Self {
        Monotype::App { op: ctor::VECTOR.to_string(), args: vec![element] }
    }

    /// Builds a record type `(record row)`.
    pub fn record(row: Monotype) -> Self {
        Monotype::App { op: ctor::RECORD.to_string(), args: vec![row] }
    }

    /// Builds a variant type `(variant row)`.
    pub fn variant(row: Monotype) -> Self {
        Monotype::App { op: ctor::VARIANT.to_string(), args: vec![row] }
    }

    /// Builds an effect type `(effect row)`.
    pub fn effect(row: Monotype) -> Self {
        Monotype::App { op: ctor::EFFECT.to_string(), args: vec![row] }
    }

    /// Builds a multiple-values pseudo-type over the given result types.
    pub fn values(results: Vec<Monotype>) -> Self {
        Monotype::App { op: ctor::VALUES.to_string(), args: results }
    }

    /// The kind of this monotype: `Row` for the row constructors, `Value`
    /// for everything else (including variables, whose kind is carried on
    /// the variable itself).
    pub fn kind(&self) -> Kind {
        match self {
            Monotype::RowEmpty | Monotype::RowExt { .. } => Kind::Row,
            Monotype::Var(v) => v.kind(),
            _ => Kind::Value,
        }
    }

    /// True if this is a type variable.
    pub fn is_var(&self) -> bool {
        matches!(self, Monotype::Var(_))
    }

    /// Returns true if `var` occurs free anywhere in this type. Used by the
    /// occurs check before a substitution binding is accepted.
    pub fn contains_var(&self, var: &TypeVar) -> bool {
        match self {
            Monotype::Var(v) => v == var,
            Monotype::Constant(_) | Monotype::RowEmpty => false,
            Monotype::App { args, .. } => args.iter().any(|a| a.contains_var(var)),
            Monotype::RowExt { field_type, tail, .. } => {
                field_type.contains_var(var) || tail.contains_var(var)
            }
        }
    }

    /// Collects every free type variable in this type (no quantifiers exist
    /// at the monotype level, so this is simply "every variable").
    pub fn free_vars(&self) -> Vec<TypeVar> {
        let mut out = Vec::new();
        self.collect_free_vars(&mut out);
        out
    }

    fn collect_free_vars(&self, out: &mut Vec<TypeVar>) {
        match self {
            Monotype::Var(v) => {
                if !out.contains(v) {
                    out.push(v.clone());
                }
            }
            Monotype::Constant(_) | Monotype::RowEmpty => {}
            Monotype::App { args, .. } => {
                for a in args {
                    a.collect_free_vars(out);
                }
            }
            Monotype::RowExt { field_type, tail, .. } => {
                field_type.collect_free_vars(out);
                tail.collect_free_vars(out);
            }
        }
    }
}

impl fmt::Display for Monotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Monotype::Constant(name) => write!(f, "{name}"),
            Monotype::Var(v) => write!(f, "{v}"),
            Monotype::RowEmpty => write!(f, "{{}}"),
            Monotype::RowExt { .. } => write!(f, "{{{}}}", format_row_body(self)),
            Monotype::App { op, .. } if op == ctor::ARROW => {
                let (params, effect, result) = self.as_function().expect("checked op");
                write!(f, "(-> ")?;
                for p in params {
                    write!(f, "{p} ")?;
                }
                write!(f, "{effect} {result})")
            }
            Monotype::App { op, args } if op == ctor::VECTOR && args.len() == 1 => {
                write!(f, "[{}]", args[0])
            }
            Monotype::App { op, args } if op == ctor::RECORD && args.len() == 1 => {
                write!(f, "{{{}}}", format_row_body(&args[0]))
            }
            Monotype::App { op, args } if op == ctor::VARIANT && args.len() == 1 => {
                write!(f, "<{}>", format_row_body(&args[0]))
            }
            Monotype::App { op, args } if op == ctor::EFFECT && args.len() == 1 => {
                write!(f, "(effect {})", format_effect_row(&args[0]))
            }
            Monotype::App { op, args } if op == ctor::VALUES => {
                write!(f, "(values")?;
                for a in args {
                    write!(f, " {a}")?;
                }
                write!(f, ")")
            }
            Monotype::App { op, args } => {
                write!(f, "({op}")?;
                for a in args {
                    write!(f, " {a}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Renders a row's body as `:l1 t1 :l2 t2 | tail` (without the enclosing
/// braces), per the wire format.
fn format_row_body(row: &Monotype) -> String {
    let mut fields = Vec::new();
    let mut cur = row;
    loop {
        match cur {
            Monotype::RowExt { label, field_type, tail } => {
                fields.push(format!(":{label} {field_type}"));
                cur = tail;
            }
            Monotype::RowEmpty => break,
            other => {
                fields.push(format!("| {other}"));
                break;
            }
        }
    }
    fields.join(" ")
}

/// Renders an effect row as `lbl1 lbl2 … | tail` (labels only; effect rows
/// carry no field type, by convention their field type is `void`).
fn format_effect_row(row: &Monotype) -> String {
    let mut labels = Vec::new();
    let mut cur = row;
    loop {
        match cur {
            Monotype::RowExt { label, tail, .. } => {
                labels.push(label.clone());
                cur = tail;
            }
            Monotype::RowEmpty => break,
            other => {
                labels.push(format!("| {other}"));
                break;
            }
        }
    }
    labels.join(" ")
}
