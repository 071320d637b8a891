//! # rill-infer
//!
//! Hindley-Milner type inference, extended with row-polymorphic records
//! and algebraic effect rows, for a small Lisp-family language that
//! compiles to an ECMAScript-family runtime.
//!
//! This crate is the inference core only: a reader/desugarer upstream
//! turns concrete syntax into [`ast::Expr`], and codegen downstream
//! consumes the solved types this crate produces. Neither belongs here.
//!
//! ## Pipeline
//!
//! 1. [`infer::Generator`] walks an expression, emitting [`constraint::Constraint`]s
//!    and [`constraint::Assumption`]s about names it can't resolve alone.
//! 2. [`module::check_module`] partitions those assumptions against other
//!    definitions in the same module and an [`env::ExternalEnv`], turning
//!    each into an `ImplicitInstance` or `ExplicitInstance` constraint.
//! 3. [`solver::solve`] resolves the whole constraint set to a substitution.
//!
//! ## Example
//!
//! ```
//! use rill_infer::ast::{Expr, Literal};
//! use rill_infer::env::ExternalEnv;
//! use rill_infer::alias::AliasTable;
//! use rill_infer::module::{check_module, Definition};
//! use rill_infer::solver::InferenceOptions;
//! use rill_infer::span::Span;
//!
//! let defs = vec![Definition {
//!     name: "answer".to_string(),
//!     expr: Expr::Literal { value: Literal::Number(42.0), span: Span::at(0) },
//! }];
//! let result = check_module(&defs, &ExternalEnv::new(), &AliasTable::new(), InferenceOptions::default())
//!     .expect("inference succeeds");
//! assert_eq!(result.schemes["answer"].ty.to_string(), "number");
//! ```

#![warn(missing_docs, rust_2018_idioms)]

/// Type alias declarations: cycle detection and expansion.
pub mod alias;
/// Surface type annotations and their resolution to monotypes.
pub mod annotation;
/// The parsed expression tree this crate infers types for.
pub mod ast;
/// Constraint kinds emitted by the generator and consumed by the solver.
pub mod constraint;
/// Externally-supplied bindings and aliases a module is checked against.
pub mod env;
/// Inference errors.
pub mod error;
/// Constraint generation: the structural walk from expressions to types.
pub mod infer;
/// The module driver: assumption partitioning, solving, reporting.
pub mod module;
/// Source spans carried through the typed tree for error reporting.
pub mod span;
/// The constraint solver.
pub mod solver;
/// The type algebra: monotypes, schemes, substitutions, unification, rows.
pub mod types;

pub use error::{Error, Result};
