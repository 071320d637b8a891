//! Module-level inference tests.
//!
//! Exercises `check_module` end to end: literals, lambdas, records,
//! effects, and let-polymorphism, the way a caller outside the crate
//! would actually drive it.

use rill_infer::alias::AliasTable;
use rill_infer::ast::{Annotation, Binding, Expr, Literal};
use rill_infer::env::ExternalEnv;
use rill_infer::module::{check_module, Definition};
use rill_infer::solver::InferenceOptions;
use rill_infer::span::Span;
use rill_infer::types::{Monotype, Scheme};

fn lit_num(n: f64) -> Expr {
    Expr::Literal { value: Literal::Number(n), span: Span::at(0) }
}

fn var(name: &str) -> Expr {
    Expr::Variable { name: name.to_string(), span: Span::at(0) }
}

#[test]
fn literal_definitions_infer_their_constant_type() {
    let defs = vec![
        Definition { name: "n".to_string(), expr: lit_num(1.0) },
        Definition { name: "s".to_string(), expr: Expr::Literal { value: Literal::String("hi".to_string()), span: Span::at(0) } },
    ];
    let result = check_module(&defs, &ExternalEnv::new(), &AliasTable::new(), InferenceOptions::default()).unwrap();
    assert_eq!(result.schemes["n"].ty, Monotype::number());
    assert_eq!(result.schemes["s"].ty, Monotype::string());
}

#[test]
fn the_identity_function_is_generalized_over_its_parameter() {
    let defs = vec![Definition {
        name: "identity".to_string(),
        expr: Expr::Lambda {
            params: vec![Binding { name: "x".to_string(), annotation: None, span: Span::at(0) }],
            body: Box::new(var("x")),
            span: Span::at(0),
        },
    }];
    let result = check_module(&defs, &ExternalEnv::new(), &AliasTable::new(), InferenceOptions::default()).unwrap();
    let scheme = &result.schemes["identity"];
    assert_eq!(scheme.vars.len(), 1, "identity should be polymorphic in its argument: {}", scheme.ty);
    let (params, _, ret) = scheme.ty.as_function().unwrap();
    assert_eq!(&params[0], ret);
}

#[test]
fn a_let_bound_identity_is_used_polymorphically() {
    // (let ((id (lambda (x) x))) (id 1))
    let id_lambda = Expr::Lambda {
        params: vec![Binding { name: "x".to_string(), annotation: None, span: Span::at(0) }],
        body: Box::new(var("x")),
        span: Span::at(0),
    };
    let body = Expr::Call { function: Box::new(var("id")), args: vec![lit_num(1.0)], span: Span::at(0) };
    let defs = vec![Definition {
        name: "result".to_string(),
        expr: Expr::Let {
            bindings: vec![(Binding { name: "id".to_string(), annotation: None, span: Span::at(0) }, id_lambda)],
            body: Box::new(body),
            span: Span::at(0),
        },
    }];
    let result = check_module(&defs, &ExternalEnv::new(), &AliasTable::new(), InferenceOptions::default()).unwrap();
    assert_eq!(result.schemes["result"].ty, Monotype::number());
}

#[test]
fn records_are_inferred_as_closed_rows() {
    let defs = vec![Definition {
        name: "point".to_string(),
        expr: Expr::Record {
            fields: vec![("x".to_string(), lit_num(1.0)), ("y".to_string(), lit_num(2.0))],
            span: Span::at(0),
        },
    }];
    let result = check_module(&defs, &ExternalEnv::new(), &AliasTable::new(), InferenceOptions::default()).unwrap();
    assert_eq!(result.schemes["point"].ty.to_string(), "{:x number :y number}");
}

#[test]
fn an_annotation_pins_a_binding_to_the_written_type() {
    let defs = vec![Definition {
        name: "one".to_string(),
        expr: Expr::Annotated {
            annotation: Annotation::Named("number".to_string()),
            expr: Box::new(lit_num(1.0)),
            span: Span::at(0),
        },
    }];
    let result = check_module(&defs, &ExternalEnv::new(), &AliasTable::new(), InferenceOptions::default()).unwrap();
    assert_eq!(result.schemes["one"].ty, Monotype::number());
}

#[test]
fn an_annotation_mismatch_is_a_type_error() {
    let defs = vec![Definition {
        name: "broken".to_string(),
        expr: Expr::Annotated {
            annotation: Annotation::Named("string".to_string()),
            expr: Box::new(lit_num(1.0)),
            span: Span::at(0),
        },
    }];
    let result = check_module(&defs, &ExternalEnv::new(), &AliasTable::new(), InferenceOptions::default());
    assert!(result.is_err());
}

#[test]
fn external_bindings_resolve_free_references() {
    let mut env = ExternalEnv::new();
    env.bind("pi", Scheme::monomorphic(Monotype::number()));
    let defs = vec![Definition { name: "tau".to_string(), expr: var("pi") }];
    let result = check_module(&defs, &env, &AliasTable::new(), InferenceOptions::default()).unwrap();
    assert_eq!(result.schemes["tau"].ty, Monotype::number());
}

#[test]
fn mutually_recursive_definitions_type_check_together() {
    let is_even = Expr::If {
        cond: Box::new(var("base_case")),
        then_branch: Box::new(Expr::Literal { value: Literal::Boolean(true), span: Span::at(0) }),
        else_branch: Box::new(var("is_odd")),
        span: Span::at(0),
    };
    let defs = vec![
        Definition { name: "is_even".to_string(), expr: is_even },
        Definition { name: "is_odd".to_string(), expr: Expr::Literal { value: Literal::Boolean(false), span: Span::at(0) } },
        Definition { name: "base_case".to_string(), expr: Expr::Literal { value: Literal::Boolean(true), span: Span::at(0) } },
    ];
    let result = check_module(&defs, &ExternalEnv::new(), &AliasTable::new(), InferenceOptions::default()).unwrap();
    assert_eq!(result.schemes["is_even"].ty, Monotype::boolean());
}
