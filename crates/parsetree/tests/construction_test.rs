//! Shape invariants enforced by the construction helpers

use parsetree::core_type::{RowBound, RowField};
use parsetree::module::FunctorParam;
use parsetree::{
    ArgLabel, Case, Constant, CoreType, CoreTypeDesc, Error, Expression, ExpressionDesc, FileId,
    Located, Location, Longident, ModuleExpr, ModuleExprDesc, Pattern, PatternDesc, Position,
    RecFlag, StructureItem, TypeConstraint, ValueBinding,
};
use rstest::rstest;

fn span(start: u32, end: u32) -> Location {
    Location::new(
        FileId(0),
        Position::new(1, start + 1, start),
        Position::new(1, end + 1, end),
    )
}

fn lid(name: &str, loc: Location) -> Located<Longident> {
    Located::new(Longident::ident(name), loc)
}

fn int(n: i64, loc: Location) -> Expression {
    Expression::constant(loc, Constant::Int(n))
}

fn var(name: &str, loc: Location) -> Pattern {
    Pattern::var(Located::new(name.to_string(), loc))
}

fn arity_error(err: Error) -> (&'static str, usize) {
    match err {
        Error::TupleArity { layer, found } => (layer, found),
        other => panic!("expected a tuple arity error, got {other}"),
    }
}

// =============================================================================
// Tuples
// =============================================================================

#[rstest]
#[case(0)]
#[case(1)]
fn test_short_tuples_are_refused_in_every_layer(#[case] len: usize) {
    let types = (0..len).map(|i| CoreType::var(span(0, 1), format!("a{i}"))).collect();
    let patterns = (0..len).map(|i| var(&format!("x{i}"), span(0, 1))).collect();
    let exprs = (0..len).map(|i| int(i as i64, span(0, 1))).collect();

    let ty = CoreType::tuple(span(0, 1), types).unwrap_err();
    let pat = Pattern::tuple(span(0, 1), patterns).unwrap_err();
    let expr = Expression::tuple(span(0, 1), exprs).unwrap_err();

    assert_eq!(arity_error(ty), ("type", len));
    assert_eq!(arity_error(pat), ("pattern", len));
    assert_eq!(arity_error(expr), ("expression", len));
}

#[rstest]
#[case(2)]
#[case(5)]
fn test_tuples_keep_component_order(#[case] len: usize) {
    let exprs: Vec<Expression> = (0..len).map(|i| int(i as i64, span(0, 1))).collect();
    let tuple = Expression::tuple(span(0, 1), exprs.clone()).unwrap();
    match tuple.desc {
        ExpressionDesc::Tuple { elements } => assert_eq!(elements.into_vec(), exprs),
        other => panic!("expected a tuple, got {other:?}"),
    }
}

// =============================================================================
// Type constraints
// =============================================================================

#[test]
fn test_constraint_needs_a_type() {
    let err = TypeConstraint::from_parts(None, None).unwrap_err();
    assert!(matches!(err, Error::EmptyConstraint));
}

#[rstest]
#[case(true, false, "Annotation")]
#[case(false, true, "Coercion")]
#[case(true, true, "AnnotatedCoercion")]
fn test_constraint_forms(#[case] annotated: bool, #[case] coerced: bool, #[case] kind: &str) {
    use parsetree::VariantSet;

    let ty = |name: &str| CoreType::constr(span(0, 1), lid(name, span(0, 1)), vec![]);
    let annotation = annotated.then(|| ty("t0"));
    let coercion = coerced.then(|| ty("t"));
    let constraint = TypeConstraint::from_parts(annotation.clone(), coercion.clone()).unwrap();

    assert_eq!(constraint.variant_name(), kind);
    assert_eq!(constraint.parts(), (annotation.as_ref(), coercion.as_ref()));
}

// =============================================================================
// Clause lists and bindings
// =============================================================================

#[test]
fn test_empty_clause_lists_are_refused() {
    let scrutinee = int(0, span(6, 7));
    let err = Expression::match_(span(0, 7), scrutinee, vec![]).unwrap_err();
    assert!(matches!(err, Error::EmptyCases { construct: "match" }));

    let err = Expression::function(span(0, 8), ArgLabel::Nolabel, None, vec![]).unwrap_err();
    assert!(matches!(err, Error::EmptyCases { construct: "function" }));
}

#[test]
fn test_empty_let_is_refused() {
    let err = Expression::let_(span(0, 10), RecFlag::Recursive, vec![], int(0, span(9, 10)))
        .unwrap_err();
    assert!(matches!(err, Error::EmptySequence { .. }));

    let err = StructureItem::value(span(0, 10), RecFlag::Nonrecursive, vec![]).unwrap_err();
    assert!(matches!(err, Error::EmptySequence { .. }));
}

#[test]
fn test_default_requires_optional_label() {
    let body = int(1, span(12, 13));
    let err = Expression::fun(
        span(0, 13),
        ArgLabel::labelled("x"),
        Some(int(0, span(6, 7))),
        var("x", span(3, 4)),
        body.clone(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::DefaultWithoutOptionalLabel { .. }));

    let ok = Expression::fun(
        span(0, 13),
        ArgLabel::optional("x"),
        Some(int(0, span(6, 7))),
        var("x", span(3, 4)),
        body,
    );
    assert!(ok.is_ok());
}

#[test]
fn test_guard_stays_on_its_clause() {
    let guard = Expression::ident(span(10, 11), Longident::ident("ok"));
    let case = Case::guarded(var("x", span(0, 1)), guard.clone(), int(1, span(15, 16)));
    let m = Expression::match_(span(0, 16), int(0, span(6, 7)), vec![case]).unwrap();
    let cases = m.cases().unwrap();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].guard.as_ref(), Some(&guard));
}

#[test]
fn test_let_binding_order_is_preserved() {
    let b1 = ValueBinding::new(span(4, 9), var("a", span(4, 5)), int(1, span(8, 9)));
    let b2 = ValueBinding::new(span(14, 19), var("b", span(14, 15)), int(2, span(18, 19)));
    let e = Expression::let_(
        span(0, 24),
        RecFlag::Recursive,
        vec![b1.clone(), b2.clone()],
        int(3, span(23, 24)),
    )
    .unwrap();
    match e.desc {
        ExpressionDesc::Let { rec_flag, bindings, .. } => {
            assert_eq!(rec_flag, RecFlag::Recursive);
            assert_eq!(bindings.into_vec(), vec![b1, b2]);
        }
        other => panic!("expected a let, got {other:?}"),
    }
}

// =============================================================================
// assert false
// =============================================================================

#[test]
fn test_assert_false_is_canonical() {
    let false_lit = Expression::construct(span(7, 12), lid("false", span(7, 12)), None, false);
    let e = Expression::assert_(span(0, 12), false_lit);
    assert_eq!(e.desc, ExpressionDesc::AssertFalse);

    let cond = Expression::ident(span(7, 8), Longident::ident("b"));
    let e = Expression::assert_(span(0, 8), cond);
    assert!(matches!(e.desc, ExpressionDesc::Assert { .. }));
}

// =============================================================================
// Polymorphic variant rows
// =============================================================================

#[test]
fn test_row_bounds_stay_distinct() {
    let fields = || {
        vec![
            RowField::tag("A", true, vec![]),
            RowField::tag("B", true, vec![]),
        ]
    };
    let exact = CoreType::variant(span(0, 12), fields(), true, None);
    let open = CoreType::variant(span(0, 12), fields(), false, None);
    let upper = CoreType::variant(span(0, 12), fields(), true, Some(vec![]));
    let filtered = CoreType::variant(span(0, 16), fields(), true, Some(vec!["A".to_string()]));

    assert_eq!(exact.row_bound(), Some(RowBound::Exact));
    assert_eq!(open.row_bound(), Some(RowBound::Open));
    assert_eq!(upper.row_bound(), Some(RowBound::UpperBound));
    assert_eq!(
        filtered.row_bound(),
        Some(RowBound::UpperAndLower(&["A".to_string()]))
    );

    let samples = [exact, open, upper, filtered];
    for (i, ty) in samples.iter().enumerate() {
        let back: CoreType = serde_json::from_str(&serde_json::to_string(ty).unwrap()).unwrap();
        assert_eq!(&back, ty);
        assert_eq!(back.row_bound(), ty.row_bound());
        for other in &samples[i + 1..] {
            assert_ne!(back.row_bound(), other.row_bound());
        }
    }
}

#[test]
fn test_non_variant_types_have_no_row_bound() {
    assert_eq!(CoreType::any(span(0, 1)).row_bound(), None);
    assert!(matches!(CoreType::any(span(0, 1)).desc, CoreTypeDesc::Any));
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_if_then_else_children() {
    // if x then 1 else 2
    let x = Expression::ident(span(3, 4), Longident::ident("x"));
    let e = Expression::if_then_else(
        span(0, 18),
        x.clone(),
        int(1, span(10, 11)),
        Some(int(2, span(17, 18))),
    );
    match e.desc {
        ExpressionDesc::IfThenElse {
            cond,
            then_branch,
            else_branch,
        } => {
            assert_eq!(*cond, x);
            assert!(matches!(
                then_branch.desc,
                ExpressionDesc::Constant { constant: Constant::Int(1) }
            ));
            let else_branch = else_branch.expect("else branch");
            assert!(matches!(
                else_branch.desc,
                ExpressionDesc::Constant { constant: Constant::Int(2) }
            ));
        }
        other => panic!("expected IfThenElse, got {other:?}"),
    }
}

#[test]
fn test_constructor_pattern_with_two_arguments() {
    // C (p1, p2)
    let p1 = var("p1", span(3, 5));
    let p2 = var("p2", span(7, 9));
    let p = Pattern::construct_args(span(0, 10), lid("C", span(0, 1)), vec![p1.clone(), p2.clone()]);
    match p.desc {
        PatternDesc::Construct {
            lid,
            arg: Some(arg),
            explicit_arity,
        } => {
            assert_eq!(lid.txt, Longident::ident("C"));
            assert!(!explicit_arity);
            assert!(arg.loc.ghost);
            assert_eq!(arg.loc.start, span(3, 9).start);
            assert_eq!(arg.loc.end, span(3, 9).end);
            match arg.desc {
                PatternDesc::Tuple { elements } => assert_eq!(elements.into_vec(), vec![p1, p2]),
                other => panic!("expected a tuple argument, got {other:?}"),
            }
        }
        other => panic!("expected Construct, got {other:?}"),
    }
}

#[rstest]
#[case(0, false)]
#[case(1, true)]
fn test_constructor_with_fewer_arguments_has_no_tuple(#[case] n: usize, #[case] has_arg: bool) {
    let args = (0..n).map(|i| var(&format!("p{i}"), span(2, 3))).collect();
    let p = Pattern::construct_args(span(0, 3), lid("C", span(0, 1)), args);
    match p.desc {
        PatternDesc::Construct { arg, .. } => {
            assert_eq!(arg.is_some(), has_arg);
            if let Some(arg) = arg {
                assert!(matches!(arg.desc, PatternDesc::Var { .. }));
            }
        }
        other => panic!("expected Construct, got {other:?}"),
    }
}

// =============================================================================
// Modules
// =============================================================================

#[test]
fn test_multi_parameter_functor_nests() {
    let param = |name: &str, at: u32| -> FunctorParam {
        (Located::new(name.to_string(), span(at, at + 1)), None)
    };
    let body = ModuleExpr::structure(span(20, 30), vec![]);
    let functor = ModuleExpr::curried_functor(
        span(0, 30),
        vec![param("A", 8), param("B", 12)],
        body.clone(),
    )
    .unwrap();

    let ModuleExprDesc::Functor { param: outer, body: inner, .. } = functor.desc else {
        panic!("expected a functor");
    };
    assert_eq!(outer.txt, "A");
    assert_eq!(functor.loc, span(0, 30));
    let ModuleExprDesc::Functor { param: second, body: innermost, .. } = inner.desc else {
        panic!("expected a nested functor");
    };
    assert_eq!(second.txt, "B");
    assert!(inner.loc.ghost);
    assert_eq!(*innermost, body);
}

#[test]
fn test_functor_without_parameters_is_refused() {
    let body = ModuleExpr::structure(span(0, 10), vec![]);
    assert!(ModuleExpr::curried_functor(span(0, 10), vec![], body).is_err());
}
