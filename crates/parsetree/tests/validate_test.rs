//! Whole-tree validation

use parsetree::validate::{validate_phrase, validate_structure};
use parsetree::{
    ArgLabel, Case, Constant, DirectiveArgument, Error, Expression, ExpressionDesc, FileId,
    Located, Location, Longident, Node, Pattern, PhraseMode, Position, StructureItem,
    ToplevelPhrase, ValidateConfig, Validator, ViolationKind, Visitor,
};
use rstest::rstest;
use tracing_subscriber::EnvFilter;

/// Route validator events to the test harness; `RUST_LOG=parsetree=trace`
/// shows each violation as it is found.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn at(file: u32, start: u32, end: u32) -> Location {
    Location::new(
        FileId(file),
        Position::new(1, start + 1, start),
        Position::new(1, end + 1, end),
    )
}

fn int(n: i64, loc: Location) -> Expression {
    Expression::constant(loc, Constant::Int(n))
}

fn kinds(result: parsetree::Result<()>) -> Vec<ViolationKind> {
    match result {
        Ok(()) => Vec::new(),
        Err(Error::Validation(violations)) => violations.into_iter().map(|v| v.kind).collect(),
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_well_formed_structure_passes() {
    let e = Expression::if_then_else(
        at(0, 0, 18),
        Expression::ident(at(0, 3, 4), Longident::ident("x")),
        int(1, at(0, 10, 11)),
        Some(int(2, at(0, 17, 18))),
    );
    let structure = vec![StructureItem::eval(at(0, 0, 18), e)];
    assert!(validate_structure(&structure, &ValidateConfig::default()).is_ok());
}

#[test]
fn test_child_from_another_file() {
    init_tracing();
    let e = Expression::lazy(at(0, 0, 6), int(1, at(1, 5, 6)));
    let structure = vec![StructureItem::eval(at(0, 0, 6), e)];
    assert_eq!(
        kinds(validate_structure(&structure, &ValidateConfig::default())),
        vec![ViolationKind::ForeignFile]
    );
}

#[test]
fn test_nesting_check_can_be_disabled() {
    let e = Expression::lazy(at(0, 0, 6), int(1, at(0, 5, 40)));
    let structure = vec![StructureItem::eval(at(0, 0, 6), e)];
    let strict = ValidateConfig::default();
    let relaxed = ValidateConfig {
        check_nesting: false,
        ..ValidateConfig::default()
    };
    assert_eq!(kinds(validate_structure(&structure, &strict)).len(), 1);
    assert!(validate_structure(&structure, &relaxed).is_ok());
}

#[test]
fn test_violation_path_names_the_item() {
    init_tracing();
    let e = Expression::lazy(at(0, 0, 6), int(1, at(0, 5, 40)));
    let structure = vec![
        StructureItem::eval(at(0, 0, 6), int(0, at(0, 0, 1))),
        StructureItem::eval(at(0, 0, 6), e),
    ];
    let config = ValidateConfig::default();
    let mut validator = Validator::new(&config);
    validator.traverse_structure(&structure);
    let violations = validator.into_violations();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, "1/Eval/Lazy/Constant");
    assert_eq!(violations[0].loc, at(0, 5, 40));
}

#[rstest]
#[case(PhraseMode::Batch, 1)]
#[case(PhraseMode::Interactive, 0)]
fn test_directives_depend_on_mode(#[case] mode: PhraseMode, #[case] expected: usize) {
    let phrase = ToplevelPhrase::directive(
        at(0, 0, 12),
        "use",
        DirectiveArgument::String {
            value: "a.ml".into(),
        },
    );
    let config = ValidateConfig {
        mode,
        ..ValidateConfig::default()
    };
    let found = kinds(validate_phrase(&phrase, &config));
    assert_eq!(found.len(), expected);
    if expected > 0 {
        assert_eq!(
            found[0],
            ViolationKind::DirectiveInBatch {
                name: "use".into()
            }
        );
    }
}

#[test]
fn test_definitions_are_accepted_in_batch_mode() {
    let phrase = ToplevelPhrase::definitions(vec![StructureItem::eval(at(0, 0, 1), int(1, at(0, 0, 1)))]);
    assert!(validate_phrase(&phrase, &ValidateConfig::default()).is_ok());
}

#[test]
fn test_default_on_labelled_parameter_read_from_json() {
    // fun ~x:(x = 0) -> x, which the builders refuse
    let body = Expression::ident(at(0, 17, 18), Longident::ident("x"));
    let case = Case::new(Pattern::var(Located::new("x".into(), at(0, 9, 10))), body);
    let fun = Expression::function(at(0, 0, 18), ArgLabel::labelled("x"), None, vec![case])
        .unwrap();
    let mut json = serde_json::to_value(&fun).unwrap();
    json["desc"]["default"] = serde_json::to_value(int(0, at(0, 13, 14))).unwrap();
    let fun: Expression = serde_json::from_value(json).unwrap();

    let structure = vec![StructureItem::eval(at(0, 0, 18), fun)];
    assert_eq!(
        kinds(validate_structure(&structure, &ValidateConfig::default())),
        vec![ViolationKind::DefaultWithoutOptionalLabel {
            label: "~x".into()
        }]
    );
}

#[test]
fn test_assert_of_false_literal_is_reported() {
    let false_lit = Expression::construct(
        at(0, 7, 12),
        Located::new(Longident::ident("false"), at(0, 7, 12)),
        None,
        false,
    );
    let assert = Node::new(
        ExpressionDesc::Assert {
            cond: Box::new(false_lit),
        },
        at(0, 0, 12),
    );
    let structure = vec![StructureItem::eval(at(0, 0, 12), assert)];
    assert_eq!(
        kinds(validate_structure(&structure, &ValidateConfig::default())),
        vec![ViolationKind::NonCanonicalAssertFalse]
    );

    let canonical = vec![StructureItem::eval(at(0, 0, 12), Expression::assert_false(at(0, 0, 12)))];
    assert!(validate_structure(&canonical, &ValidateConfig::default()).is_ok());
}

#[test]
fn test_violations_serialize_for_reports() {
    let e = Expression::lazy(at(0, 0, 6), int(1, at(1, 5, 6)));
    let config = ValidateConfig::default();
    let mut validator = Validator::new(&config);
    validator.traverse_structure(&[StructureItem::eval(at(0, 0, 6), e)]);
    let json = serde_json::to_value(validator.violations()).unwrap();
    assert_eq!(json[0]["kind"]["kind"], "ForeignFile");
}
