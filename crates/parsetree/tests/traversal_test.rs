//! Visitor and mapper behaviour over whole structures

use parsetree::attributes::Attribute;
use parsetree::traversal::{walk_expression, walk_map_expression};
use parsetree::{
    ArgLabel, Constant, Cursor, Expression, ExpressionDesc, Extension, FileId, Located, Location,
    Longident, Mapper, Pattern, Position, RecFlag, StructureItem, ValueBinding, Visitor,
};

fn span(start: u32, end: u32) -> Location {
    Location::new(
        FileId(0),
        Position::new(1, start + 1, start),
        Position::new(1, end + 1, end),
    )
}

fn ident(name: &str, loc: Location) -> Expression {
    Expression::ident(loc, Longident::ident(name))
}

/// Records the cursor path at every identifier expression.
#[derive(Default)]
struct IdentPaths {
    seen: Vec<(String, String)>,
}

impl Visitor for IdentPaths {
    fn visit_expression(&mut self, cursor: &mut Cursor, expr: &Expression) {
        if let ExpressionDesc::Ident { lid } = &expr.desc {
            self.seen.push((lid.txt.last().to_string(), cursor.path()));
        }
        walk_expression(self, cursor, expr);
    }
}

#[test]
fn test_visitor_reports_paths() {
    // f x;;
    // let y = z [@foo w]
    let apply = Expression::apply(
        span(0, 3),
        ident("f", span(0, 1)),
        vec![(ArgLabel::Nolabel, ident("x", span(2, 3)))],
    )
    .unwrap();
    let z = ident("z", span(14, 15)).with_attribute(Attribute::new(
        Located::new("foo".to_string(), span(18, 21)),
        ident("w", span(22, 23)),
    ));
    let binding = ValueBinding::new(
        span(6, 24),
        Pattern::var(Located::new("y".to_string(), span(10, 11))),
        z,
    );
    let structure = vec![
        StructureItem::eval(span(0, 3), apply),
        StructureItem::value(span(6, 24), RecFlag::Nonrecursive, vec![binding]).unwrap(),
    ];

    let mut visitor = IdentPaths::default();
    visitor.traverse_structure(&structure);

    let expected = [
        ("f", "0/Eval/Apply"),
        ("x", "0/Eval/Apply"),
        ("z", "1/Value"),
        ("w", "1/Value/Ident/@foo"),
    ];
    let seen: Vec<(&str, &str)> = visitor
        .seen
        .iter()
        .map(|(n, p)| (n.as_str(), p.as_str()))
        .collect();
    assert_eq!(seen, expected);
}

/// Moves every span to another file at a line offset.
struct Relocate {
    file: FileId,
    lines: u32,
}

impl Mapper for Relocate {
    type Error = std::convert::Infallible;

    fn map_location(&mut self, mut loc: Location) -> Result<Location, Self::Error> {
        loc.file = self.file;
        loc.start.line += self.lines;
        loc.end.line += self.lines;
        Ok(loc)
    }
}

#[test]
fn test_mapper_rewrites_every_node_span() {
    let e = Expression::sequence(
        span(0, 7),
        ident("a", span(0, 1)),
        Expression::if_then_else(span(3, 7), ident("b", span(3, 4)), ident("c", span(6, 7)), None),
    );
    let mut relocate = Relocate {
        file: FileId(3),
        lines: 10,
    };
    let moved = relocate.map_expression(e).unwrap();

    let mut spans = Vec::new();
    collect_spans(&moved, &mut spans);
    assert_eq!(spans.len(), 5);
    assert!(spans.iter().all(|loc| loc.file == FileId(3) && loc.start.line == 11));
}

fn collect_spans(expr: &Expression, out: &mut Vec<Location>) {
    struct Spans<'a>(&'a mut Vec<Location>);
    impl Visitor for Spans<'_> {
        fn visit_expression(&mut self, cursor: &mut Cursor, expr: &Expression) {
            self.0.push(expr.loc);
            walk_expression(self, cursor, expr);
        }
    }
    Spans(out).visit_expression(&mut Cursor::new(), expr);
}

/// Refuses trees that still contain extension nodes.
struct NoExtensions;

impl Mapper for NoExtensions {
    type Error = String;

    fn map_expression(&mut self, expr: Expression) -> Result<Expression, String> {
        match &expr.desc {
            ExpressionDesc::Extension { extension } => {
                Err(format!("unexpanded extension %{}", extension.name.txt))
            }
            _ => walk_map_expression(self, expr),
        }
    }
}

#[test]
fn test_mapper_errors_propagate() {
    let e = Expression::lazy(
        span(0, 13),
        Expression::extension(span(5, 13), Extension::marker("here", span(7, 11))),
    );
    let err = NoExtensions.map_expression(e).unwrap_err();
    assert_eq!(err, "unexpanded extension %here");

    let ok = Expression::lazy(span(0, 6), Expression::constant(span(5, 6), Constant::Int(1)));
    assert_eq!(NoExtensions.map_expression(ok.clone()), Ok(ok));
}
