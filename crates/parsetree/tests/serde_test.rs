//! JSON serialization of whole trees

use parsetree::asttypes::{ClosedFlag, MutableFlag, OverrideFlag, PrivateFlag, VirtualFlag};
use parsetree::attributes::Attribute;
use parsetree::class::{ClassFieldKind, ClassInfos, ClassSignature, ClassStructure, ClassTypeField};
use parsetree::core_type::{ObjectField, PackageType};
use parsetree::declarations::{ConstructorDeclaration, LabelDeclaration, TypeDeclaration};
use parsetree::module::{
    ModuleBinding, ModuleDeclaration, ModuleTypeDeclaration, OpenDescription, WithConstraint,
};
use parsetree::{
    ArgLabel, Case, ClassExpr, ClassField, ClassFieldDesc, ClassType, Constant, CoreType,
    DirectiveArgument, Expression, Extension, FileId, Located, Location, Longident, ModuleExpr,
    ModuleType, Pattern, Position, RecFlag, Signature, SignatureItem, SourceFiles, Structure,
    StructureItem, ToplevelPhrase, TypeKind, ValueBinding,
};

fn at(file: FileId, line: u32, start: u32, end: u32) -> Location {
    Location::new(
        file,
        Position::new(line, start + 1, start),
        Position::new(line, end + 1, end),
    )
}

fn name(txt: &str, loc: Location) -> Located<String> {
    Located::new(txt.to_string(), loc)
}

/// ```text
/// open! Base
/// type t = A | B of int
/// let rec f ?(x = 0) = function 1 when ok -> assert false | _ -> [%todo] [@@inline]
/// module M (X : S) = struct end
/// ```
fn sample_structure(file: FileId) -> Structure {
    let l = |line, s, e| at(file, line, s, e);

    let open = StructureItem::open(
        l(1, 0, 10),
        OpenDescription::new(
            l(1, 0, 10),
            Located::new(Longident::ident("Base"), l(1, 6, 10)),
            OverrideFlag::Override,
        ),
    );

    let int_ty = CoreType::constr(l(2, 19, 22), Located::new(Longident::ident("int"), l(2, 19, 22)), vec![]);
    let decl = TypeDeclaration::new(l(2, 0, 22), name("t", l(2, 5, 6))).with_kind(TypeKind::Variant {
        constructors: vec![
            ConstructorDeclaration::new(l(2, 9, 10), name("A", l(2, 9, 10)), vec![], None),
            ConstructorDeclaration::new(l(2, 13, 22), name("B", l(2, 13, 14)), vec![int_ty], None),
        ],
    });
    let types = StructureItem::type_(l(2, 0, 22), RecFlag::Recursive, vec![decl]).unwrap();

    let guard = Expression::ident(l(3, 37, 39), Longident::ident("ok"));
    let todo = Expression::extension(
        l(3, 62, 69),
        Extension::marker("todo", l(3, 64, 68)),
    );
    let function = Expression::function(
        l(3, 21, 69),
        ArgLabel::Nolabel,
        None,
        vec![
            Case::guarded(
                Pattern::constant(l(3, 30, 31), Constant::Int(1)),
                guard,
                Expression::assert_false(l(3, 43, 55)),
            ),
            Case::new(Pattern::any(l(3, 58, 59)), todo),
        ],
    )
    .unwrap();
    let f = Expression::fun(
        l(3, 10, 69),
        ArgLabel::optional("x"),
        Some(Expression::constant(l(3, 16, 17), Constant::Int(0))),
        Pattern::var(name("x", l(3, 12, 13))),
        function,
    )
    .unwrap();
    let binding = ValueBinding::new(l(3, 8, 69), Pattern::var(name("f", l(3, 8, 9))), f)
        .with_attributes(vec![Attribute::marker("inline", l(3, 73, 79))]);
    let value = StructureItem::value(l(3, 0, 80), RecFlag::Recursive, vec![binding]).unwrap();

    let sig = parsetree::ModuleType::ident(l(4, 14, 15), Located::new(Longident::ident("S"), l(4, 14, 15)));
    let functor = ModuleExpr::functor(
        l(4, 9, 29),
        name("X", l(4, 10, 11)),
        Some(sig),
        ModuleExpr::structure(l(4, 19, 29), vec![]),
    );
    let module = StructureItem::module(
        l(4, 0, 29),
        ModuleBinding::new(l(4, 0, 29), name("M", l(4, 7, 8)), functor),
    );

    vec![open, types, value, module]
}

#[test]
fn test_structure_round_trip() {
    let mut files = SourceFiles::new();
    let file = files.add("sample.ml");
    let structure = sample_structure(file);

    let json = serde_json::to_string_pretty(&structure).unwrap();
    let back: Structure = serde_json::from_str(&json).unwrap();

    assert_eq!(back, structure);
    assert_eq!(files.name(back[0].loc.file), Some("sample.ml"));
}

#[test]
fn test_attributes_survive_round_trip_in_order() {
    let e = Expression::constant(at(FileId(0), 1, 0, 1), Constant::Int(1))
        .with_attribute(Attribute::marker("first", at(FileId(0), 1, 4, 9)))
        .with_attribute(Attribute::marker("second", at(FileId(0), 1, 13, 19)));
    let back: Expression = serde_json::from_str(&serde_json::to_string(&e).unwrap()).unwrap();

    let names: Vec<&str> = back.attributes.iter().map(|a| a.name.txt.as_str()).collect();
    assert_eq!(names, ["first", "second"]);
    assert_eq!(back, e);
}

#[test]
fn test_ghost_flag_round_trips() {
    let ghost = at(FileId(2), 7, 3, 9).to_ghost();
    let e = Expression::constant(ghost, Constant::String("s".into()));
    let back: Expression = serde_json::from_str(&serde_json::to_string(&e).unwrap()).unwrap();
    assert!(back.loc.ghost);
    assert_eq!(back.loc, ghost);
}

#[test]
fn test_phrase_round_trip() {
    let phrases = vec![
        ToplevelPhrase::definitions(sample_structure(FileId(0))),
        ToplevelPhrase::directive(
            at(FileId(0), 5, 0, 12),
            "use",
            DirectiveArgument::String {
                value: "a.ml".into(),
            },
        ),
    ];
    let json = serde_json::to_string(&phrases).unwrap();
    let back: Vec<ToplevelPhrase> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, phrases);
}

#[test]
fn test_short_tuple_is_rejected_on_read() {
    let json = serde_json::json!({
        "desc": { "kind": "Tuple", "elements": [
            { "desc": { "kind": "Any" }, "loc": serde_json::to_value(Location::none()).unwrap() }
        ]},
        "loc": serde_json::to_value(Location::none()).unwrap(),
    });
    assert!(serde_json::from_value::<Pattern>(json).is_err());
}

#[test]
fn test_empty_clause_list_is_rejected_on_read() {
    let mut json = serde_json::to_value(
        Expression::match_(
            Location::none(),
            Expression::constant(Location::none(), Constant::Int(0)),
            vec![Case::new(
                Pattern::any(Location::none()),
                Expression::constant(Location::none(), Constant::Int(1)),
            )],
        )
        .unwrap(),
    )
    .unwrap();
    json["desc"]["cases"] = serde_json::json!([]);
    assert!(serde_json::from_value::<Expression>(json).is_err());
}

fn l(start: u32, end: u32) -> Location {
    at(FileId(0), 1, start, end)
}

fn lid(path: &str, loc: Location) -> Located<Longident> {
    Located::new(path.parse().unwrap(), loc)
}

fn int_type(loc: Location) -> CoreType {
    CoreType::constr(loc, lid("int", loc), vec![])
}

fn int(n: i64, loc: Location) -> Expression {
    Expression::constant(loc, Constant::Int(n))
}

fn round_trip<T>(value: &T) -> T
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    serde_json::from_str(&serde_json::to_string(value).unwrap()).unwrap()
}

#[test]
fn test_class_field_round_trip() {
    // val mutable n = 0
    let field = ClassField::val(
        l(0, 17),
        name("n", l(12, 13)),
        MutableFlag::Mutable,
        ClassFieldKind::Concrete {
            override_flag: OverrideFlag::Fresh,
            expr: int(0, l(16, 17)),
        },
    );
    let json = serde_json::to_value(&field).unwrap();
    assert_eq!(json["desc"]["kind"], "Val");
    assert_eq!(json["desc"]["member"]["kind"], "Concrete");

    let back: ClassField = serde_json::from_value(json).unwrap();
    assert_eq!(back, field);
    let ClassFieldDesc::Val { member, .. } = &back.desc else {
        panic!("Expected Val");
    };
    assert_eq!(member.virtual_flag(), VirtualFlag::Concrete);
}

/// ```text
/// class virtual counter = object (self)
///   val mutable n = 0
///   val virtual step : int
///   method! incr = n
///   method virtual reset : int
/// end
/// ```
#[test]
fn test_class_declaration_round_trip() {
    let fields = vec![
        ClassField::val(
            l(40, 57),
            name("n", l(52, 53)),
            MutableFlag::Mutable,
            ClassFieldKind::Concrete {
                override_flag: OverrideFlag::Fresh,
                expr: int(0, l(56, 57)),
            },
        ),
        ClassField::val(
            l(60, 82),
            name("step", l(72, 76)),
            MutableFlag::Immutable,
            ClassFieldKind::Virtual {
                ty: int_type(l(79, 82)),
            },
        ),
        ClassField::method(
            l(85, 101),
            name("incr", l(93, 97)),
            PrivateFlag::Public,
            ClassFieldKind::Concrete {
                override_flag: OverrideFlag::Override,
                expr: Expression::poly(
                    l(100, 101),
                    Expression::ident(l(100, 101), Longident::ident("n")),
                    None,
                ),
            },
        ),
        ClassField::method(
            l(104, 130),
            name("reset", l(119, 124)),
            PrivateFlag::Public,
            ClassFieldKind::Virtual {
                ty: int_type(l(127, 130)),
            },
        ),
    ];
    let body = ClassExpr::structure(
        l(24, 134),
        ClassStructure::new(Pattern::var(name("self", l(32, 36))), fields),
    );
    let decl = ClassInfos::new(l(0, 134), VirtualFlag::Virtual, name("counter", l(14, 21)), body);
    let structure = vec![StructureItem::class(l(0, 134), vec![decl]).unwrap()];

    assert_eq!(round_trip(&structure), structure);
}

#[test]
fn test_object_expression_round_trip() {
    // object method get = 1 end
    let method = ClassField::method(
        l(7, 21),
        name("get", l(14, 17)),
        PrivateFlag::Public,
        ClassFieldKind::Concrete {
            override_flag: OverrideFlag::Fresh,
            expr: Expression::poly(l(20, 21), int(1, l(20, 21)), None),
        },
    );
    let object = Expression::object(
        l(0, 25),
        ClassStructure::new(Pattern::any(l(0, 6).to_ghost()), vec![method]),
    );

    assert_eq!(round_trip(&object), object);
}

/// ```text
/// module rec A : S and B : S
/// module type T = S with type t = int and type u := int and module M = N and module P := Q
/// class type ct = object method m : int end
/// ```
#[test]
fn test_signature_round_trip() {
    let s = |start, end| ModuleType::ident(l(start, end), lid("S", l(start, end)));
    let rec_module = SignatureItem::rec_module(
        l(0, 26),
        vec![
            ModuleDeclaration::new(l(0, 16), name("A", l(11, 12)), s(15, 16)),
            ModuleDeclaration::new(l(17, 26), name("B", l(21, 22)), s(25, 26)),
        ],
    )
    .unwrap();

    let t = TypeDeclaration::new(l(28, 41), name("t", l(33, 34))).with_manifest(int_type(l(37, 40)));
    let u = TypeDeclaration::new(l(46, 60), name("u", l(51, 52))).with_manifest(int_type(l(56, 59)));
    let with = ModuleType::with(
        l(16, 90),
        s(16, 17),
        vec![
            WithConstraint::Type {
                lid: lid("t", l(33, 34)),
                decl: t,
            },
            WithConstraint::TypeSubst { decl: u },
            WithConstraint::Module {
                lid: lid("M", l(71, 72)),
                target: lid("N", l(75, 76)),
            },
            WithConstraint::ModuleSubst {
                name: name("P", l(88, 89)),
                target: lid("Q", l(93, 94)),
            },
        ],
    );
    let module_type = SignatureItem::module_type(
        l(0, 94),
        ModuleTypeDeclaration::new(l(0, 94), name("T", l(12, 13)), Some(with)),
    );

    let method = ClassTypeField::method(
        l(23, 37),
        "m",
        PrivateFlag::Public,
        VirtualFlag::Concrete,
        int_type(l(34, 37)),
    );
    let object = ClassType::signature(
        l(16, 41),
        ClassSignature {
            self_type: CoreType::any(l(16, 22).to_ghost()),
            fields: vec![method],
        },
    );
    let class_type = SignatureItem::class_type(
        l(0, 41),
        vec![ClassInfos::new(l(0, 41), VirtualFlag::Concrete, name("ct", l(11, 13)), object)],
    )
    .unwrap();

    let signature: Signature = vec![rec_module, module_type, class_type];
    assert_eq!(round_trip(&signature), signature);
}

#[test]
fn test_object_and_package_types_round_trip() {
    // < get : int; .. >
    let object = CoreType::object(
        l(0, 17),
        vec![ObjectField::new("get", int_type(l(8, 11)))],
        ClosedFlag::Open,
    );
    // (module S with type t = int)
    let package = CoreType::package(
        l(0, 28),
        PackageType {
            lid: lid("S", l(8, 9)),
            constraints: vec![(lid("t", l(20, 21)), int_type(l(24, 27)))],
        },
    );

    assert_eq!(round_trip(&object), object);
    assert_eq!(round_trip(&package), package);
}

#[test]
fn test_record_type_round_trip() {
    // type point = { mutable x : int; y : int }
    let decl = TypeDeclaration::new(l(0, 41), name("point", l(5, 10))).with_kind(TypeKind::Record {
        labels: vec![
            LabelDeclaration::new(l(15, 30), name("x", l(23, 24)), MutableFlag::Mutable, int_type(l(27, 30))),
            LabelDeclaration::new(l(32, 39), name("y", l(32, 33)), MutableFlag::Immutable, int_type(l(36, 39))),
        ],
    });
    let structure = vec![StructureItem::type_(l(0, 41), RecFlag::Nonrecursive, vec![decl]).unwrap()];

    let back = round_trip(&structure);
    assert_eq!(back, structure);
}
