//! Value expressions.
//!
//! This is the largest layer: leaves, binding forms, functions and
//! application, control flow, data construction, the object layer and the
//! module interop forms. Clause lists ([`Case`]) are shared by
//! `Function`, `Match` and `Try`; a guard exists only inside a clause.

use serde::{Deserialize, Serialize};

use crate::asttypes::{ArgLabel, Constant, DirectionFlag, Label, OverrideFlag, RecFlag};
use crate::attributes::{Attributes, Extension};
use crate::class::ClassStructure;
use crate::core_type::CoreType;
use crate::error::{Error, Result};
use crate::location::{Located, Location};
use crate::longident::Longident;
use crate::module::ModuleExpr;
use crate::node::Node;
use crate::pattern::Pattern;
use crate::seq::{Many, NonEmpty};
use crate::variants::VariantSet;

/// An expression node.
pub type Expression = Node<ExpressionDesc>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ExpressionDesc {
    /// `x`, `M.x`
    Ident { lid: Located<Longident> },

    /// `1`, `'a'`, `"true"`, `1.0`, `1l`, `1L`, `1n`
    Constant { constant: Constant },

    /// `let P1 = E1 and ... and Pn = En in E` and its `let rec` form
    Let {
        rec_flag: RecFlag,
        bindings: NonEmpty<ValueBinding>,
        body: Box<Expression>,
    },

    /// `function P1 -> E1 | ... | Pn -> En` and `fun` with a label.
    ///
    /// `default` is only allowed when `label` is optional:
    /// `fun ?(x = E0) -> E`.
    Function {
        label: ArgLabel,
        default: Option<Box<Expression>>,
        cases: NonEmpty<Case>,
    },

    /// `E0 ~l1:E1 ... En`
    ///
    /// Labels and argument order are recorded as written; matching them
    /// against the callee's parameters happens in a later phase.
    Apply {
        callee: Box<Expression>,
        args: NonEmpty<(ArgLabel, Expression)>,
    },

    /// `match E0 with P1 -> E1 | ... | Pn -> En`
    Match {
        scrutinee: Box<Expression>,
        cases: NonEmpty<Case>,
    },

    /// `try E0 with P1 -> E1 | ... | Pn -> En`
    Try {
        body: Box<Expression>,
        cases: NonEmpty<Case>,
    },

    /// `(E1, ..., En)` with n >= 2
    Tuple { elements: Many<Expression> },

    /// `C`, `C E`, `C (E1, ..., En)`
    Construct {
        lid: Located<Longident>,
        arg: Option<Box<Expression>>,
        explicit_arity: bool,
    },

    /// `` `A ``, `` `A E ``
    Variant {
        label: Label,
        arg: Option<Box<Expression>>,
    },

    /// `{ l1 = E1; ...; ln = En }` or `{ E0 with l1 = E1; ... }`
    Record {
        fields: Vec<(Located<Longident>, Expression)>,
        base: Option<Box<Expression>>,
    },

    /// `E.l`
    Field {
        record: Box<Expression>,
        lid: Located<Longident>,
    },

    /// `E1.l <- E2`
    SetField {
        record: Box<Expression>,
        lid: Located<Longident>,
        value: Box<Expression>,
    },

    /// `[| E1; ...; En |]`
    Array { elements: Vec<Expression> },

    /// `if E1 then E2 else E3`, `if E1 then E2`
    IfThenElse {
        cond: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Option<Box<Expression>>,
    },

    /// `E1; E2`
    Sequence {
        first: Box<Expression>,
        second: Box<Expression>,
    },

    /// `while E1 do E2 done`
    While {
        cond: Box<Expression>,
        body: Box<Expression>,
    },

    /// `for i = E1 to E2 do E3 done`, `for i = E1 downto E2 do E3 done`
    For {
        var: Located<String>,
        start: Box<Expression>,
        stop: Box<Expression>,
        direction: DirectionFlag,
        body: Box<Expression>,
    },

    /// `(E : T)`, `(E :> T)`, `(E : T0 :> T)`
    Constraint {
        expr: Box<Expression>,
        constraint: TypeConstraint,
    },

    /// `E # m`
    Send {
        object: Box<Expression>,
        method: String,
    },

    /// `new M.c`
    New { lid: Located<Longident> },

    /// `x <- E` inside a method body
    SetInstVar {
        name: Located<String>,
        value: Box<Expression>,
    },

    /// `{< x1 = E1; ...; xn = En >}`
    Override {
        fields: Vec<(Located<String>, Expression)>,
    },

    /// `let module M = ME in E`
    LetModule {
        name: Located<String>,
        module: ModuleExpr,
        body: Box<Expression>,
    },

    /// `assert E`
    Assert { cond: Box<Expression> },

    /// `assert false`
    ///
    /// The one encoding of `assert false`; never `Assert` of the constant
    /// `false`. Later phases treat it as a point control cannot reach.
    AssertFalse,

    /// `lazy E`
    Lazy { expr: Box<Expression> },

    /// Body of a method, with its type if one was written.
    Poly {
        expr: Box<Expression>,
        ty: Option<CoreType>,
    },

    /// `object ... end`
    Object { structure: ClassStructure },

    /// `fun (type t) -> E`
    NewType { name: String, body: Box<Expression> },

    /// `(module ME)`
    Pack { module: ModuleExpr },

    /// `let open M in E`, `M.(E)`, `let open! M in E`
    Open {
        override_flag: OverrideFlag,
        lid: Located<Longident>,
        body: Box<Expression>,
    },

    /// `[%id]`
    Extension { extension: Extension },
}

/// Type annotation and/or coercion on an expression.
///
/// At least one type is always present; an expression with neither is the
/// bare expression and is never wrapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TypeConstraint {
    /// `(E : T)`
    Annotation { ty: CoreType },
    /// `(E :> T)`
    Coercion { target: CoreType },
    /// `(E : T0 :> T)`
    AnnotatedCoercion { source: CoreType, target: CoreType },
}

impl TypeConstraint {
    /// Combine an optional annotation and an optional coercion target.
    pub fn from_parts(annotation: Option<CoreType>, coercion: Option<CoreType>) -> Result<Self> {
        match (annotation, coercion) {
            (Some(ty), None) => Ok(TypeConstraint::Annotation { ty }),
            (None, Some(target)) => Ok(TypeConstraint::Coercion { target }),
            (Some(source), Some(target)) => Ok(TypeConstraint::AnnotatedCoercion { source, target }),
            (None, None) => Err(Error::EmptyConstraint),
        }
    }

    /// The annotation and coercion target, as written.
    pub fn parts(&self) -> (Option<&CoreType>, Option<&CoreType>) {
        match self {
            TypeConstraint::Annotation { ty } => (Some(ty), None),
            TypeConstraint::Coercion { target } => (None, Some(target)),
            TypeConstraint::AnnotatedCoercion { source, target } => (Some(source), Some(target)),
        }
    }
}

/// One clause of a `function`, `match` or `try`: `P when G -> E`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub pattern: Pattern,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<Expression>,
    pub body: Expression,
}

impl Case {
    pub fn new(pattern: Pattern, body: Expression) -> Self {
        Case {
            pattern,
            guard: None,
            body,
        }
    }

    pub fn guarded(pattern: Pattern, guard: Expression, body: Expression) -> Self {
        Case {
            pattern,
            guard: Some(guard),
            body,
        }
    }
}

/// `P = E` in a `let`, a class `let` or a structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBinding {
    pub pattern: Pattern,
    pub expr: Expression,
    pub loc: Location,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Attributes,
}

impl ValueBinding {
    pub fn new(loc: Location, pattern: Pattern, expr: Expression) -> Self {
        ValueBinding {
            pattern,
            expr,
            loc,
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Reject a default value on a parameter that is not optional.
pub(crate) fn check_default(label: &ArgLabel, default: Option<&Expression>) -> Result<()> {
    match (label, default) {
        (ArgLabel::Optional(_), _) | (_, None) => Ok(()),
        (label, Some(_)) => Err(Error::DefaultWithoutOptionalLabel {
            label: label.to_string(),
        }),
    }
}

fn cases(construct: &'static str, cases: Vec<Case>) -> Result<NonEmpty<Case>> {
    NonEmpty::new(cases).ok_or(Error::EmptyCases { construct })
}

pub(crate) fn bindings(bindings: Vec<ValueBinding>) -> Result<NonEmpty<ValueBinding>> {
    NonEmpty::new(bindings).ok_or(Error::EmptySequence {
        what: "let bindings",
    })
}

impl Node<ExpressionDesc> {
    pub fn ident(loc: Location, lid: Longident) -> Self {
        Node::new(
            ExpressionDesc::Ident {
                lid: Located::new(lid, loc),
            },
            loc,
        )
    }

    pub fn constant(loc: Location, constant: Constant) -> Self {
        Node::new(ExpressionDesc::Constant { constant }, loc)
    }

    pub fn let_(
        loc: Location,
        rec_flag: RecFlag,
        value_bindings: Vec<ValueBinding>,
        body: Expression,
    ) -> Result<Self> {
        Ok(Node::new(
            ExpressionDesc::Let {
                rec_flag,
                bindings: bindings(value_bindings)?,
                body: Box::new(body),
            },
            loc,
        ))
    }

    pub fn function(
        loc: Location,
        label: ArgLabel,
        default: Option<Expression>,
        clauses: Vec<Case>,
    ) -> Result<Self> {
        check_default(&label, default.as_ref())?;
        Ok(Node::new(
            ExpressionDesc::Function {
                label,
                default: default.map(Box::new),
                cases: cases("function", clauses)?,
            },
            loc,
        ))
    }

    /// `fun P -> E` with a single unguarded clause.
    pub fn fun(
        loc: Location,
        label: ArgLabel,
        default: Option<Expression>,
        pattern: Pattern,
        body: Expression,
    ) -> Result<Self> {
        Self::function(loc, label, default, vec![Case::new(pattern, body)])
    }

    pub fn apply(
        loc: Location,
        callee: Expression,
        args: Vec<(ArgLabel, Expression)>,
    ) -> Result<Self> {
        let args = NonEmpty::new(args).ok_or(Error::EmptySequence {
            what: "application arguments",
        })?;
        Ok(Node::new(
            ExpressionDesc::Apply {
                callee: Box::new(callee),
                args,
            },
            loc,
        ))
    }

    pub fn match_(loc: Location, scrutinee: Expression, clauses: Vec<Case>) -> Result<Self> {
        Ok(Node::new(
            ExpressionDesc::Match {
                scrutinee: Box::new(scrutinee),
                cases: cases("match", clauses)?,
            },
            loc,
        ))
    }

    pub fn try_(loc: Location, body: Expression, clauses: Vec<Case>) -> Result<Self> {
        Ok(Node::new(
            ExpressionDesc::Try {
                body: Box::new(body),
                cases: cases("try", clauses)?,
            },
            loc,
        ))
    }

    /// Tuple expression; fails with fewer than two components.
    pub fn tuple(loc: Location, elements: Vec<Expression>) -> Result<Self> {
        let elements = Many::new(elements).map_err(|short| Error::TupleArity {
            layer: "expression",
            found: short.len(),
        })?;
        Ok(Node::new(ExpressionDesc::Tuple { elements }, loc))
    }

    pub fn construct(
        loc: Location,
        lid: Located<Longident>,
        arg: Option<Expression>,
        explicit_arity: bool,
    ) -> Self {
        Node::new(
            ExpressionDesc::Construct {
                lid,
                arg: arg.map(Box::new),
                explicit_arity,
            },
            loc,
        )
    }

    /// Constructor application from its argument list as written; several
    /// arguments are wrapped in a ghost tuple.
    pub fn construct_args(
        loc: Location,
        lid: Located<Longident>,
        mut args: Vec<Expression>,
    ) -> Self {
        let arg = match args.len() {
            0 => None,
            1 => args.pop(),
            _ => {
                let tuple_loc = Location::enclosing(args.iter().map(|a| &a.loc))
                    .unwrap_or(loc)
                    .to_ghost();
                Many::new(args)
                    .ok()
                    .map(|elements| Node::new(ExpressionDesc::Tuple { elements }, tuple_loc))
            }
        };
        Self::construct(loc, lid, arg, false)
    }

    pub fn variant(loc: Location, label: impl Into<Label>, arg: Option<Expression>) -> Self {
        Node::new(
            ExpressionDesc::Variant {
                label: label.into(),
                arg: arg.map(Box::new),
            },
            loc,
        )
    }

    pub fn record(
        loc: Location,
        fields: Vec<(Located<Longident>, Expression)>,
        base: Option<Expression>,
    ) -> Self {
        Node::new(
            ExpressionDesc::Record {
                fields,
                base: base.map(Box::new),
            },
            loc,
        )
    }

    pub fn field(loc: Location, record: Expression, lid: Located<Longident>) -> Self {
        Node::new(
            ExpressionDesc::Field {
                record: Box::new(record),
                lid,
            },
            loc,
        )
    }

    pub fn set_field(
        loc: Location,
        record: Expression,
        lid: Located<Longident>,
        value: Expression,
    ) -> Self {
        Node::new(
            ExpressionDesc::SetField {
                record: Box::new(record),
                lid,
                value: Box::new(value),
            },
            loc,
        )
    }

    pub fn array(loc: Location, elements: Vec<Expression>) -> Self {
        Node::new(ExpressionDesc::Array { elements }, loc)
    }

    pub fn if_then_else(
        loc: Location,
        cond: Expression,
        then_branch: Expression,
        else_branch: Option<Expression>,
    ) -> Self {
        Node::new(
            ExpressionDesc::IfThenElse {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: else_branch.map(Box::new),
            },
            loc,
        )
    }

    pub fn sequence(loc: Location, first: Expression, second: Expression) -> Self {
        Node::new(
            ExpressionDesc::Sequence {
                first: Box::new(first),
                second: Box::new(second),
            },
            loc,
        )
    }

    pub fn while_(loc: Location, cond: Expression, body: Expression) -> Self {
        Node::new(
            ExpressionDesc::While {
                cond: Box::new(cond),
                body: Box::new(body),
            },
            loc,
        )
    }

    pub fn for_(
        loc: Location,
        var: Located<String>,
        start: Expression,
        stop: Expression,
        direction: DirectionFlag,
        body: Expression,
    ) -> Self {
        Node::new(
            ExpressionDesc::For {
                var,
                start: Box::new(start),
                stop: Box::new(stop),
                direction,
                body: Box::new(body),
            },
            loc,
        )
    }

    /// Constrained expression; fails when neither type is given.
    pub fn constraint(
        loc: Location,
        expr: Expression,
        annotation: Option<CoreType>,
        coercion: Option<CoreType>,
    ) -> Result<Self> {
        let constraint = TypeConstraint::from_parts(annotation, coercion)?;
        Ok(Node::new(
            ExpressionDesc::Constraint {
                expr: Box::new(expr),
                constraint,
            },
            loc,
        ))
    }

    pub fn send(loc: Location, object: Expression, method: impl Into<String>) -> Self {
        Node::new(
            ExpressionDesc::Send {
                object: Box::new(object),
                method: method.into(),
            },
            loc,
        )
    }

    pub fn new_(loc: Location, lid: Located<Longident>) -> Self {
        Node::new(ExpressionDesc::New { lid }, loc)
    }

    pub fn set_inst_var(loc: Location, name: Located<String>, value: Expression) -> Self {
        Node::new(
            ExpressionDesc::SetInstVar {
                name,
                value: Box::new(value),
            },
            loc,
        )
    }

    pub fn override_(loc: Location, fields: Vec<(Located<String>, Expression)>) -> Self {
        Node::new(ExpressionDesc::Override { fields }, loc)
    }

    pub fn let_module(
        loc: Location,
        name: Located<String>,
        module: ModuleExpr,
        body: Expression,
    ) -> Self {
        Node::new(
            ExpressionDesc::LetModule {
                name,
                module,
                body: Box::new(body),
            },
            loc,
        )
    }

    /// `assert E`; `assert false` is built as [`ExpressionDesc::AssertFalse`].
    ///
    /// Attributes on the `false` literal are dropped with it.
    pub fn assert_(loc: Location, cond: Expression) -> Self {
        if cond.is_false_literal() {
            return Self::assert_false(loc);
        }
        Node::new(
            ExpressionDesc::Assert {
                cond: Box::new(cond),
            },
            loc,
        )
    }

    pub fn assert_false(loc: Location) -> Self {
        Node::new(ExpressionDesc::AssertFalse, loc)
    }

    pub fn lazy(loc: Location, expr: Expression) -> Self {
        Node::new(
            ExpressionDesc::Lazy {
                expr: Box::new(expr),
            },
            loc,
        )
    }

    pub fn poly(loc: Location, expr: Expression, ty: Option<CoreType>) -> Self {
        Node::new(
            ExpressionDesc::Poly {
                expr: Box::new(expr),
                ty,
            },
            loc,
        )
    }

    pub fn object(loc: Location, structure: ClassStructure) -> Self {
        Node::new(ExpressionDesc::Object { structure }, loc)
    }

    pub fn newtype(loc: Location, name: impl Into<String>, body: Expression) -> Self {
        Node::new(
            ExpressionDesc::NewType {
                name: name.into(),
                body: Box::new(body),
            },
            loc,
        )
    }

    pub fn pack(loc: Location, module: ModuleExpr) -> Self {
        Node::new(ExpressionDesc::Pack { module }, loc)
    }

    pub fn open(
        loc: Location,
        override_flag: OverrideFlag,
        lid: Located<Longident>,
        body: Expression,
    ) -> Self {
        Node::new(
            ExpressionDesc::Open {
                override_flag,
                lid,
                body: Box::new(body),
            },
            loc,
        )
    }

    pub fn extension(loc: Location, extension: Extension) -> Self {
        Node::new(ExpressionDesc::Extension { extension }, loc)
    }

    /// Whether this is the bare constructor `false`.
    pub fn is_false_literal(&self) -> bool {
        matches!(
            &self.desc,
            ExpressionDesc::Construct { lid, arg: None, .. }
                if lid.txt == Longident::ident("false")
        )
    }

    /// Clause list of a `Function`, `Match` or `Try`.
    pub fn cases(&self) -> Option<&[Case]> {
        match &self.desc {
            ExpressionDesc::Function { cases, .. }
            | ExpressionDesc::Match { cases, .. }
            | ExpressionDesc::Try { cases, .. } => Some(cases.as_slice()),
            _ => None,
        }
    }
}

impl VariantSet for ExpressionDesc {
    const VARIANTS: &'static [&'static str] = &[
        "Ident",
        "Constant",
        "Let",
        "Function",
        "Apply",
        "Match",
        "Try",
        "Tuple",
        "Construct",
        "Variant",
        "Record",
        "Field",
        "SetField",
        "Array",
        "IfThenElse",
        "Sequence",
        "While",
        "For",
        "Constraint",
        "Send",
        "New",
        "SetInstVar",
        "Override",
        "LetModule",
        "Assert",
        "AssertFalse",
        "Lazy",
        "Poly",
        "Object",
        "NewType",
        "Pack",
        "Open",
        "Extension",
    ];

    fn variant_name(&self) -> &'static str {
        match self {
            ExpressionDesc::Ident { .. } => "Ident",
            ExpressionDesc::Constant { .. } => "Constant",
            ExpressionDesc::Let { .. } => "Let",
            ExpressionDesc::Function { .. } => "Function",
            ExpressionDesc::Apply { .. } => "Apply",
            ExpressionDesc::Match { .. } => "Match",
            ExpressionDesc::Try { .. } => "Try",
            ExpressionDesc::Tuple { .. } => "Tuple",
            ExpressionDesc::Construct { .. } => "Construct",
            ExpressionDesc::Variant { .. } => "Variant",
            ExpressionDesc::Record { .. } => "Record",
            ExpressionDesc::Field { .. } => "Field",
            ExpressionDesc::SetField { .. } => "SetField",
            ExpressionDesc::Array { .. } => "Array",
            ExpressionDesc::IfThenElse { .. } => "IfThenElse",
            ExpressionDesc::Sequence { .. } => "Sequence",
            ExpressionDesc::While { .. } => "While",
            ExpressionDesc::For { .. } => "For",
            ExpressionDesc::Constraint { .. } => "Constraint",
            ExpressionDesc::Send { .. } => "Send",
            ExpressionDesc::New { .. } => "New",
            ExpressionDesc::SetInstVar { .. } => "SetInstVar",
            ExpressionDesc::Override { .. } => "Override",
            ExpressionDesc::LetModule { .. } => "LetModule",
            ExpressionDesc::Assert { .. } => "Assert",
            ExpressionDesc::AssertFalse => "AssertFalse",
            ExpressionDesc::Lazy { .. } => "Lazy",
            ExpressionDesc::Poly { .. } => "Poly",
            ExpressionDesc::Object { .. } => "Object",
            ExpressionDesc::NewType { .. } => "NewType",
            ExpressionDesc::Pack { .. } => "Pack",
            ExpressionDesc::Open { .. } => "Open",
            ExpressionDesc::Extension { .. } => "Extension",
        }
    }
}

impl VariantSet for TypeConstraint {
    const VARIANTS: &'static [&'static str] = &["Annotation", "Coercion", "AnnotatedCoercion"];

    fn variant_name(&self) -> &'static str {
        match self {
            TypeConstraint::Annotation { .. } => "Annotation",
            TypeConstraint::Coercion { .. } => "Coercion",
            TypeConstraint::AnnotatedCoercion { .. } => "AnnotatedCoercion",
        }
    }
}
