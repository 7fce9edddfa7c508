//! Patterns.
//!
//! Patterns mirror the data forms of expressions (tuples, constructors,
//! polymorphic variants, records, arrays) so that generic walkers can treat
//! both the same way.

use serde::{Deserialize, Serialize};

use crate::asttypes::{ClosedFlag, Constant, Label};
use crate::attributes::Extension;
use crate::core_type::CoreType;
use crate::error::{Error, Result};
use crate::location::{Located, Location};
use crate::longident::Longident;
use crate::node::Node;
use crate::seq::Many;
use crate::variants::VariantSet;

/// A pattern node.
pub type Pattern = Node<PatternDesc>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PatternDesc {
    /// `_`
    Any,

    /// `x`
    Var { name: Located<String> },

    /// `P as x`
    Alias {
        pattern: Box<Pattern>,
        name: Located<String>,
    },

    /// `1`, `'a'`, `"true"`, `1.0`
    Constant { constant: Constant },

    /// `(P1, ..., Pn)` with n >= 2
    Tuple { elements: Many<Pattern> },

    /// `C`, `C P`, `C (P1, ..., Pn)`
    ///
    /// Several arguments are a single [`PatternDesc::Tuple`] argument.
    /// Whether that tuple is one argument or n is decided from the
    /// constructor's declaration unless `explicit_arity` says it is n.
    Construct {
        lid: Located<Longident>,
        arg: Option<Box<Pattern>>,
        explicit_arity: bool,
    },

    /// `` `A ``, `` `A P ``
    Variant {
        label: Label,
        arg: Option<Box<Pattern>>,
    },

    /// `{ l1 = P1; ...; ln = Pn }` (closed) or `{ l1 = P1; ...; _ }` (open)
    Record {
        fields: Vec<(Located<Longident>, Pattern)>,
        closed: ClosedFlag,
    },

    /// `[| P1; ...; Pn |]`
    Array { elements: Vec<Pattern> },

    /// `P1 | P2`
    Or {
        left: Box<Pattern>,
        right: Box<Pattern>,
    },

    /// `(P : T)`
    Constraint {
        pattern: Box<Pattern>,
        ty: CoreType,
    },

    /// `#tconst`
    Type { lid: Located<Longident> },

    /// `lazy P`
    Lazy { pattern: Box<Pattern> },

    /// `(module M)`
    Unpack { name: Located<String> },

    /// `[%id]`
    Extension { extension: Extension },
}

impl Node<PatternDesc> {
    pub fn any(loc: Location) -> Self {
        Node::new(PatternDesc::Any, loc)
    }

    pub fn var(name: Located<String>) -> Self {
        let loc = name.loc;
        Node::new(PatternDesc::Var { name }, loc)
    }

    pub fn alias(loc: Location, pattern: Pattern, name: Located<String>) -> Self {
        Node::new(
            PatternDesc::Alias {
                pattern: Box::new(pattern),
                name,
            },
            loc,
        )
    }

    pub fn constant(loc: Location, constant: Constant) -> Self {
        Node::new(PatternDesc::Constant { constant }, loc)
    }

    /// Tuple pattern; fails with fewer than two components.
    pub fn tuple(loc: Location, elements: Vec<Pattern>) -> Result<Self> {
        let elements = Many::new(elements).map_err(|short| Error::TupleArity {
            layer: "pattern",
            found: short.len(),
        })?;
        Ok(Node::new(PatternDesc::Tuple { elements }, loc))
    }

    pub fn construct(
        loc: Location,
        lid: Located<Longident>,
        arg: Option<Pattern>,
        explicit_arity: bool,
    ) -> Self {
        Node::new(
            PatternDesc::Construct {
                lid,
                arg: arg.map(Box::new),
                explicit_arity,
            },
            loc,
        )
    }

    /// Constructor pattern from its argument list as written.
    ///
    /// No argument gives `C`, one gives `C P`, and several are wrapped in
    /// a ghost tuple pattern covering them: `C (P1, P2)`. Arity is left to
    /// inference.
    pub fn construct_args(loc: Location, lid: Located<Longident>, mut args: Vec<Pattern>) -> Self {
        let arg = match args.len() {
            0 => None,
            1 => args.pop(),
            _ => {
                let tuple_loc = Location::enclosing(args.iter().map(|a| &a.loc))
                    .unwrap_or(loc)
                    .to_ghost();
                let elements = Many::new(args).ok();
                elements.map(|elements| Node::new(PatternDesc::Tuple { elements }, tuple_loc))
            }
        };
        Self::construct(loc, lid, arg, false)
    }

    pub fn variant(loc: Location, label: impl Into<Label>, arg: Option<Pattern>) -> Self {
        Node::new(
            PatternDesc::Variant {
                label: label.into(),
                arg: arg.map(Box::new),
            },
            loc,
        )
    }

    pub fn record(
        loc: Location,
        fields: Vec<(Located<Longident>, Pattern)>,
        closed: ClosedFlag,
    ) -> Self {
        Node::new(PatternDesc::Record { fields, closed }, loc)
    }

    pub fn array(loc: Location, elements: Vec<Pattern>) -> Self {
        Node::new(PatternDesc::Array { elements }, loc)
    }

    pub fn or(loc: Location, left: Pattern, right: Pattern) -> Self {
        Node::new(
            PatternDesc::Or {
                left: Box::new(left),
                right: Box::new(right),
            },
            loc,
        )
    }

    pub fn constraint(loc: Location, pattern: Pattern, ty: CoreType) -> Self {
        Node::new(
            PatternDesc::Constraint {
                pattern: Box::new(pattern),
                ty,
            },
            loc,
        )
    }

    pub fn type_(loc: Location, lid: Located<Longident>) -> Self {
        Node::new(PatternDesc::Type { lid }, loc)
    }

    pub fn lazy(loc: Location, pattern: Pattern) -> Self {
        Node::new(
            PatternDesc::Lazy {
                pattern: Box::new(pattern),
            },
            loc,
        )
    }

    pub fn unpack(loc: Location, name: Located<String>) -> Self {
        Node::new(PatternDesc::Unpack { name }, loc)
    }

    pub fn extension(loc: Location, extension: Extension) -> Self {
        Node::new(PatternDesc::Extension { extension }, loc)
    }

    /// Names bound by this pattern, left to right.
    ///
    /// For an or-pattern only the left side is consulted; both sides bind
    /// the same names in a well-typed program.
    pub fn bound_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        collect_bound_names(self, &mut names);
        names
    }
}

fn collect_bound_names<'a>(pattern: &'a Pattern, out: &mut Vec<&'a str>) {
    match &pattern.desc {
        PatternDesc::Any
        | PatternDesc::Constant { .. }
        | PatternDesc::Type { .. }
        | PatternDesc::Extension { .. } => {}
        PatternDesc::Var { name } | PatternDesc::Unpack { name } => out.push(&name.txt),
        PatternDesc::Alias { pattern, name } => {
            collect_bound_names(pattern, out);
            out.push(&name.txt);
        }
        PatternDesc::Tuple { elements } => {
            elements.iter().for_each(|p| collect_bound_names(p, out))
        }
        PatternDesc::Array { elements } => {
            elements.iter().for_each(|p| collect_bound_names(p, out))
        }
        PatternDesc::Construct { arg, .. } | PatternDesc::Variant { arg, .. } => {
            if let Some(arg) = arg {
                collect_bound_names(arg, out);
            }
        }
        PatternDesc::Record { fields, .. } => {
            fields.iter().for_each(|(_, p)| collect_bound_names(p, out))
        }
        PatternDesc::Or { left, .. } => collect_bound_names(left, out),
        PatternDesc::Constraint { pattern, .. } | PatternDesc::Lazy { pattern } => {
            collect_bound_names(pattern, out)
        }
    }
}

impl VariantSet for PatternDesc {
    const VARIANTS: &'static [&'static str] = &[
        "Any",
        "Var",
        "Alias",
        "Constant",
        "Tuple",
        "Construct",
        "Variant",
        "Record",
        "Array",
        "Or",
        "Constraint",
        "Type",
        "Lazy",
        "Unpack",
        "Extension",
    ];

    fn variant_name(&self) -> &'static str {
        match self {
            PatternDesc::Any => "Any",
            PatternDesc::Var { .. } => "Var",
            PatternDesc::Alias { .. } => "Alias",
            PatternDesc::Constant { .. } => "Constant",
            PatternDesc::Tuple { .. } => "Tuple",
            PatternDesc::Construct { .. } => "Construct",
            PatternDesc::Variant { .. } => "Variant",
            PatternDesc::Record { .. } => "Record",
            PatternDesc::Array { .. } => "Array",
            PatternDesc::Or { .. } => "Or",
            PatternDesc::Constraint { .. } => "Constraint",
            PatternDesc::Type { .. } => "Type",
            PatternDesc::Lazy { .. } => "Lazy",
            PatternDesc::Unpack { .. } => "Unpack",
            PatternDesc::Extension { .. } => "Extension",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> Location {
        Location::none()
    }

    fn var(name: &str) -> Pattern {
        Pattern::var(Located::new(name.to_string(), loc()))
    }

    fn lid(name: &str) -> Located<Longident> {
        Located::new(Longident::ident(name), loc())
    }

    #[test]
    fn test_tuple_requires_two() {
        assert!(matches!(
            Pattern::tuple(loc(), vec![var("a")]),
            Err(Error::TupleArity { layer: "pattern", found: 1 })
        ));
        assert!(Pattern::tuple(loc(), vec![var("a"), var("b")]).is_ok());
    }

    #[test]
    fn test_construct_args_no_argument() {
        let p = Pattern::construct_args(loc(), lid("None"), vec![]);
        assert!(matches!(
            p.desc,
            PatternDesc::Construct { arg: None, explicit_arity: false, .. }
        ));
    }

    #[test]
    fn test_construct_args_single_argument_is_not_wrapped() {
        let p = Pattern::construct_args(loc(), lid("Some"), vec![var("x")]);
        match p.desc {
            PatternDesc::Construct { arg: Some(arg), .. } => {
                assert!(matches!(arg.desc, PatternDesc::Var { .. }))
            }
            _ => panic!("Expected Construct with argument"),
        }
    }

    #[test]
    fn test_bound_names() {
        let p = Pattern::alias(
            loc(),
            Pattern::tuple(loc(), vec![var("a"), Pattern::any(loc()), var("b")]).unwrap(),
            Located::new("whole".to_string(), loc()),
        );
        assert_eq!(p.bound_names(), vec!["a", "b", "whole"]);
    }
}
