//! Type expressions.
//!
//! [`CoreType`] is the surface syntax of types as written in annotations,
//! declarations and signatures: variables, arrows, tuples, constructors,
//! object and polymorphic variant types, and first-class module types.

use serde::{Deserialize, Serialize};

use crate::asttypes::{ArgLabel, ClosedFlag, Label};
use crate::attributes::Extension;
use crate::error::{Error, Result};
use crate::location::{Located, Location};
use crate::longident::Longident;
use crate::node::Node;
use crate::seq::Many;
use crate::variants::VariantSet;

/// A type expression node.
pub type CoreType = Node<CoreTypeDesc>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CoreTypeDesc {
    /// `_`
    Any,

    /// `'a`
    Var { name: String },

    /// `T1 -> T2`, `~l:T1 -> T2`, `?l:T1 -> T2`
    ///
    /// For an optional label the argument type is written without the
    /// implicit option wrapper, exactly as in the source.
    Arrow {
        label: ArgLabel,
        arg: Box<CoreType>,
        ret: Box<CoreType>,
    },

    /// `T1 * ... * Tn` with n >= 2
    Tuple { elements: Many<CoreType> },

    /// `tconstr`, `T tconstr`, `(T1, ..., Tn) tconstr`
    Constr {
        lid: Located<Longident>,
        args: Vec<CoreType>,
    },

    /// `< l1 : T1; ...; ln : Tn >` (closed) or `< l1 : T1; ... ; .. >` (open)
    Object {
        fields: Vec<ObjectField>,
        closed: ClosedFlag,
    },

    /// `#tconstr`, `T #tconstr`, `(T1, ..., Tn) #tconstr [> `A ]`
    Class {
        lid: Located<Longident>,
        args: Vec<CoreType>,
        labels: Vec<Label>,
    },

    /// `T as 'a`
    Alias { ty: Box<CoreType>, name: String },

    /// Polymorphic variant type.
    ///
    /// `closed` and `present` together describe the bound, see
    /// [`RowBound`]. `present` is an `Option`: `None` and
    /// `Some(vec![])` are different types.
    Variant {
        fields: Vec<RowField>,
        closed: bool,
        present: Option<Vec<Label>>,
    },

    /// `'a1 ... 'an. T`, only valid in method and record field types
    Poly { vars: Vec<String>, ty: Box<CoreType> },

    /// `(module S)`
    Package { package: PackageType },

    /// `[%id]`
    Extension { extension: Extension },
}

/// One method of an object type: `name : T`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectField {
    pub name: String,
    pub ty: CoreType,
}

/// One case of a polymorphic variant type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RowField {
    /// `` `A ``, `` `A of T ``, `` `A of & T1 & T2 ``
    ///
    /// `is_const` is set when the tag may be used without an argument
    /// (`` `A `` or the leading `&` form). Several `types` record the
    /// `&`-separated conjunction.
    Tag {
        label: Label,
        is_const: bool,
        types: Vec<CoreType>,
    },

    /// `[ T | ... ]`: all tags of another variant type
    Inherit { ty: CoreType },
}

/// `(module S with type t1 = T1 and ... )`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageType {
    pub lid: Located<Longident>,
    pub constraints: Vec<(Located<Longident>, CoreType)>,
}

/// Reading of the closed flag and present-tag filter of a polymorphic
/// variant type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowBound<'a> {
    /// `[ `A | `B ]`: closed, no filter
    Exact,
    /// `[> `A | `B ]`: open to further tags
    Open,
    /// `[< `A | `B ]`: closed, empty filter
    UpperBound,
    /// `[< `A | `B > `A ]`: closed, filtered by the listed tags
    UpperAndLower(&'a [Label]),
}

impl RowBound<'_> {
    pub fn of(closed: bool, present: &Option<Vec<Label>>) -> RowBound<'_> {
        match (closed, present) {
            (false, _) => RowBound::Open,
            (true, None) => RowBound::Exact,
            (true, Some(tags)) if tags.is_empty() => RowBound::UpperBound,
            (true, Some(tags)) => RowBound::UpperAndLower(tags),
        }
    }
}

impl Node<CoreTypeDesc> {
    pub fn any(loc: Location) -> Self {
        Node::new(CoreTypeDesc::Any, loc)
    }

    pub fn var(loc: Location, name: impl Into<String>) -> Self {
        Node::new(CoreTypeDesc::Var { name: name.into() }, loc)
    }

    pub fn arrow(loc: Location, label: ArgLabel, arg: CoreType, ret: CoreType) -> Self {
        Node::new(
            CoreTypeDesc::Arrow {
                label,
                arg: Box::new(arg),
                ret: Box::new(ret),
            },
            loc,
        )
    }

    /// Tuple type; fails with fewer than two components.
    pub fn tuple(loc: Location, elements: Vec<CoreType>) -> Result<Self> {
        let elements = Many::new(elements).map_err(|short| Error::TupleArity {
            layer: "type",
            found: short.len(),
        })?;
        Ok(Node::new(CoreTypeDesc::Tuple { elements }, loc))
    }

    pub fn constr(loc: Location, lid: Located<Longident>, args: Vec<CoreType>) -> Self {
        Node::new(CoreTypeDesc::Constr { lid, args }, loc)
    }

    pub fn object(loc: Location, fields: Vec<ObjectField>, closed: ClosedFlag) -> Self {
        Node::new(CoreTypeDesc::Object { fields, closed }, loc)
    }

    pub fn class(
        loc: Location,
        lid: Located<Longident>,
        args: Vec<CoreType>,
        labels: Vec<Label>,
    ) -> Self {
        Node::new(CoreTypeDesc::Class { lid, args, labels }, loc)
    }

    pub fn alias(loc: Location, ty: CoreType, name: impl Into<String>) -> Self {
        Node::new(
            CoreTypeDesc::Alias {
                ty: Box::new(ty),
                name: name.into(),
            },
            loc,
        )
    }

    pub fn variant(
        loc: Location,
        fields: Vec<RowField>,
        closed: bool,
        present: Option<Vec<Label>>,
    ) -> Self {
        Node::new(
            CoreTypeDesc::Variant {
                fields,
                closed,
                present,
            },
            loc,
        )
    }

    pub fn poly(loc: Location, vars: Vec<String>, ty: CoreType) -> Self {
        Node::new(
            CoreTypeDesc::Poly {
                vars,
                ty: Box::new(ty),
            },
            loc,
        )
    }

    pub fn package(loc: Location, package: PackageType) -> Self {
        Node::new(CoreTypeDesc::Package { package }, loc)
    }

    pub fn extension(loc: Location, extension: Extension) -> Self {
        Node::new(CoreTypeDesc::Extension { extension }, loc)
    }

    /// Bound of a polymorphic variant type, `None` for any other type.
    pub fn row_bound(&self) -> Option<RowBound<'_>> {
        match &self.desc {
            CoreTypeDesc::Variant {
                closed, present, ..
            } => Some(RowBound::of(*closed, present)),
            _ => None,
        }
    }
}

impl ObjectField {
    pub fn new(name: impl Into<String>, ty: CoreType) -> Self {
        ObjectField {
            name: name.into(),
            ty,
        }
    }
}

impl RowField {
    pub fn tag(label: impl Into<Label>, is_const: bool, types: Vec<CoreType>) -> Self {
        RowField::Tag {
            label: label.into(),
            is_const,
            types,
        }
    }

    pub fn inherit(ty: CoreType) -> Self {
        RowField::Inherit { ty }
    }
}

impl VariantSet for CoreTypeDesc {
    const VARIANTS: &'static [&'static str] = &[
        "Any", "Var", "Arrow", "Tuple", "Constr", "Object", "Class", "Alias", "Variant", "Poly",
        "Package", "Extension",
    ];

    fn variant_name(&self) -> &'static str {
        match self {
            CoreTypeDesc::Any => "Any",
            CoreTypeDesc::Var { .. } => "Var",
            CoreTypeDesc::Arrow { .. } => "Arrow",
            CoreTypeDesc::Tuple { .. } => "Tuple",
            CoreTypeDesc::Constr { .. } => "Constr",
            CoreTypeDesc::Object { .. } => "Object",
            CoreTypeDesc::Class { .. } => "Class",
            CoreTypeDesc::Alias { .. } => "Alias",
            CoreTypeDesc::Variant { .. } => "Variant",
            CoreTypeDesc::Poly { .. } => "Poly",
            CoreTypeDesc::Package { .. } => "Package",
            CoreTypeDesc::Extension { .. } => "Extension",
        }
    }
}

impl VariantSet for RowField {
    const VARIANTS: &'static [&'static str] = &["Tag", "Inherit"];

    fn variant_name(&self) -> &'static str {
        match self {
            RowField::Tag { .. } => "Tag",
            RowField::Inherit { .. } => "Inherit",
        }
    }
}
