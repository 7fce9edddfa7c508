//! The class language: class types, class expressions and their fields.
//!
//! A self-contained sub-grammar on top of the type, pattern and
//! expression layers. Virtual/concrete and override flags separate
//! abstract member declarations from implementations.

use serde::{Deserialize, Serialize};

use crate::asttypes::{ArgLabel, MutableFlag, OverrideFlag, PrivateFlag, RecFlag, VirtualFlag};
use crate::attributes::{Attribute, Attributes, Extension};
use crate::core_type::CoreType;
use crate::declarations::TypeParam;
use crate::error::{Error, Result};
use crate::expression::{Expression, ValueBinding, bindings, check_default};
use crate::location::{Located, Location};
use crate::longident::Longident;
use crate::node::Node;
use crate::pattern::Pattern;
use crate::seq::NonEmpty;
use crate::variants::VariantSet;

// =============================================================================
// Class types
// =============================================================================

pub type ClassType = Node<ClassTypeDesc>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClassTypeDesc {
    /// `c`, `['a1, ..., 'an] c`
    Constr {
        lid: Located<Longident>,
        args: Vec<CoreType>,
    },

    /// `object ... end`
    Signature { signature: ClassSignature },

    /// `T -> CT`, `~l:T -> CT`, `?l:T -> CT`
    Arrow {
        label: ArgLabel,
        arg: CoreType,
        ret: Box<ClassType>,
    },

    /// `[%id]`
    Extension { extension: Extension },
}

/// Body of `object ('selfpat) ... end` in a class type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSignature {
    pub self_type: CoreType,
    pub fields: Vec<ClassTypeField>,
}

pub type ClassTypeField = Node<ClassTypeFieldDesc>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClassTypeFieldDesc {
    /// `inherit CT`
    Inherit { class_type: ClassType },

    /// `val x : T`, `val mutable virtual x : T`
    Val {
        name: String,
        mutable: MutableFlag,
        virtual_flag: VirtualFlag,
        ty: CoreType,
    },

    /// `method x : T`, `method private virtual x : T`
    Method {
        name: String,
        private: PrivateFlag,
        virtual_flag: VirtualFlag,
        ty: CoreType,
    },

    /// `constraint T1 = T2`
    Constraint { lhs: CoreType, rhs: CoreType },

    /// `[@@@id]`
    Attribute { attribute: Attribute },

    /// `[%%id]`
    Extension { extension: Extension },
}

/// The shared shape of class, class description and class type
/// declarations: `class virtual ['a1, ..., 'an] c = E`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfos<T> {
    pub virtual_flag: VirtualFlag,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<TypeParam>,
    pub name: Located<String>,
    pub expr: T,
    pub loc: Location,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Attributes,
}

/// `class c : CT` in a signature
pub type ClassDescription = ClassInfos<ClassType>;

/// `class type c = CT`
pub type ClassTypeDeclaration = ClassInfos<ClassType>;

/// `class c = CE`
pub type ClassDeclaration = ClassInfos<ClassExpr>;

impl<T> ClassInfos<T> {
    pub fn new(loc: Location, virtual_flag: VirtualFlag, name: Located<String>, expr: T) -> Self {
        ClassInfos {
            virtual_flag,
            params: Vec::new(),
            name,
            expr,
            loc,
            attributes: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<TypeParam>) -> Self {
        self.params = params;
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

impl Node<ClassTypeDesc> {
    pub fn constr(loc: Location, lid: Located<Longident>, args: Vec<CoreType>) -> Self {
        Node::new(ClassTypeDesc::Constr { lid, args }, loc)
    }

    pub fn signature(loc: Location, signature: ClassSignature) -> Self {
        Node::new(ClassTypeDesc::Signature { signature }, loc)
    }

    pub fn arrow(loc: Location, label: ArgLabel, arg: CoreType, ret: ClassType) -> Self {
        Node::new(
            ClassTypeDesc::Arrow {
                label,
                arg,
                ret: Box::new(ret),
            },
            loc,
        )
    }

    pub fn extension(loc: Location, extension: Extension) -> Self {
        Node::new(ClassTypeDesc::Extension { extension }, loc)
    }
}

impl Node<ClassTypeFieldDesc> {
    pub fn inherit(loc: Location, class_type: ClassType) -> Self {
        Node::new(ClassTypeFieldDesc::Inherit { class_type }, loc)
    }

    pub fn val(
        loc: Location,
        name: impl Into<String>,
        mutable: MutableFlag,
        virtual_flag: VirtualFlag,
        ty: CoreType,
    ) -> Self {
        Node::new(
            ClassTypeFieldDesc::Val {
                name: name.into(),
                mutable,
                virtual_flag,
                ty,
            },
            loc,
        )
    }

    pub fn method(
        loc: Location,
        name: impl Into<String>,
        private: PrivateFlag,
        virtual_flag: VirtualFlag,
        ty: CoreType,
    ) -> Self {
        Node::new(
            ClassTypeFieldDesc::Method {
                name: name.into(),
                private,
                virtual_flag,
                ty,
            },
            loc,
        )
    }

    pub fn constraint(loc: Location, lhs: CoreType, rhs: CoreType) -> Self {
        Node::new(ClassTypeFieldDesc::Constraint { lhs, rhs }, loc)
    }

    pub fn floating_attribute(loc: Location, attribute: Attribute) -> Self {
        Node::new(ClassTypeFieldDesc::Attribute { attribute }, loc)
    }

    pub fn extension(loc: Location, extension: Extension) -> Self {
        Node::new(ClassTypeFieldDesc::Extension { extension }, loc)
    }
}

// =============================================================================
// Class expressions
// =============================================================================

pub type ClassExpr = Node<ClassExprDesc>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClassExprDesc {
    /// `c`, `['a1, ..., 'an] c`
    Constr {
        lid: Located<Longident>,
        args: Vec<CoreType>,
    },

    /// `object ... end`
    Structure { structure: ClassStructure },

    /// `fun P -> CE`, `fun ~l:P -> CE`, `fun ?(l = E0) -> CE`
    Fun {
        label: ArgLabel,
        default: Option<Expression>,
        pattern: Pattern,
        body: Box<ClassExpr>,
    },

    /// `CE ~l1:E1 ... En`
    Apply {
        class_expr: Box<ClassExpr>,
        args: NonEmpty<(ArgLabel, Expression)>,
    },

    /// `let P1 = E1 and ... in CE`, `let rec ... in CE`
    Let {
        rec_flag: RecFlag,
        bindings: NonEmpty<ValueBinding>,
        body: Box<ClassExpr>,
    },

    /// `(CE : CT)`
    Constraint {
        class_expr: Box<ClassExpr>,
        class_type: ClassType,
    },

    /// `[%id]`
    Extension { extension: Extension },
}

/// Body of `object (selfpat) ... end`; the self pattern is `_` when none
/// is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassStructure {
    pub self_pattern: Pattern,
    pub fields: Vec<ClassField>,
}

impl ClassStructure {
    pub fn new(self_pattern: Pattern, fields: Vec<ClassField>) -> Self {
        ClassStructure {
            self_pattern,
            fields,
        }
    }
}

pub type ClassField = Node<ClassFieldDesc>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClassFieldDesc {
    /// `inherit CE`, `inherit CE as x`, `inherit! CE`
    Inherit {
        override_flag: OverrideFlag,
        class_expr: ClassExpr,
        alias: Option<String>,
    },

    /// `val x = E`, `val virtual x : T`
    Val {
        name: Located<String>,
        mutable: MutableFlag,
        member: ClassFieldKind,
    },

    /// `method x = E`, `method virtual x : T`
    ///
    /// A concrete method body is normally a [`crate::ExpressionDesc::Poly`].
    Method {
        name: Located<String>,
        private: PrivateFlag,
        member: ClassFieldKind,
    },

    /// `constraint T1 = T2`
    Constraint { lhs: CoreType, rhs: CoreType },

    /// `initializer E`
    Initializer { expr: Expression },

    /// `[@@@id]`
    Attribute { attribute: Attribute },

    /// `[%%id]`
    Extension { extension: Extension },
}

/// Declaration or implementation of a class member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClassFieldKind {
    /// `virtual x : T`
    Virtual { ty: CoreType },
    /// `x = E`, `x! = E`
    Concrete {
        override_flag: OverrideFlag,
        expr: Expression,
    },
}

impl ClassFieldKind {
    pub fn virtual_flag(&self) -> VirtualFlag {
        match self {
            ClassFieldKind::Virtual { .. } => VirtualFlag::Virtual,
            ClassFieldKind::Concrete { .. } => VirtualFlag::Concrete,
        }
    }
}

impl Node<ClassExprDesc> {
    pub fn constr(loc: Location, lid: Located<Longident>, args: Vec<CoreType>) -> Self {
        Node::new(ClassExprDesc::Constr { lid, args }, loc)
    }

    pub fn structure(loc: Location, structure: ClassStructure) -> Self {
        Node::new(ClassExprDesc::Structure { structure }, loc)
    }

    /// Class function; a default is only accepted with an optional label.
    pub fn fun(
        loc: Location,
        label: ArgLabel,
        default: Option<Expression>,
        pattern: Pattern,
        body: ClassExpr,
    ) -> Result<Self> {
        check_default(&label, default.as_ref())?;
        Ok(Node::new(
            ClassExprDesc::Fun {
                label,
                default,
                pattern,
                body: Box::new(body),
            },
            loc,
        ))
    }

    pub fn apply(
        loc: Location,
        class_expr: ClassExpr,
        args: Vec<(ArgLabel, Expression)>,
    ) -> Result<Self> {
        let args = NonEmpty::new(args).ok_or(Error::EmptySequence {
            what: "class application arguments",
        })?;
        Ok(Node::new(
            ClassExprDesc::Apply {
                class_expr: Box::new(class_expr),
                args,
            },
            loc,
        ))
    }

    pub fn let_(
        loc: Location,
        rec_flag: RecFlag,
        value_bindings: Vec<ValueBinding>,
        body: ClassExpr,
    ) -> Result<Self> {
        Ok(Node::new(
            ClassExprDesc::Let {
                rec_flag,
                bindings: bindings(value_bindings)?,
                body: Box::new(body),
            },
            loc,
        ))
    }

    pub fn constraint(loc: Location, class_expr: ClassExpr, class_type: ClassType) -> Self {
        Node::new(
            ClassExprDesc::Constraint {
                class_expr: Box::new(class_expr),
                class_type,
            },
            loc,
        )
    }

    pub fn extension(loc: Location, extension: Extension) -> Self {
        Node::new(ClassExprDesc::Extension { extension }, loc)
    }
}

impl Node<ClassFieldDesc> {
    pub fn inherit(
        loc: Location,
        override_flag: OverrideFlag,
        class_expr: ClassExpr,
        alias: Option<String>,
    ) -> Self {
        Node::new(
            ClassFieldDesc::Inherit {
                override_flag,
                class_expr,
                alias,
            },
            loc,
        )
    }

    pub fn val(
        loc: Location,
        name: Located<String>,
        mutable: MutableFlag,
        member: ClassFieldKind,
    ) -> Self {
        Node::new(
            ClassFieldDesc::Val {
                name,
                mutable,
                member,
            },
            loc,
        )
    }

    pub fn method(
        loc: Location,
        name: Located<String>,
        private: PrivateFlag,
        member: ClassFieldKind,
    ) -> Self {
        Node::new(
            ClassFieldDesc::Method {
                name,
                private,
                member,
            },
            loc,
        )
    }

    pub fn constraint(loc: Location, lhs: CoreType, rhs: CoreType) -> Self {
        Node::new(ClassFieldDesc::Constraint { lhs, rhs }, loc)
    }

    pub fn initializer(loc: Location, expr: Expression) -> Self {
        Node::new(ClassFieldDesc::Initializer { expr }, loc)
    }

    pub fn floating_attribute(loc: Location, attribute: Attribute) -> Self {
        Node::new(ClassFieldDesc::Attribute { attribute }, loc)
    }

    pub fn extension(loc: Location, extension: Extension) -> Self {
        Node::new(ClassFieldDesc::Extension { extension }, loc)
    }
}

impl VariantSet for ClassTypeDesc {
    const VARIANTS: &'static [&'static str] = &["Constr", "Signature", "Arrow", "Extension"];

    fn variant_name(&self) -> &'static str {
        match self {
            ClassTypeDesc::Constr { .. } => "Constr",
            ClassTypeDesc::Signature { .. } => "Signature",
            ClassTypeDesc::Arrow { .. } => "Arrow",
            ClassTypeDesc::Extension { .. } => "Extension",
        }
    }
}

impl VariantSet for ClassTypeFieldDesc {
    const VARIANTS: &'static [&'static str] = &[
        "Inherit",
        "Val",
        "Method",
        "Constraint",
        "Attribute",
        "Extension",
    ];

    fn variant_name(&self) -> &'static str {
        match self {
            ClassTypeFieldDesc::Inherit { .. } => "Inherit",
            ClassTypeFieldDesc::Val { .. } => "Val",
            ClassTypeFieldDesc::Method { .. } => "Method",
            ClassTypeFieldDesc::Constraint { .. } => "Constraint",
            ClassTypeFieldDesc::Attribute { .. } => "Attribute",
            ClassTypeFieldDesc::Extension { .. } => "Extension",
        }
    }
}

impl VariantSet for ClassExprDesc {
    const VARIANTS: &'static [&'static str] = &[
        "Constr",
        "Structure",
        "Fun",
        "Apply",
        "Let",
        "Constraint",
        "Extension",
    ];

    fn variant_name(&self) -> &'static str {
        match self {
            ClassExprDesc::Constr { .. } => "Constr",
            ClassExprDesc::Structure { .. } => "Structure",
            ClassExprDesc::Fun { .. } => "Fun",
            ClassExprDesc::Apply { .. } => "Apply",
            ClassExprDesc::Let { .. } => "Let",
            ClassExprDesc::Constraint { .. } => "Constraint",
            ClassExprDesc::Extension { .. } => "Extension",
        }
    }
}

impl VariantSet for ClassFieldDesc {
    const VARIANTS: &'static [&'static str] = &[
        "Inherit",
        "Val",
        "Method",
        "Constraint",
        "Initializer",
        "Attribute",
        "Extension",
    ];

    fn variant_name(&self) -> &'static str {
        match self {
            ClassFieldDesc::Inherit { .. } => "Inherit",
            ClassFieldDesc::Val { .. } => "Val",
            ClassFieldDesc::Method { .. } => "Method",
            ClassFieldDesc::Constraint { .. } => "Constraint",
            ClassFieldDesc::Initializer { .. } => "Initializer",
            ClassFieldDesc::Attribute { .. } => "Attribute",
            ClassFieldDesc::Extension { .. } => "Extension",
        }
    }
}

impl VariantSet for ClassFieldKind {
    const VARIANTS: &'static [&'static str] = &["Virtual", "Concrete"];

    fn variant_name(&self) -> &'static str {
        match self {
            ClassFieldKind::Virtual { .. } => "Virtual",
            ClassFieldKind::Concrete { .. } => "Concrete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asttypes::Constant;

    fn loc() -> Location {
        Location::none()
    }

    fn name(s: &str) -> Located<String> {
        Located::new(s.to_string(), loc())
    }

    fn int() -> CoreType {
        CoreType::constr(loc(), Located::new(Longident::ident("int"), loc()), vec![])
    }

    #[test]
    fn test_virtual_and_concrete_members() {
        let virtual_method = ClassField::method(
            loc(),
            name("area"),
            PrivateFlag::Public,
            ClassFieldKind::Virtual { ty: int() },
        );
        let concrete_val = ClassField::val(
            loc(),
            name("count"),
            MutableFlag::Mutable,
            ClassFieldKind::Concrete {
                override_flag: OverrideFlag::Fresh,
                expr: Expression::constant(loc(), Constant::Int(0)),
            },
        );
        match (&virtual_method.desc, &concrete_val.desc) {
            (ClassFieldDesc::Method { member: m, .. }, ClassFieldDesc::Val { member: v, .. }) => {
                assert_eq!(m.virtual_flag(), VirtualFlag::Virtual);
                assert_eq!(v.virtual_flag(), VirtualFlag::Concrete);
            }
            _ => panic!("Expected Method and Val"),
        }
    }

    #[test]
    fn test_class_fun_default_requires_optional() {
        let body = ClassExpr::constr(loc(), Located::new(Longident::ident("c"), loc()), vec![]);
        let pattern = Pattern::var(name("x"));
        let zero = Expression::constant(loc(), Constant::Int(0));
        assert!(
            ClassExpr::fun(
                loc(),
                ArgLabel::Nolabel,
                Some(zero.clone()),
                pattern.clone(),
                body.clone()
            )
            .is_err()
        );
        assert!(ClassExpr::fun(loc(), ArgLabel::optional("x"), Some(zero), pattern, body).is_ok());
    }

    #[test]
    fn test_class_infos() {
        let decl: ClassDeclaration = ClassInfos::new(
            loc(),
            VirtualFlag::Virtual,
            name("shape"),
            ClassExpr::structure(loc(), ClassStructure::new(Pattern::any(loc()), vec![])),
        );
        assert_eq!(decl.name.txt, "shape");
        assert_eq!(decl.expr.desc.variant_name(), "Structure");
    }
}
