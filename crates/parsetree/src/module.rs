//! The module language: module types, module expressions, signatures and
//! structures.
//!
//! Functors take one parameter per node; `functor (A : S) (B : T) -> ME`
//! is two nested functor nodes. Recursive module groups hold their
//! bindings side by side in one item.

use serde::{Deserialize, Serialize};

use crate::asttypes::{OverrideFlag, RecFlag};
use crate::attributes::{Attribute, Attributes, Extension};
use crate::class::{ClassDeclaration, ClassDescription, ClassTypeDeclaration};
use crate::declarations::{ExceptionDeclaration, TypeDeclaration, ValueDescription};
use crate::error::{Error, Result};
use crate::expression::{Expression, ValueBinding, bindings};
use crate::location::{Located, Location};
use crate::longident::Longident;
use crate::node::Node;
use crate::seq::NonEmpty;
use crate::variants::VariantSet;

// =============================================================================
// Module types
// =============================================================================

pub type ModuleType = Node<ModuleTypeDesc>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ModuleTypeDesc {
    /// `S`
    Ident { lid: Located<Longident> },

    /// `sig ... end`
    Signature { items: Signature },

    /// `functor (X : MT1) -> MT2`; `param_type` is `None` for `functor () -> MT`
    Functor {
        param: Located<String>,
        param_type: Option<Box<ModuleType>>,
        body: Box<ModuleType>,
    },

    /// `MT with ...`
    With {
        module_type: Box<ModuleType>,
        constraints: Vec<WithConstraint>,
    },

    /// `module type of ME`
    TypeOf { module: Box<ModuleExpr> },

    /// `[%id]`
    Extension { extension: Extension },
}

/// One constraint of a `with` clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum WithConstraint {
    /// `with type X.t = ...`
    Type {
        lid: Located<Longident>,
        decl: TypeDeclaration,
    },
    /// `with module X.Y = Z`
    Module {
        lid: Located<Longident>,
        target: Located<Longident>,
    },
    /// `with type t := ...`
    TypeSubst { decl: TypeDeclaration },
    /// `with module X := Z`
    ModuleSubst {
        name: Located<String>,
        target: Located<Longident>,
    },
}

impl Node<ModuleTypeDesc> {
    pub fn ident(loc: Location, lid: Located<Longident>) -> Self {
        Node::new(ModuleTypeDesc::Ident { lid }, loc)
    }

    pub fn signature(loc: Location, items: Signature) -> Self {
        Node::new(ModuleTypeDesc::Signature { items }, loc)
    }

    pub fn functor(
        loc: Location,
        param: Located<String>,
        param_type: Option<ModuleType>,
        body: ModuleType,
    ) -> Self {
        Node::new(
            ModuleTypeDesc::Functor {
                param,
                param_type: param_type.map(Box::new),
                body: Box::new(body),
            },
            loc,
        )
    }

    pub fn with(loc: Location, module_type: ModuleType, constraints: Vec<WithConstraint>) -> Self {
        Node::new(
            ModuleTypeDesc::With {
                module_type: Box::new(module_type),
                constraints,
            },
            loc,
        )
    }

    pub fn type_of(loc: Location, module: ModuleExpr) -> Self {
        Node::new(
            ModuleTypeDesc::TypeOf {
                module: Box::new(module),
            },
            loc,
        )
    }

    pub fn extension(loc: Location, extension: Extension) -> Self {
        Node::new(ModuleTypeDesc::Extension { extension }, loc)
    }
}

// =============================================================================
// Module expressions
// =============================================================================

pub type ModuleExpr = Node<ModuleExprDesc>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ModuleExprDesc {
    /// `X`
    Ident { lid: Located<Longident> },

    /// `struct ... end`
    Structure { items: Structure },

    /// `functor (X : MT) -> ME`; `param_type` is `None` for `functor () -> ME`
    Functor {
        param: Located<String>,
        param_type: Option<ModuleType>,
        body: Box<ModuleExpr>,
    },

    /// `ME1(ME2)`
    Apply {
        functor: Box<ModuleExpr>,
        arg: Box<ModuleExpr>,
    },

    /// `(ME : MT)`
    Constraint {
        module: Box<ModuleExpr>,
        module_type: ModuleType,
    },

    /// `(val E)`
    Unpack { expr: Box<Expression> },

    /// `[%id]`
    Extension { extension: Extension },
}

/// A functor parameter as written: its name and, unless generative, its
/// module type.
pub type FunctorParam = (Located<String>, Option<ModuleType>);

impl Node<ModuleExprDesc> {
    pub fn ident(loc: Location, lid: Located<Longident>) -> Self {
        Node::new(ModuleExprDesc::Ident { lid }, loc)
    }

    pub fn structure(loc: Location, items: Structure) -> Self {
        Node::new(ModuleExprDesc::Structure { items }, loc)
    }

    pub fn functor(
        loc: Location,
        param: Located<String>,
        param_type: Option<ModuleType>,
        body: ModuleExpr,
    ) -> Self {
        Node::new(
            ModuleExprDesc::Functor {
                param,
                param_type,
                body: Box::new(body),
            },
            loc,
        )
    }

    /// `functor (X1 : MT1) ... (Xn : MTn) -> ME` as n nested functors.
    ///
    /// The outermost node gets `loc`; each inner node gets a ghost span
    /// from its parameter name to the end of the body, or a ghost copy of
    /// `loc` when those two spans are not in the same file.
    pub fn curried_functor(
        loc: Location,
        mut params: Vec<FunctorParam>,
        mut body: ModuleExpr,
    ) -> Result<Self> {
        if params.is_empty() {
            return Err(Error::EmptySequence {
                what: "functor parameters",
            });
        }
        while let Some((param, param_type)) = params.pop() {
            let node_loc = if params.is_empty() {
                loc
            } else {
                Location::enclosing([&param.loc, &body.loc])
                    .unwrap_or(loc)
                    .to_ghost()
            };
            body = Self::functor(node_loc, param, param_type, body);
        }
        Ok(body)
    }

    pub fn apply(loc: Location, functor: ModuleExpr, arg: ModuleExpr) -> Self {
        Node::new(
            ModuleExprDesc::Apply {
                functor: Box::new(functor),
                arg: Box::new(arg),
            },
            loc,
        )
    }

    pub fn constraint(loc: Location, module: ModuleExpr, module_type: ModuleType) -> Self {
        Node::new(
            ModuleExprDesc::Constraint {
                module: Box::new(module),
                module_type,
            },
            loc,
        )
    }

    pub fn unpack(loc: Location, expr: Expression) -> Self {
        Node::new(
            ModuleExprDesc::Unpack {
                expr: Box::new(expr),
            },
            loc,
        )
    }

    pub fn extension(loc: Location, extension: Extension) -> Self {
        Node::new(ModuleExprDesc::Extension { extension }, loc)
    }
}

// =============================================================================
// Item records
// =============================================================================

/// `module X : MT`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    pub name: Located<String>,
    pub module_type: ModuleType,
    pub loc: Location,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Attributes,
}

/// `module X = ME`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleBinding {
    pub name: Located<String>,
    pub expr: ModuleExpr,
    pub loc: Location,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Attributes,
}

/// `module type S = MT`, or `module type S` when abstract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleTypeDeclaration {
    pub name: Located<String>,
    pub module_type: Option<ModuleType>,
    pub loc: Location,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Attributes,
}

/// `open X`, `open! X`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenDescription {
    pub lid: Located<Longident>,
    pub override_flag: OverrideFlag,
    pub loc: Location,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Attributes,
}

/// `include MT` in a signature or `include ME` in a structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncludeInfos<T> {
    pub item: T,
    pub loc: Location,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Attributes,
}

pub type IncludeDescription = IncludeInfos<ModuleType>;
pub type IncludeDeclaration = IncludeInfos<ModuleExpr>;

impl ModuleDeclaration {
    pub fn new(loc: Location, name: Located<String>, module_type: ModuleType) -> Self {
        ModuleDeclaration {
            name,
            module_type,
            loc,
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

impl ModuleBinding {
    pub fn new(loc: Location, name: Located<String>, expr: ModuleExpr) -> Self {
        ModuleBinding {
            name,
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

impl ModuleTypeDeclaration {
    pub fn new(loc: Location, name: Located<String>, module_type: Option<ModuleType>) -> Self {
        ModuleTypeDeclaration {
            name,
            module_type,
            loc,
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

impl OpenDescription {
    pub fn new(loc: Location, lid: Located<Longident>, override_flag: OverrideFlag) -> Self {
        OpenDescription {
            lid,
            override_flag,
            loc,
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

impl<T> IncludeInfos<T> {
    pub fn new(loc: Location, item: T) -> Self {
        IncludeInfos {
            item,
            loc,
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

fn group<T>(items: Vec<T>, what: &'static str) -> Result<NonEmpty<T>> {
    NonEmpty::new(items).ok_or(Error::EmptySequence { what })
}

// =============================================================================
// Signatures
// =============================================================================

pub type Signature = Vec<SignatureItem>;

pub type SignatureItem = Node<SignatureItemDesc>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SignatureItemDesc {
    /// `val x : T`, `external x : T = "s1" ... "sn"`
    Value { desc: ValueDescription },

    /// `type t1 = ... and ... and tn = ...`
    Type {
        rec_flag: RecFlag,
        decls: NonEmpty<TypeDeclaration>,
    },

    /// `exception C of T`
    Exception { decl: ExceptionDeclaration },

    /// `module X : MT`
    Module { decl: ModuleDeclaration },

    /// `module rec X1 : MT1 and ... and Xn : MTn`
    RecModule { decls: NonEmpty<ModuleDeclaration> },

    /// `module type S = MT`, `module type S`
    ModuleType { decl: ModuleTypeDeclaration },

    /// `open X`
    Open { desc: OpenDescription },

    /// `include MT`
    Include { desc: IncludeDescription },

    /// `class c1 : ... and ... and cn : ...`
    Class { decls: NonEmpty<ClassDescription> },

    /// `class type ct1 = ... and ... and ctn = ...`
    ClassType { decls: NonEmpty<ClassTypeDeclaration> },

    /// `[@@@id]`
    Attribute { attribute: Attribute },

    /// `[%%id]`
    Extension { extension: Extension },
}

impl Node<SignatureItemDesc> {
    pub fn value(loc: Location, desc: ValueDescription) -> Self {
        Node::new(SignatureItemDesc::Value { desc }, loc)
    }

    pub fn type_(loc: Location, rec_flag: RecFlag, decls: Vec<TypeDeclaration>) -> Result<Self> {
        let decls = group(decls, "type declarations")?;
        Ok(Node::new(SignatureItemDesc::Type { rec_flag, decls }, loc))
    }

    pub fn exception(loc: Location, decl: ExceptionDeclaration) -> Self {
        Node::new(SignatureItemDesc::Exception { decl }, loc)
    }

    pub fn module(loc: Location, decl: ModuleDeclaration) -> Self {
        Node::new(SignatureItemDesc::Module { decl }, loc)
    }

    pub fn rec_module(loc: Location, decls: Vec<ModuleDeclaration>) -> Result<Self> {
        let decls = group(decls, "recursive module declarations")?;
        Ok(Node::new(SignatureItemDesc::RecModule { decls }, loc))
    }

    pub fn module_type(loc: Location, decl: ModuleTypeDeclaration) -> Self {
        Node::new(SignatureItemDesc::ModuleType { decl }, loc)
    }

    pub fn open(loc: Location, desc: OpenDescription) -> Self {
        Node::new(SignatureItemDesc::Open { desc }, loc)
    }

    pub fn include(loc: Location, desc: IncludeDescription) -> Self {
        Node::new(SignatureItemDesc::Include { desc }, loc)
    }

    pub fn class(loc: Location, decls: Vec<ClassDescription>) -> Result<Self> {
        let decls = group(decls, "class descriptions")?;
        Ok(Node::new(SignatureItemDesc::Class { decls }, loc))
    }

    pub fn class_type(loc: Location, decls: Vec<ClassTypeDeclaration>) -> Result<Self> {
        let decls = group(decls, "class type declarations")?;
        Ok(Node::new(SignatureItemDesc::ClassType { decls }, loc))
    }

    pub fn floating_attribute(loc: Location, attribute: Attribute) -> Self {
        Node::new(SignatureItemDesc::Attribute { attribute }, loc)
    }

    pub fn extension(loc: Location, extension: Extension) -> Self {
        Node::new(SignatureItemDesc::Extension { extension }, loc)
    }
}

// =============================================================================
// Structures
// =============================================================================

pub type Structure = Vec<StructureItem>;

pub type StructureItem = Node<StructureItemDesc>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum StructureItemDesc {
    /// `E` at top level
    Eval { expr: Expression },

    /// `let P1 = E1 and ... and Pn = En`, `let rec ...`
    Value {
        rec_flag: RecFlag,
        bindings: NonEmpty<ValueBinding>,
    },

    /// `external x : T = "s1" ... "sn"`
    Primitive { desc: ValueDescription },

    /// `type t1 = ... and ... and tn = ...`
    Type {
        rec_flag: RecFlag,
        decls: NonEmpty<TypeDeclaration>,
    },

    /// `exception C of T`
    Exception { decl: ExceptionDeclaration },

    /// `exception C = M.X`
    ExceptionRebind {
        name: Located<String>,
        lid: Located<Longident>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attributes: Attributes,
    },

    /// `module X = ME`
    Module { binding: ModuleBinding },

    /// `module rec X1 = ME1 and ... and Xn = MEn`
    RecModule { bindings: NonEmpty<ModuleBinding> },

    /// `module type S = MT`
    ModuleType { decl: ModuleTypeDeclaration },

    /// `open X`
    Open { desc: OpenDescription },

    /// `class c1 = ... and ... and cn = ...`
    Class { decls: NonEmpty<ClassDeclaration> },

    /// `class type ct1 = ... and ... and ctn = ...`
    ClassType { decls: NonEmpty<ClassTypeDeclaration> },

    /// `include ME`
    Include { decl: IncludeDeclaration },

    /// `[@@@id]`
    Attribute { attribute: Attribute },

    /// `[%%id]`
    Extension { extension: Extension },
}

impl Node<StructureItemDesc> {
    pub fn eval(loc: Location, expr: Expression) -> Self {
        Node::new(StructureItemDesc::Eval { expr }, loc)
    }

    pub fn value(
        loc: Location,
        rec_flag: RecFlag,
        value_bindings: Vec<ValueBinding>,
    ) -> Result<Self> {
        Ok(Node::new(
            StructureItemDesc::Value {
                rec_flag,
                bindings: bindings(value_bindings)?,
            },
            loc,
        ))
    }

    pub fn primitive(loc: Location, desc: ValueDescription) -> Self {
        Node::new(StructureItemDesc::Primitive { desc }, loc)
    }

    pub fn type_(loc: Location, rec_flag: RecFlag, decls: Vec<TypeDeclaration>) -> Result<Self> {
        let decls = group(decls, "type declarations")?;
        Ok(Node::new(StructureItemDesc::Type { rec_flag, decls }, loc))
    }

    pub fn exception(loc: Location, decl: ExceptionDeclaration) -> Self {
        Node::new(StructureItemDesc::Exception { decl }, loc)
    }

    pub fn exception_rebind(
        loc: Location,
        name: Located<String>,
        lid: Located<Longident>,
    ) -> Self {
        Node::new(
            StructureItemDesc::ExceptionRebind {
                name,
                lid,
                attributes: Vec::new(),
            },
            loc,
        )
    }

    pub fn module(loc: Location, binding: ModuleBinding) -> Self {
        Node::new(StructureItemDesc::Module { binding }, loc)
    }

    pub fn rec_module(loc: Location, module_bindings: Vec<ModuleBinding>) -> Result<Self> {
        let bindings = group(module_bindings, "recursive module bindings")?;
        Ok(Node::new(StructureItemDesc::RecModule { bindings }, loc))
    }

    pub fn module_type(loc: Location, decl: ModuleTypeDeclaration) -> Self {
        Node::new(StructureItemDesc::ModuleType { decl }, loc)
    }

    pub fn open(loc: Location, desc: OpenDescription) -> Self {
        Node::new(StructureItemDesc::Open { desc }, loc)
    }

    pub fn class(loc: Location, decls: Vec<ClassDeclaration>) -> Result<Self> {
        let decls = group(decls, "class declarations")?;
        Ok(Node::new(StructureItemDesc::Class { decls }, loc))
    }

    pub fn class_type(loc: Location, decls: Vec<ClassTypeDeclaration>) -> Result<Self> {
        let decls = group(decls, "class type declarations")?;
        Ok(Node::new(StructureItemDesc::ClassType { decls }, loc))
    }

    pub fn include(loc: Location, decl: IncludeDeclaration) -> Self {
        Node::new(StructureItemDesc::Include { decl }, loc)
    }

    pub fn floating_attribute(loc: Location, attribute: Attribute) -> Self {
        Node::new(StructureItemDesc::Attribute { attribute }, loc)
    }

    pub fn extension(loc: Location, extension: Extension) -> Self {
        Node::new(StructureItemDesc::Extension { extension }, loc)
    }
}

impl VariantSet for ModuleTypeDesc {
    const VARIANTS: &'static [&'static str] = &[
        "Ident",
        "Signature",
        "Functor",
        "With",
        "TypeOf",
        "Extension",
    ];

    fn variant_name(&self) -> &'static str {
        match self {
            ModuleTypeDesc::Ident { .. } => "Ident",
            ModuleTypeDesc::Signature { .. } => "Signature",
            ModuleTypeDesc::Functor { .. } => "Functor",
            ModuleTypeDesc::With { .. } => "With",
            ModuleTypeDesc::TypeOf { .. } => "TypeOf",
            ModuleTypeDesc::Extension { .. } => "Extension",
        }
    }
}

impl VariantSet for WithConstraint {
    const VARIANTS: &'static [&'static str] = &["Type", "Module", "TypeSubst", "ModuleSubst"];

    fn variant_name(&self) -> &'static str {
        match self {
            WithConstraint::Type { .. } => "Type",
            WithConstraint::Module { .. } => "Module",
            WithConstraint::TypeSubst { .. } => "TypeSubst",
            WithConstraint::ModuleSubst { .. } => "ModuleSubst",
        }
    }
}

impl VariantSet for ModuleExprDesc {
    const VARIANTS: &'static [&'static str] = &[
        "Ident",
        "Structure",
        "Functor",
        "Apply",
        "Constraint",
        "Unpack",
        "Extension",
    ];

    fn variant_name(&self) -> &'static str {
        match self {
            ModuleExprDesc::Ident { .. } => "Ident",
            ModuleExprDesc::Structure { .. } => "Structure",
            ModuleExprDesc::Functor { .. } => "Functor",
            ModuleExprDesc::Apply { .. } => "Apply",
            ModuleExprDesc::Constraint { .. } => "Constraint",
            ModuleExprDesc::Unpack { .. } => "Unpack",
            ModuleExprDesc::Extension { .. } => "Extension",
        }
    }
}

impl VariantSet for SignatureItemDesc {
    const VARIANTS: &'static [&'static str] = &[
        "Value",
        "Type",
        "Exception",
        "Module",
        "RecModule",
        "ModuleType",
        "Open",
        "Include",
        "Class",
        "ClassType",
        "Attribute",
        "Extension",
    ];

    fn variant_name(&self) -> &'static str {
        match self {
            SignatureItemDesc::Value { .. } => "Value",
            SignatureItemDesc::Type { .. } => "Type",
            SignatureItemDesc::Exception { .. } => "Exception",
            SignatureItemDesc::Module { .. } => "Module",
            SignatureItemDesc::RecModule { .. } => "RecModule",
            SignatureItemDesc::ModuleType { .. } => "ModuleType",
            SignatureItemDesc::Open { .. } => "Open",
            SignatureItemDesc::Include { .. } => "Include",
            SignatureItemDesc::Class { .. } => "Class",
            SignatureItemDesc::ClassType { .. } => "ClassType",
            SignatureItemDesc::Attribute { .. } => "Attribute",
            SignatureItemDesc::Extension { .. } => "Extension",
        }
    }
}

impl VariantSet for StructureItemDesc {
    const VARIANTS: &'static [&'static str] = &[
        "Eval",
        "Value",
        "Primitive",
        "Type",
        "Exception",
        "ExceptionRebind",
        "Module",
        "RecModule",
        "ModuleType",
        "Open",
        "Class",
        "ClassType",
        "Include",
        "Attribute",
        "Extension",
    ];

    fn variant_name(&self) -> &'static str {
        match self {
            StructureItemDesc::Eval { .. } => "Eval",
            StructureItemDesc::Value { .. } => "Value",
            StructureItemDesc::Primitive { .. } => "Primitive",
            StructureItemDesc::Type { .. } => "Type",
            StructureItemDesc::Exception { .. } => "Exception",
            StructureItemDesc::ExceptionRebind { .. } => "ExceptionRebind",
            StructureItemDesc::Module { .. } => "Module",
            StructureItemDesc::RecModule { .. } => "RecModule",
            StructureItemDesc::ModuleType { .. } => "ModuleType",
            StructureItemDesc::Open { .. } => "Open",
            StructureItemDesc::Class { .. } => "Class",
            StructureItemDesc::ClassType { .. } => "ClassType",
            StructureItemDesc::Include { .. } => "Include",
            StructureItemDesc::Attribute { .. } => "Attribute",
            StructureItemDesc::Extension { .. } => "Extension",
        }
    }
}
