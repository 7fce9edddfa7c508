//! Value and type declarations.

use serde::{Deserialize, Serialize};

use crate::asttypes::{MutableFlag, PrivateFlag, Variance};
use crate::attributes::Attributes;
use crate::core_type::CoreType;
use crate::error::{Error, Result};
use crate::location::{Located, Location};
use crate::variants::VariantSet;

/// `val x : T` or `external x : T = "s1" ... "sn"`.
///
/// `prim` is empty for a plain value and lists the foreign symbol names of
/// an external.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueDescription {
    pub name: Located<String>,
    pub ty: CoreType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prim: Vec<String>,
    pub loc: Location,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Attributes,
}

impl ValueDescription {
    pub fn new(loc: Location, name: Located<String>, ty: CoreType) -> Self {
        ValueDescription {
            name,
            ty,
            prim: Vec::new(),
            loc,
            attributes: Vec::new(),
        }
    }

    /// `external`: at least one primitive name is required.
    pub fn external(
        loc: Location,
        name: Located<String>,
        ty: CoreType,
        prim: Vec<String>,
    ) -> Result<Self> {
        if prim.is_empty() {
            return Err(Error::EmptySequence {
                what: "external primitive names",
            });
        }
        Ok(ValueDescription {
            prim,
            ..Self::new(loc, name, ty)
        })
    }

    pub fn is_external(&self) -> bool {
        !self.prim.is_empty()
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// A type parameter: `'a`, `+'a`, `-'a`, or `_` when `name` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeParam {
    pub name: Option<Located<String>>,
    pub variance: Variance,
}

impl TypeParam {
    pub fn new(name: Located<String>, variance: Variance) -> Self {
        TypeParam {
            name: Some(name),
            variance,
        }
    }

    pub fn anonymous(variance: Variance) -> Self {
        TypeParam {
            name: None,
            variance,
        }
    }
}

/// `constraint T1 = T2` attached to a type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeParamConstraint {
    pub lhs: CoreType,
    pub rhs: CoreType,
    pub loc: Location,
}

/// `type ('a1, ..., 'an) t = ...`
///
/// | source                         | kind      | manifest |
/// |--------------------------------|-----------|----------|
/// | `type t`                       | Abstract  | None     |
/// | `type t = T0`                  | Abstract  | Some T0  |
/// | `type t = C of T \| ...`       | Variant   | None     |
/// | `type t = T0 = C of T \| ...`  | Variant   | Some T0  |
/// | `type t = { l : T; ... }`      | Record    | None     |
/// | `type t = T0 = { l : T; ... }` | Record    | Some T0  |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub name: Located<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<TypeParam>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<TypeParamConstraint>,
    pub kind: TypeKind,
    pub private: PrivateFlag,
    pub manifest: Option<CoreType>,
    pub loc: Location,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TypeKind {
    Abstract,
    Variant {
        constructors: Vec<ConstructorDeclaration>,
    },
    Record { labels: Vec<LabelDeclaration> },
}

impl TypeDeclaration {
    /// Public abstract type with no parameters.
    pub fn new(loc: Location, name: Located<String>) -> Self {
        TypeDeclaration {
            name,
            params: Vec::new(),
            constraints: Vec::new(),
            kind: TypeKind::Abstract,
            private: PrivateFlag::Public,
            manifest: None,
            loc,
            attributes: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<TypeParam>) -> Self {
        self.params = params;
        self
    }

    pub fn with_constraints(mut self, constraints: Vec<TypeParamConstraint>) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_manifest(mut self, manifest: CoreType) -> Self {
        self.manifest = Some(manifest);
        self
    }

    pub fn with_private(mut self, private: PrivateFlag) -> Self {
        self.private = private;
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self.kind, TypeKind::Abstract) && self.manifest.is_none()
    }
}

/// `C of T1 * ... * Tn` or, with a result type, `C : T1 * ... * Tn -> T0`.
///
/// Also the shape of an exception declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDeclaration {
    pub name: Located<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<CoreType>,
    pub res: Option<CoreType>,
    pub loc: Location,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Attributes,
}

/// `exception E of T1 * ... * Tn`
pub type ExceptionDeclaration = ConstructorDeclaration;

impl ConstructorDeclaration {
    pub fn new(
        loc: Location,
        name: Located<String>,
        args: Vec<CoreType>,
        res: Option<CoreType>,
    ) -> Self {
        ConstructorDeclaration {
            name,
            args,
            res,
            loc,
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// `l : T` or `mutable l : T` in a record declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelDeclaration {
    pub name: Located<String>,
    pub mutable: MutableFlag,
    pub ty: CoreType,
    pub loc: Location,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Attributes,
}

impl LabelDeclaration {
    pub fn new(loc: Location, name: Located<String>, mutable: MutableFlag, ty: CoreType) -> Self {
        LabelDeclaration {
            name,
            mutable,
            ty,
            loc,
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

impl VariantSet for TypeKind {
    const VARIANTS: &'static [&'static str] = &["Abstract", "Variant", "Record"];

    fn variant_name(&self) -> &'static str {
        match self {
            TypeKind::Abstract => "Abstract",
            TypeKind::Variant { .. } => "Variant",
            TypeKind::Record { .. } => "Record",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::longident::Longident;

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
    fn test_external_needs_primitive() {
        assert!(ValueDescription::external(loc(), name("f"), int(), vec![]).is_err());
        let ext =
            ValueDescription::external(loc(), name("f"), int(), vec!["caml_f".into()]).unwrap();
        assert!(ext.is_external());
        assert!(!ValueDescription::new(loc(), name("x"), int()).is_external());
    }

    #[test]
    fn test_type_declaration_defaults() {
        let decl = TypeDeclaration::new(loc(), name("t"));
        assert!(decl.is_abstract());
        assert_eq!(decl.private, PrivateFlag::Public);

        let alias = decl.with_manifest(int());
        assert!(!alias.is_abstract());
    }

    #[test]
    fn test_record_declaration() {
        let decl = TypeDeclaration::new(loc(), name("point"))
            .with_params(vec![TypeParam::new(name("a"), Variance::Covariant)])
            .with_kind(TypeKind::Record {
                labels: vec![
                    LabelDeclaration::new(loc(), name("x"), MutableFlag::Mutable, int()),
                    LabelDeclaration::new(loc(), name("y"), MutableFlag::Immutable, int()),
                ],
            });
        match &decl.kind {
            TypeKind::Record { labels } => {
                assert_eq!(labels[0].mutable, MutableFlag::Mutable);
                assert_eq!(labels[1].name.txt, "y");
            }
            _ => panic!("Expected Record"),
        }
        assert_eq!(decl.kind.variant_name(), "Record");
    }
}
