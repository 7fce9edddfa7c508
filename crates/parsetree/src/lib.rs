//! Parse tree for an ML-family language.
//!
//! The tree is what a parser hands to the rest of a front end: a faithful,
//! location-annotated record of the source. It is layered the way the
//! grammar is:
//!
//! - [`core_type`] for type expressions
//! - [`pattern`] and [`expression`] for the value language
//! - [`class`] for classes and class types
//! - [`module`] for module expressions, module types, structures and
//!   signatures
//! - [`toplevel`] for the phrases of an interactive session
//!
//! Every node is a [`Node`] pairing a layer-specific description with a
//! [`Location`] and [`Attributes`]. Shape invariants (tuples of two or more,
//! non-empty clause lists, canonical `assert false`) are carried by the
//! types where possible and checked by the construction helpers otherwise;
//! [`validate`] checks what only a whole tree can show.
//!
//! Trees serialize to JSON through `serde`; every description enum is
//! internally tagged by `kind`.

pub mod asttypes;
pub mod attributes;
pub mod class;
pub mod config;
pub mod core_type;
pub mod declarations;
pub mod error;
pub mod expression;
pub mod location;
pub mod longident;
pub mod matching;
pub mod module;
pub mod node;
pub mod pattern;
pub mod seq;
pub mod toplevel;
pub mod traversal;
pub mod validate;
pub mod variants;

pub use asttypes::{ArgLabel, Constant, RecFlag};
pub use attributes::{Attribute, Attributes, Extension};
pub use class::{ClassExpr, ClassExprDesc, ClassField, ClassFieldDesc, ClassType, ClassTypeDesc};
pub use config::{ParsetreeConfig, PhraseMode, ValidateConfig};
pub use core_type::{CoreType, CoreTypeDesc};
pub use declarations::{TypeDeclaration, TypeKind, ValueDescription};
pub use error::{Error, Result};
pub use expression::{Case, Expression, ExpressionDesc, TypeConstraint, ValueBinding};
pub use location::{FileId, Located, Location, Position, SourceFiles};
pub use longident::Longident;
pub use matching::select_case;
pub use module::{
    ModuleExpr, ModuleExprDesc, ModuleType, ModuleTypeDesc, Signature, SignatureItem,
    SignatureItemDesc, Structure, StructureItem, StructureItemDesc,
};
pub use node::Node;
pub use pattern::{Pattern, PatternDesc};
pub use seq::{Many, NonEmpty};
pub use toplevel::{DirectiveArgument, ToplevelPhrase};
pub use traversal::{Cursor, Mapper, Visitor};
pub use validate::{Validator, Violation, ViolationKind};
pub use variants::VariantSet;
