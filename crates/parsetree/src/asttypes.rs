//! Leaf types shared by several layers of the tree: constants, flags and
//! argument labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a polymorphic variant tag or object method, without the
/// leading backquote.
pub type Label = String;

/// Literal constant as written in the source.
///
/// Floats keep their source text so that no precision is lost before the
/// code generator picks a representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    /// `42`
    Int(i64),
    /// `'a'`
    Char(char),
    /// `"text"`
    String(String),
    /// `3.14`, `1e10`
    Float(String),
    /// `42l`
    Int32(i32),
    /// `42L`
    Int64(i64),
    /// `42n`
    Nativeint(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecFlag {
    Nonrecursive,
    Recursive,
}

/// Direction of a `for` loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectionFlag {
    /// `for i = a to b`
    Upto,
    /// `for i = a downto b`
    Downto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrivateFlag {
    Private,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutableFlag {
    Immutable,
    Mutable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VirtualFlag {
    Virtual,
    Concrete,
}

/// Whether a class member redefines an inherited one (`method!`, `val!`,
/// `inherit!`, `open!`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverrideFlag {
    Override,
    Fresh,
}

/// Openness of object types and record patterns.
///
/// `{ x; _ }` and `< m : int; .. >` are `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClosedFlag {
    Closed,
    Open,
}

/// Variance annotation on a type parameter: `+'a`, `-'a`, `'a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variance {
    Covariant,
    Contravariant,
    Invariant,
}

/// Calling convention of a function parameter or argument.
///
/// The three cases change how call sites are elaborated and must survive
/// every phase unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArgLabel {
    /// Positional: `f x`
    Nolabel,
    /// Required named: `f ~x`
    Labelled(String),
    /// Optional named: `f ?x`
    Optional(String),
}

impl ArgLabel {
    pub fn labelled(name: impl Into<String>) -> Self {
        ArgLabel::Labelled(name.into())
    }

    pub fn optional(name: impl Into<String>) -> Self {
        ArgLabel::Optional(name.into())
    }

    /// The label name, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            ArgLabel::Nolabel => None,
            ArgLabel::Labelled(s) | ArgLabel::Optional(s) => Some(s),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, ArgLabel::Optional(_))
    }
}

impl fmt::Display for ArgLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgLabel::Nolabel => Ok(()),
            ArgLabel::Labelled(s) => write!(f, "~{s}"),
            ArgLabel::Optional(s) => write!(f, "?{s}"),
        }
    }
}
