//! Attributes and extension nodes.
//!
//! Both are escape hatches: an identifier plus an arbitrary expression
//! payload, interpreted only by downstream tooling. Nothing at this layer
//! checks attribute names; an unknown name is not an error.

use serde::{Deserialize, Serialize};

use crate::asttypes::Constant;
use crate::expression::{Expression, ExpressionDesc};
use crate::location::{Located, Location};
use crate::longident::Longident;
use crate::node::Node;

/// `[@name payload]`, `[@@name payload]` or `[@@@name payload]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: Located<String>,
    pub payload: Box<Expression>,
}

/// `[%name payload]`: a placeholder node expanded by a rewriter before
/// later phases run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    pub name: Located<String>,
    pub payload: Box<Expression>,
}

/// Attributes attached to a node, in source order.
pub type Attributes = Vec<Attribute>;

/// Payload used when an attribute or extension is written without one.
fn unit_payload(loc: Location) -> Box<Expression> {
    Box::new(Node::new(
        ExpressionDesc::Construct {
            lid: Located::new(Longident::ident("()"), loc.to_ghost()),
            arg: None,
            explicit_arity: false,
        },
        loc.to_ghost(),
    ))
}

impl Attribute {
    pub fn new(name: Located<String>, payload: Expression) -> Self {
        Attribute {
            name,
            payload: Box::new(payload),
        }
    }

    /// Attribute with an empty payload: `[@inline]`.
    pub fn marker(name: impl Into<String>, loc: Location) -> Self {
        Attribute {
            name: Located::new(name.into(), loc),
            payload: unit_payload(loc),
        }
    }

    /// The payload as a string constant, as in `[@@ocaml.doc "text"]`.
    pub fn string_payload(&self) -> Option<&str> {
        match &self.payload.desc {
            ExpressionDesc::Constant {
                constant: Constant::String(s),
            } => Some(s),
            _ => None,
        }
    }
}

impl Extension {
    pub fn new(name: Located<String>, payload: Expression) -> Self {
        Extension {
            name,
            payload: Box::new(payload),
        }
    }

    /// Extension with an empty payload: `[%here]`.
    pub fn marker(name: impl Into<String>, loc: Location) -> Self {
        Extension {
            name: Located::new(name.into(), loc),
            payload: unit_payload(loc),
        }
    }
}
