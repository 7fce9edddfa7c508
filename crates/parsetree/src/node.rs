//! The uniform node shape shared by every layer.

use serde::{Deserialize, Serialize};

use crate::attributes::{Attribute, Attributes};
use crate::location::Location;

/// A syntactic node: one variant of a closed variant set `D`, its source
/// span and the attributes attached to it.
///
/// Every node owns its location and attribute list independently of its
/// parent, so tooling can report and round-trip at any granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<D> {
    pub desc: D,
    pub loc: Location,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Attributes,
}

impl<D> Node<D> {
    /// Create a node with no attributes
    pub fn new(desc: D, loc: Location) -> Self {
        Node {
            desc,
            loc,
            attributes: Vec::new(),
        }
    }

    /// Replace the attribute list, keeping source order
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Append one attribute after the existing ones
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// First attribute named `name`, if any.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name.txt == name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn into_parts(self) -> (D, Location, Attributes) {
        (self.desc, self.loc, self.attributes)
    }
}
