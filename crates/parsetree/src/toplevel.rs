//! Toplevel phrases: what an interactive session or a script reads one
//! at a time.

use serde::{Deserialize, Serialize};

use crate::location::Location;
use crate::longident::Longident;
use crate::module::Structure;
use crate::variants::VariantSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ToplevelPhrase {
    /// A sequence of structure items.
    Definitions { structure: Structure },

    /// `#name argument`. Only meaningful in an interactive session; a
    /// batch compiler never accepts one.
    Directive {
        name: String,
        argument: DirectiveArgument,
        loc: Location,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DirectiveArgument {
    None,
    String { value: String },
    Int { value: i64 },
    Ident { lid: Longident },
    Bool { value: bool },
}

impl ToplevelPhrase {
    pub fn definitions(structure: Structure) -> Self {
        ToplevelPhrase::Definitions { structure }
    }

    pub fn directive(loc: Location, name: impl Into<String>, argument: DirectiveArgument) -> Self {
        ToplevelPhrase::Directive {
            name: name.into(),
            argument,
            loc,
        }
    }

    pub fn is_directive(&self) -> bool {
        matches!(self, ToplevelPhrase::Directive { .. })
    }
}

impl VariantSet for ToplevelPhrase {
    const VARIANTS: &'static [&'static str] = &["Definitions", "Directive"];

    fn variant_name(&self) -> &'static str {
        match self {
            ToplevelPhrase::Definitions { .. } => "Definitions",
            ToplevelPhrase::Directive { .. } => "Directive",
        }
    }
}

impl VariantSet for DirectiveArgument {
    const VARIANTS: &'static [&'static str] = &["None", "String", "Int", "Ident", "Bool"];

    fn variant_name(&self) -> &'static str {
        match self {
            DirectiveArgument::None => "None",
            DirectiveArgument::String { .. } => "String",
            DirectiveArgument::Int { .. } => "Int",
            DirectiveArgument::Ident { .. } => "Ident",
            DirectiveArgument::Bool { .. } => "Bool",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_json_shape() {
        let phrase = ToplevelPhrase::directive(
            Location::none(),
            "use",
            DirectiveArgument::String {
                value: "init.ml".to_string(),
            },
        );
        assert!(phrase.is_directive());
        let json = serde_json::to_value(&phrase).unwrap();
        assert_eq!(json["kind"], "Directive");
        assert_eq!(json["argument"]["kind"], "String");
        assert_eq!(json["argument"]["value"], "init.ml");
    }

    #[test]
    fn test_definitions_are_not_directives() {
        assert!(!ToplevelPhrase::definitions(vec![]).is_directive());
    }
}
