//! Long identifiers: possibly qualified names such as `List.map` or
//! `Map.Make(String).t`.
//!
//! Cross references in the tree are always by long identifier, resolved by
//! later phases. The tree never points at another node directly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Longident {
    /// Unqualified name: `x`, `List`
    Lident(String),
    /// Qualified name: `M.x`
    Ldot(Box<Longident>, String),
    /// Functor application inside a path: `F(X)`
    Lapply(Box<Longident>, Box<Longident>),
}

impl Longident {
    pub fn ident(name: impl Into<String>) -> Self {
        Longident::Lident(name.into())
    }

    pub fn dot(self, name: impl Into<String>) -> Self {
        Longident::Ldot(Box::new(self), name.into())
    }

    pub fn apply(self, arg: Longident) -> Self {
        Longident::Lapply(Box::new(self), Box::new(arg))
    }

    /// Build a dotted path from its components.
    pub fn from_components<I, S>(components: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut iter = components.into_iter();
        let first = iter.next().ok_or(Error::EmptySequence {
            what: "long identifier",
        })?;
        Ok(iter.fold(Longident::ident(first), |acc, s| acc.dot(s)))
    }

    /// The last component (`map` in `List.map`).
    ///
    /// An application has no last component of its own; the functor's is
    /// returned.
    pub fn last(&self) -> &str {
        match self {
            Longident::Lident(s) => s,
            Longident::Ldot(_, s) => s,
            Longident::Lapply(f, _) => f.last(),
        }
    }

    /// The components of a path without applications, or `None` if the
    /// path contains one.
    pub fn flatten(&self) -> Option<Vec<&str>> {
        match self {
            Longident::Lident(s) => Some(vec![s.as_str()]),
            Longident::Ldot(prefix, s) => {
                let mut parts = prefix.flatten()?;
                parts.push(s);
                Some(parts)
            }
            Longident::Lapply(_, _) => None,
        }
    }

    pub fn is_qualified(&self) -> bool {
        !matches!(self, Longident::Lident(_))
    }
}

impl fmt::Display for Longident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Longident::Lident(s) => write!(f, "{s}"),
            Longident::Ldot(prefix, s) => write!(f, "{prefix}.{s}"),
            Longident::Lapply(func, arg) => write!(f, "{func}({arg})"),
        }
    }
}

impl From<&str> for Longident {
    fn from(name: &str) -> Self {
        Longident::ident(name)
    }
}

impl FromStr for Longident {
    type Err = Error;

    /// Parse a textual path like `A.B.c` or `F(X).t`.
    ///
    /// Only alphanumeric components with `_` and `'` are accepted; operator
    /// names must be built with [`Longident::ident`].
    fn from_str(s: &str) -> Result<Self> {
        let mut parser = PathParser {
            src: s,
            pos: 0,
        };
        let lid = parser.path()?;
        if parser.pos != s.len() {
            return Err(Error::InvalidLongident(s.to_string()));
        }
        Ok(lid)
    }
}

struct PathParser<'a> {
    src: &'a str,
    pos: usize,
}

impl PathParser<'_> {
    fn path(&mut self) -> Result<Longident> {
        let mut lid = Longident::Lident(self.component()?);
        loop {
            match self.peek() {
                Some('.') => {
                    self.pos += 1;
                    lid = lid.dot(self.component()?);
                }
                Some('(') => {
                    self.pos += 1;
                    let arg = self.path()?;
                    if self.peek() != Some(')') {
                        return Err(self.error());
                    }
                    self.pos += 1;
                    lid = lid.apply(arg);
                }
                _ => return Ok(lid),
            }
        }
    }

    fn component(&mut self) -> Result<String> {
        let rest = &self.src[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '\''))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error());
        }
        self.pos += len;
        Ok(rest[..len].to_string())
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn error(&self) -> Error {
        Error::InvalidLongident(self.src.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let lid: Longident = "x".parse().unwrap();
        assert_eq!(lid, Longident::ident("x"));
    }

    #[test]
    fn test_parse_dotted() {
        let lid: Longident = "Stdlib.List.map".parse().unwrap();
        assert_eq!(lid.flatten(), Some(vec!["Stdlib", "List", "map"]));
        assert_eq!(lid.last(), "map");
        assert!(lid.is_qualified());
    }

    #[test]
    fn test_parse_application() {
        let lid: Longident = "Map.Make(String).t".parse().unwrap();
        let expected = Longident::ident("Map")
            .dot("Make")
            .apply(Longident::ident("String"))
            .dot("t");
        assert_eq!(lid, expected);
        assert_eq!(lid.flatten(), None);
        assert_eq!(lid.to_string(), "Map.Make(String).t");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Longident>().is_err());
        assert!("A..b".parse::<Longident>().is_err());
        assert!("F(X".parse::<Longident>().is_err());
        assert!("a b".parse::<Longident>().is_err());
    }

    #[test]
    fn test_from_components() {
        let lid = Longident::from_components(["A", "B", "c"]).unwrap();
        assert_eq!(lid.to_string(), "A.B.c");
        assert!(Longident::from_components(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_operator_ident_display() {
        assert_eq!(Longident::ident("+.").to_string(), "+.");
    }
}
