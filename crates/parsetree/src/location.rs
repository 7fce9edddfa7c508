//! Source locations for parse tree nodes.
//!
//! Every node carries a [`Location`] naming the file it came from and the
//! start/end [`Position`] of its text. File names are kept out of the tree:
//! a [`Location`] stores a [`FileId`] that is resolved through the
//! [`SourceFiles`] side table handed to consumers alongside the tree.

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Identifies a source file in a [`SourceFiles`] table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u32);

impl FileId {
    /// File id used for nodes that do not come from any source file.
    pub const NONE: FileId = FileId(u32::MAX);
}

/// A point in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed)
    pub column: u32,
    /// Byte offset from the start of the file
    pub offset: u32,
}

impl Position {
    pub fn new(line: u32, column: u32, offset: u32) -> Self {
        Position {
            line,
            column,
            offset,
        }
    }
}

/// The span of a node in its source file.
///
/// `ghost` marks locations of nodes the producer synthesised rather than
/// read from the source (for instance the tuple wrapping the arguments of
/// `C (a, b)`). Ghost spans may overlap real ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub file: FileId,
    pub start: Position,
    pub end: Position,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ghost: bool,
}

impl Location {
    /// Create a location spanning `start..end` in `file`
    pub fn new(file: FileId, start: Position, end: Position) -> Self {
        Location {
            file,
            start,
            end,
            ghost: false,
        }
    }

    /// Location for compiler-generated nodes with no source text.
    pub fn none() -> Self {
        Location {
            file: FileId::NONE,
            start: Position::default(),
            end: Position::default(),
            ghost: true,
        }
    }

    /// The same span marked as synthesised.
    pub fn to_ghost(self) -> Self {
        Location {
            ghost: true,
            ..self
        }
    }

    /// Smallest location covering both `self` and `other`.
    ///
    /// The result is a ghost location when either input is.
    pub fn merge(self, other: Location) -> Location {
        debug_assert_eq!(
            self.file, other.file,
            "cannot merge locations from different files"
        );
        Location {
            file: self.file,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            ghost: self.ghost || other.ghost,
        }
    }

    /// Smallest location covering all of `locs`, or `None` when `locs` is
    /// empty or spans more than one file.
    pub fn enclosing<'a>(locs: impl IntoIterator<Item = &'a Location>) -> Option<Location> {
        let mut iter = locs.into_iter();
        let first = *iter.next()?;
        iter.try_fold(first, |acc, loc| {
            (acc.file == loc.file).then(|| acc.merge(*loc))
        })
    }

    pub fn is_none(&self) -> bool {
        self.file == FileId::NONE
    }

    /// Whether `other` lies entirely inside this span.
    pub fn contains(&self, other: &Location) -> bool {
        self.file == other.file
            && self.start.offset <= other.start.offset
            && other.end.offset <= self.end.offset
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// A value paired with its source location.
///
/// Used for names and paths that appear in the tree but are not nodes in
/// their own right, so they carry no attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Located<T> {
    pub txt: T,
    pub loc: Location,
}

impl<T> Located<T> {
    pub fn new(txt: T, loc: Location) -> Self {
        Located { txt, loc }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Located<U> {
        Located {
            txt: f(self.txt),
            loc: self.loc,
        }
    }

    pub fn as_ref(&self) -> Located<&T> {
        Located {
            txt: &self.txt,
            loc: self.loc,
        }
    }
}

/// Side table from [`FileId`] to source file name.
///
/// Ids are dense and assigned in registration order; registering the same
/// name twice returns the id it already has.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceFiles {
    names: IndexSet<String>,
}

impl SourceFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file name and return its id
    pub fn add(&mut self, name: impl Into<String>) -> FileId {
        let (index, _) = self.names.insert_full(name.into());
        FileId(index as u32)
    }

    /// Look up the name registered for `id`
    pub fn name(&self, id: FileId) -> Option<&str> {
        self.names.get_index(id.0 as usize).map(String::as_str)
    }

    /// Look up the id of an already registered name
    pub fn id(&self, name: &str) -> Option<FileId> {
        self.names.get_index_of(name).map(|i| FileId(i as u32))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Render `loc` as `file:line:col-line:col`.
    pub fn describe(&self, loc: &Location) -> String {
        match self.name(loc.file) {
            Some(name) => format!("{name}:{loc}"),
            None => format!("<none>:{loc}"),
        }
    }
}
