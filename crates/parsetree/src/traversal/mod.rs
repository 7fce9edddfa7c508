//! Generic traversal over every layer of the tree.

pub mod cursor;
pub mod mapper;
pub mod visitor;
pub mod walker;

pub use cursor::Cursor;
pub use mapper::*;
pub use visitor::Visitor;
pub use walker::*;
