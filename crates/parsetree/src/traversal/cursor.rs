/// Position of a walker inside a tree: the chain of segments from the
/// root down to the node being visited.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    path_stack: Vec<String>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a named segment (a variant name, a field, an index).
    pub fn enter(&mut self, segment: impl Into<String>) {
        self.path_stack.push(segment.into());
    }

    pub fn exit(&mut self) {
        self.path_stack.pop();
    }

    /// The current path, segments joined with `/`.
    pub fn path(&self) -> String {
        self.path_stack.join("/")
    }

    pub fn segments(&self) -> &[String] {
        &self.path_stack
    }

    pub fn depth(&self) -> usize {
        self.path_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_exit() {
        let mut cursor = Cursor::new();
        cursor.enter("0");
        cursor.enter("Value");
        assert_eq!(cursor.path(), "0/Value");
        assert_eq!(cursor.depth(), 2);
        cursor.exit();
        assert_eq!(cursor.path(), "0");
        cursor.exit();
        cursor.exit();
        assert_eq!(cursor.depth(), 0);
    }
}
