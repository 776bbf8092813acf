extern crate core;

pub mod error;
pub mod node;

pub use error::{ErrorKind, LocatedError, ParseError, YamlError, YamlResult};
pub use node::{share_count, Entry, Mapping, Node, NodeError, NodeKind, NodeRef, Sequence};

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Marker {
    /// index in bytes of the input.
    pub pos: usize,
    /// Column of mark. One indexed, counted in bytes.
    pub col: u32,
    /// Line of mark. One indexed.
    pub line: u32,
}

impl Marker {
    pub const fn new(pos: usize, line: u32, col: u32) -> Self {
        Marker { pos, col, line }
    }
}

impl Default for Marker {
    fn default() -> Self {
        Marker {
            pos: 0,
            col: 1,
            line: 1,
        }
    }
}

impl Display for Marker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
