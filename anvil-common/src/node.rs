use std::fmt::{Display, Formatter};
use std::rc::Rc;
use thiserror::Error;

/// Shared handle to a parsed node. Aliased subtrees are the same allocation.
pub type NodeRef = Rc<Node>;

/// Ordered sequence of [`Node`]s
pub type Sequence = Vec<NodeRef>;

/// Key-value pairs of a map, kept in document order.
pub type Mapping = Vec<Entry>;

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: String,
    pub value: NodeRef,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: NodeRef) -> Self {
        Entry {
            key: key.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // flow style like `{x: Y, a: B}`, or the bare top-level map
    Map(Mapping),
    // flow style like `[x, x, x]`
    List(Sequence),
    String(String),
    Number(f64),
    Boolean(bool),
}

impl Default for Node {
    fn default() -> Self {
        Node::Map(Vec::new())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Map,
    List,
    String,
    Number,
    Boolean,
}

impl NodeKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            NodeKind::Map => "map",
            NodeKind::List => "list",
            NodeKind::String => "string",
            NodeKind::Number => "number",
            NodeKind::Boolean => "boolean",
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NodeError {
    #[error("expected a map, found a {0}")]
    NotAMap(NodeKind),
    #[error("key `{0}` not found")]
    NotFound(String),
}

impl Node {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Map(_) => NodeKind::Map,
            Node::List(_) => NodeKind::List,
            Node::String(_) => NodeKind::String,
            Node::Number(_) => NodeKind::Number,
            Node::Boolean(_) => NodeKind::Boolean,
        }
    }

    /// First entry under `key`, `None` when missing or when `self` is not a map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&NodeRef> {
        match self {
            Node::Map(entries) => entries
                .iter()
                .find(|entry| entry.key == key)
                .map(|entry| &entry.value),
            _ => None,
        }
    }

    /// Like [`Node::get`] but reports why nothing was found.
    pub fn lookup(&self, key: &str) -> Result<&NodeRef, NodeError> {
        match self {
            Node::Map(_) => self
                .get(key)
                .ok_or_else(|| NodeError::NotFound(key.to_string())),
            other => Err(NodeError::NotAMap(other.kind())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[NodeRef]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&[Entry]> {
        match self {
            Node::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Node::Map(_))
    }
}

/// Number of owners besides the first one.
///
/// Zero means the node is exclusively owned by its parent, anything above
/// means it was reached through an alias.
#[must_use]
pub fn share_count(node: &NodeRef) -> usize {
    Rc::strong_count(node) - 1
}
