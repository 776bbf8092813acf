//! Streaming parser for the flow-style YAML subset used by anvil build files.
//!
//! ```
//! use anvil_yaml::parse_str;
//!
//! let root = parse_str("name: \"anvil\"\nnums: [1, 2]").unwrap();
//! assert_eq!(root.get("name").and_then(|n| n.as_str()), Some("anvil"));
//! ```
mod char_utils;
pub mod emitter;
pub mod options;
pub mod parser;
pub mod scanner;
pub mod source;
pub mod store;

pub use anvil_common::{
    share_count, Entry, ErrorKind, LocatedError, Marker, Node, NodeKind, NodeRef, ParseError,
    YamlError, YamlResult,
};
pub use emitter::{emit_to_string, YamlEmitter};
pub use options::ParseOptions;
pub use parser::Parser;

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Parses a document from any reader.
pub fn parse_reader<R: Read>(reader: R, options: &ParseOptions) -> YamlResult<NodeRef> {
    Parser::new(reader, *options).parse()
}

/// Parses an in-memory document with default options.
pub fn parse_str(input: &str) -> YamlResult<NodeRef> {
    parse_reader(input.as_bytes(), &ParseOptions::default())
}

/// Opens and parses the file at `path`, errors carry the path.
pub fn parse_file(path: impl AsRef<Path>, options: &ParseOptions) -> Result<NodeRef, LocatedError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| LocatedError::new(path, err.into()))?;
    tracing::debug!(path = %path.display(), chunk_size = options.chunk_size, "parsing file");
    parse_reader(file, options).map_err(|err| LocatedError::new(path, err))
}
