pub mod consts;

use anvil_common::{share_count, ErrorKind, Node, NodeRef, ParseError, YamlError, YamlResult};
use anvil_yaml::options::DEFAULT_CHUNK_SIZE;
use anvil_yaml::{parse_reader, ParseOptions};
use std::collections::HashMap;
use std::fmt::Write;
use std::rc::Rc;

/// Chunk sizes every document in the bench is parsed with.
pub const CHUNK_SIZES: [usize; 5] = [1, 2, 3, 7, DEFAULT_CHUNK_SIZE];

pub fn parse_with_chunk(input: &str, chunk_size: usize) -> YamlResult<NodeRef> {
    let options = ParseOptions::default().with_chunk_size(chunk_size);
    parse_reader(input.as_bytes(), &options)
}

/// Flattens a tree into one line per node:
///
/// ```text
/// +MAP
/// =KEY a
/// +SEQ &1
/// =NUM 1.0
/// -SEQ
/// =KEY b
/// =ALI *1
/// -MAP
/// ```
///
/// Nodes with more than one owner are numbered on first sight and shown as
/// `=ALI` afterwards.
pub fn dump_tree(root: &NodeRef) -> String {
    let mut line = String::new();
    let mut seen = HashMap::new();
    write_node(&mut line, root, &mut seen);
    line
}

fn write_node(line: &mut String, node: &NodeRef, seen: &mut HashMap<*const Node, usize>) {
    let mut anchor = String::new();
    if share_count(node) > 0 {
        let ptr = Rc::as_ptr(node);
        if let Some(id) = seen.get(&ptr) {
            let _ = write!(line, "\n=ALI *{id}");
            return;
        }
        let id = seen.len() + 1;
        seen.insert(ptr, id);
        anchor = format!(" &{id}");
    }

    let _ = match &**node {
        Node::Map(entries) => {
            let _ = write!(line, "\n+MAP{anchor}");
            for entry in entries {
                let _ = write!(line, "\n=KEY {}", entry.key);
                write_node(line, &entry.value, seen);
            }
            write!(line, "\n-MAP")
        }
        Node::List(items) => {
            let _ = write!(line, "\n+SEQ{anchor}");
            for item in items {
                write_node(line, item, seen);
            }
            write!(line, "\n-SEQ")
        }
        Node::String(s) => write!(line, "\n=STR{anchor} {s}"),
        Node::Number(n) => write!(line, "\n=NUM{anchor} {n:?}"),
        Node::Boolean(b) => write!(line, "\n=BOOL{anchor} {b}"),
    };
}

///
/// Assert that for given input, the parser builds the expected tree with every chunk size
///
/// # Panics
///
///    Function panics if parsing fails or if the dumped tree differs from `expected`.
pub fn assert_eq_tree(input: &str, expected: &str) {
    let expected = unescape_text(expected);
    for chunk_size in CHUNK_SIZES {
        let root = match parse_with_chunk(input, chunk_size) {
            Ok(root) => root,
            Err(err) => panic!("chunk size {chunk_size}: {err} in case: {input}"),
        };
        assert_eq!(
            dump_tree(&root),
            expected,
            "chunk size {chunk_size}, error in case: {input}"
        );
    }
}

///
/// Assert that for given input, parsing fails with `kind` at the same place for every chunk size
///
/// # Panics
///
///    Function panics if parsing succeeds, fails with another kind, or the error differs between
///    chunk sizes.
pub fn assert_parse_err(input: &str, kind: ErrorKind) -> YamlError {
    let mut first: Option<YamlError> = None;
    for chunk_size in CHUNK_SIZES {
        let err = match parse_with_chunk(input, chunk_size) {
            Err(ParseError::Syntax(err)) => err,
            Err(ParseError::Io(err)) => panic!("unexpected io error {err} in case: {input}"),
            Ok(root) => panic!(
                "expected {kind}, got a tree in case: {input}{}",
                dump_tree(&root)
            ),
        };
        assert_eq!(err.kind, kind, "chunk size {chunk_size}, case: {input}");
        match &first {
            Some(prev) => assert_eq!(&err, prev, "chunk size {chunk_size}, case: {input}"),
            None => first = Some(err),
        }
    }
    first.expect("CHUNK_SIZES is not empty")
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum EscapeState {
    Default,
    Slash,
}

pub fn unescape_text(text: &str) -> String {
    let mut output = Vec::with_capacity(text.len());
    let chars = text.as_bytes();
    let mut state = EscapeState::Default;
    for char in chars {
        match (char, state) {
            (b'\\', EscapeState::Default) => {
                state = EscapeState::Slash;
            }
            (b'n', EscapeState::Slash) => {
                state = EscapeState::Default;
                output.push(b'\n');
            }
            (b'r', EscapeState::Slash) => {
                state = EscapeState::Default;
                output.push(b'\r');
            }
            (b't', EscapeState::Slash) => {
                state = EscapeState::Default;
                output.push(b'\t');
            }
            (b'\\', EscapeState::Slash) => {
                state = EscapeState::Default;
                output.push(b'\\');
            }
            (_, EscapeState::Slash) => {
                state = EscapeState::Default;
                output.push(b'\\');
                output.push(*char);
            }
            (_, EscapeState::Default) => output.push(*char),
        }
    }

    String::from_utf8(output).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_shared() {
        let root = anvil_yaml::parse_str("a: &x [1]\nb: *x").unwrap();
        assert_eq!(
            dump_tree(&root),
            "\n+MAP\n=KEY a\n+SEQ &1\n=NUM 1.0\n-SEQ\n=KEY b\n=ALI *1\n-MAP"
        );
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape_text(r"a\tb\\c\q"), "a\tb\\c\\q");
    }
}
