use crate::options::DEFAULT_MAX_DEPTH;
use anvil_common::{share_count, Entry, Node, NodeRef};
use core::fmt;
use hashbrown::HashMap;
use std::rc::Rc;

/// Writes a node tree back out in flow style.
///
/// A root map is written as bare `key: value` lines, everything below it as
/// `{...}` and `[...]`. Strings are always double quoted. Nodes with more than
/// one owner get an anchor the first time they are written and an alias after.
/// Collections nested deeper than the parser accepts are refused.
#[allow(clippy::module_name_repetitions)]
pub struct YamlEmitter<'a> {
    writer: &'a mut dyn fmt::Write,
    anchors: HashMap<*const Node, usize>,
    next_anchor: usize,
    depth: usize,
}

/// A convenience alias for emitter functions that may fail without returning a value.
pub type EmitResult = Result<(), fmt::Error>;

// from serialize::json
fn escape_str(wr: &mut dyn fmt::Write, v: &str) -> EmitResult {
    wr.write_str("\"")?;

    let bytes = v.as_bytes();
    let mut start = 0;

    while start < bytes.len() {
        let Some(i) = bytes[start..]
            .iter()
            .position(|&b| matches!(b, b'"' | b'\\' | b'\x00'..=b'\x1f' | b'\x7f'))
        else {
            wr.write_str(&v[start..])?;
            break;
        };

        let i = start + i;

        if start < i {
            wr.write_str(&v[start..i])?;
        }

        match bytes[i] {
            b'"' => wr.write_str("\\\"")?,
            b'\\' => wr.write_str("\\\\")?,
            b'\x00' => wr.write_str("\\0")?,
            b'\x07' => wr.write_str("\\a")?,
            b'\x08' => wr.write_str("\\b")?,
            b'\t' => wr.write_str("\\t")?,
            b'\n' => wr.write_str("\\n")?,
            b'\x0b' => wr.write_str("\\v")?,
            b'\x0c' => wr.write_str("\\f")?,
            b'\r' => wr.write_str("\\r")?,
            b'\x1b' => wr.write_str("\\e")?,
            other => write!(wr, "\\x{other:02x}")?,
        }
        start = i + 1;
    }

    wr.write_str("\"")?;
    Ok(())
}

/// Numbers are written so they scan back as numbers.
///
/// Infinities have no literal, an out of range exponent stands in for them.
fn write_number(wr: &mut dyn fmt::Write, n: f64) -> EmitResult {
    if n.is_nan() {
        return Err(fmt::Error);
    }
    if n.is_infinite() {
        return wr.write_str(if n > 0.0 { "1e999" } else { "-1e999" });
    }
    write!(wr, "{n:?}")
}

impl<'a> YamlEmitter<'a> {
    /// Create a new emitter serializing into `writer`.
    pub fn new(writer: &'a mut dyn fmt::Write) -> Self {
        YamlEmitter {
            writer,
            anchors: HashMap::new(),
            next_anchor: 0,
            depth: 0,
        }
    }

    /// Dump a document to the writer.
    ///
    /// # Errors
    /// Returns `fmt::Error` when the writer fails, a number is NaN or the tree
    /// is nested deeper than [`DEFAULT_MAX_DEPTH`].
    pub fn dump(&mut self, root: &NodeRef) -> EmitResult {
        self.anchors.clear();
        self.next_anchor = 0;
        self.depth = 0;
        match &**root {
            Node::Map(entries) if share_count(root) == 0 => {
                for entry in entries {
                    self.emit_entry(entry)?;
                    writeln!(self.writer)?;
                }
                Ok(())
            }
            _ => {
                self.emit_node(root)?;
                writeln!(self.writer)
            }
        }
    }

    fn emit_entry(&mut self, entry: &Entry) -> EmitResult {
        // keys come from the key scanner and never need quoting
        write!(self.writer, "{}: ", entry.key)?;
        self.emit_node(&entry.value)
    }

    fn emit_node(&mut self, node: &NodeRef) -> EmitResult {
        if share_count(node) > 0 {
            let ptr = Rc::as_ptr(node);
            if let Some(id) = self.anchors.get(&ptr) {
                return write!(self.writer, "*a{id}");
            }
            self.next_anchor += 1;
            self.anchors.insert(ptr, self.next_anchor);
            write!(self.writer, "&a{} ", self.next_anchor)?;
        }

        match &**node {
            Node::Map(entries) => self.nested(|emitter| emitter.emit_mapping(entries)),
            Node::List(items) => self.nested(|emitter| emitter.emit_sequence(items)),
            Node::String(s) => escape_str(self.writer, s),
            Node::Number(n) => write_number(self.writer, *n),
            Node::Boolean(true) => self.writer.write_str("true"),
            Node::Boolean(false) => self.writer.write_str("false"),
        }
    }

    fn nested(&mut self, emit: impl FnOnce(&mut Self) -> EmitResult) -> EmitResult {
        if self.depth >= DEFAULT_MAX_DEPTH {
            return Err(fmt::Error);
        }
        self.depth += 1;
        let res = emit(self);
        self.depth -= 1;
        res
    }

    fn emit_mapping(&mut self, entries: &[Entry]) -> EmitResult {
        self.writer.write_str("{")?;
        for (cnt, entry) in entries.iter().enumerate() {
            if cnt > 0 {
                self.writer.write_str(", ")?;
            }
            self.emit_entry(entry)?;
        }
        self.writer.write_str("}")
    }

    fn emit_sequence(&mut self, items: &[NodeRef]) -> EmitResult {
        self.writer.write_str("[")?;
        for (cnt, item) in items.iter().enumerate() {
            if cnt > 0 {
                self.writer.write_str(", ")?;
            }
            self.emit_node(item)?;
        }
        self.writer.write_str("]")
    }
}

/// Emits `root` into a fresh `String`.
pub fn emit_to_string(root: &NodeRef) -> Result<String, fmt::Error> {
    let mut out = String::new();
    YamlEmitter::new(&mut out).dump(root)?;
    Ok(out)
}
