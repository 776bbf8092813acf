use crate::options::ParseOptions;
use crate::scanner::{Scanner, Token, TokenKind};
use anvil_common::{Entry, ErrorKind, Mapping, Node, NodeRef, ParseError, YamlError, YamlResult};
use hashbrown::HashMap;
use std::borrow::Cow;
use std::io::Read;
use std::rc::Rc;
use tracing::debug;

/// Builds a node tree from a token stream.
///
/// All state (scanner, value store, alias table) lives for a single parse and
/// is dropped with the parser.
pub struct Parser<R> {
    scanner: Scanner<R>,
    aliases: Vec<(String, NodeRef)>,
    pending_anchor: bool,
    depth: usize,
    deepest: usize,
    max_depth: usize,
}

/// Where an entry of the map under construction came from.
#[derive(Clone, Copy)]
struct Slot {
    at: usize,
    explicit: bool,
}

#[derive(Default)]
struct MapBuilder {
    entries: Mapping,
    index: HashMap<String, Slot>,
}

impl MapBuilder {
    fn is_explicit(&self, key: &str) -> bool {
        self.index.get(key).is_some_and(|slot| slot.explicit)
    }

    /// Explicit keys replace merged values in place.
    fn insert_explicit(&mut self, key: String, value: NodeRef) {
        match self.index.get_mut(key.as_str()) {
            Some(slot) => {
                slot.explicit = true;
                self.entries[slot.at].value = value;
            }
            None => {
                self.index.insert(
                    key.clone(),
                    Slot {
                        at: self.entries.len(),
                        explicit: true,
                    },
                );
                self.entries.push(Entry::new(key, value));
            }
        }
    }

    /// Merged entries never override anything already present.
    fn insert_merged(&mut self, entry: Entry) {
        if self.index.contains_key(entry.key.as_str()) {
            return;
        }
        self.index.insert(
            entry.key.clone(),
            Slot {
                at: self.entries.len(),
                explicit: false,
            },
        );
        self.entries.push(entry);
    }

    fn build(self) -> NodeRef {
        Rc::new(Node::Map(self.entries))
    }
}

impl<R: Read> Parser<R> {
    pub fn new(reader: R, options: ParseOptions) -> Self {
        Parser {
            scanner: Scanner::new(reader, options),
            aliases: Vec::new(),
            pending_anchor: false,
            depth: 0,
            deepest: 0,
            max_depth: options.max_depth,
        }
    }

    /// Parses the whole input into a root node.
    ///
    /// A document starting with a key (or an empty one) is a bare map,
    /// anything else is a single value followed by end of input.
    pub fn parse(mut self) -> YamlResult<NodeRef> {
        let first = self.scanner.peek_token()?;
        let root = match first.kind {
            kind if kind.starts_value() => self.parse_value()?,
            _ => self.parse_map()?,
        };

        let tail = self.scanner.next_token()?;
        if tail.kind != TokenKind::Eof {
            return Err(self.unexpected(&tail, "EOF"));
        }

        debug!(
            tokens = self.scanner.tokens_produced(),
            refills = self.scanner.chunk_refills(),
            aliases = self.aliases.len(),
            max_depth = self.deepest,
            buffers = self.scanner.store().buffer_count(),
            bytes = self.scanner.store().bytes_used(),
            "parsed document"
        );
        Ok(root)
    }

    /// Human readable form of a token for diagnostics, with its text when it has any.
    fn describe(&self, tok: &Token) -> Cow<'static, str> {
        if !tok.kind.has_text() {
            return Cow::Borrowed(tok.kind.describe());
        }
        let text = String::from_utf8_lossy(self.scanner.text(tok));
        let sigil = match tok.kind {
            TokenKind::Anchor => "&",
            TokenKind::Alias => "*",
            _ => "",
        };
        Cow::Owned(format!("{} `{}{}`", tok.kind.describe(), sigil, text))
    }

    fn unexpected(&self, tok: &Token, expected: &'static str) -> ParseError {
        YamlError::new(ErrorKind::UnexpectedToken, tok.mark)
            .expected(expected)
            .got(self.describe(tok))
            .with_len(tok.len)
            .into()
    }

    fn error_at(kind: ErrorKind, tok: &Token, got: String) -> ParseError {
        YamlError::new(kind, tok.mark)
            .got(got)
            .with_len(tok.len)
            .into()
    }

    fn parse_map(&mut self) -> YamlResult<NodeRef> {
        let nested = self.depth > 0;
        let mut map = MapBuilder::default();
        // an entry was read and no comma followed it yet
        let mut need_comma = false;

        loop {
            let tok = self.scanner.next_token()?;
            match tok.kind {
                TokenKind::CloseMap if nested => break,
                TokenKind::Eof if !nested => break,
                TokenKind::Eof => return Err(self.unexpected(&tok, "`}`")),
                TokenKind::Comma if nested && need_comma => {
                    need_comma = false;
                    continue;
                }
                TokenKind::Key if need_comma => {
                    return Err(Self::error_at(ErrorKind::MissingComma, &tok, String::new()))
                }
                TokenKind::Key => {}
                _ if need_comma => return Err(self.unexpected(&tok, "`,` or `}`")),
                _ => return Err(self.unexpected(&tok, "a key")),
            }

            let key = self.scanner.text_str(&tok)?.to_owned();
            if key == "<<" {
                self.merge_into(&mut map)?;
            } else {
                if map.is_explicit(&key) {
                    return Err(Self::error_at(
                        ErrorKind::KeyRedefinition,
                        &tok,
                        format!("`{key}`"),
                    ));
                }
                let next = self.scanner.peek_token()?;
                if matches!(
                    next.kind,
                    TokenKind::Comma
                        | TokenKind::CloseMap
                        | TokenKind::CloseSeq
                        | TokenKind::Key
                        | TokenKind::Eof
                ) {
                    return Err(Self::error_at(
                        ErrorKind::MissingValue,
                        &tok,
                        format!("`{key}`"),
                    ));
                }
                let value = self.parse_value()?;
                map.insert_explicit(key, value);
            }
            need_comma = nested;
        }

        Ok(map.build())
    }

    /// Handles the value of a `<<` key.
    fn merge_into(&mut self, map: &mut MapBuilder) -> YamlResult<()> {
        let next = self.scanner.peek_token()?;
        if !matches!(next.kind, TokenKind::OpenMap | TokenKind::Alias) {
            return Err(self.unexpected(&next, "map or map alias"));
        }

        let source = self.parse_value()?;
        let entries = match Rc::try_unwrap(source) {
            // inline map, nobody else holds it
            Ok(Node::Map(entries)) => entries,
            Ok(other) => return Err(Self::not_a_map(&next, &other)),
            // aliased, every value gets one more owner
            Err(shared) => match &*shared {
                Node::Map(entries) => entries.clone(),
                other => return Err(Self::not_a_map(&next, other)),
            },
        };

        for entry in entries {
            map.insert_merged(entry);
        }
        Ok(())
    }

    fn not_a_map(tok: &Token, node: &Node) -> ParseError {
        YamlError::new(ErrorKind::UnexpectedToken, tok.mark)
            .expected("map")
            .got(node.kind().name())
            .with_len(tok.len)
            .into()
    }

    fn parse_value(&mut self) -> YamlResult<NodeRef> {
        let tok = self.scanner.next_token()?;
        let anchored = std::mem::replace(&mut self.pending_anchor, false);

        match tok.kind {
            TokenKind::Anchor => {
                if anchored {
                    return Err(self.unexpected(&tok, "a value"));
                }
                let name = self.scanner.text_str(&tok)?.to_owned();
                if self.aliases.iter().any(|(known, _)| *known == name) {
                    return Err(Self::error_at(
                        ErrorKind::RedefinedAlias,
                        &tok,
                        format!("`&{name}`"),
                    ));
                }
                self.pending_anchor = true;
                let value = self.parse_value()?;
                self.aliases.push((name, Rc::clone(&value)));
                Ok(value)
            }
            TokenKind::Alias => {
                let name = self.scanner.text_str(&tok)?;
                match self.aliases.iter().find(|(known, _)| known == name) {
                    Some((_, node)) => Ok(Rc::clone(node)),
                    None => Err(Self::error_at(
                        ErrorKind::UndefinedAlias,
                        &tok,
                        format!("`*{name}`"),
                    )),
                }
            }
            TokenKind::String | TokenKind::StringLit => {
                let text = self.scanner.text_str(&tok)?;
                Ok(Rc::new(Node::String(text.to_owned())))
            }
            TokenKind::Number => {
                let text = self.scanner.text_str(&tok)?;
                let cleaned: String = text.chars().filter(|&c| c != '_').collect();
                match cleaned.parse::<f64>() {
                    Ok(num) => Ok(Rc::new(Node::Number(num))),
                    Err(_) => Err(Self::error_at(
                        ErrorKind::WrongSyntax,
                        &tok,
                        format!("`{text}` is not a number"),
                    )),
                }
            }
            TokenKind::Boolean(b) => Ok(Rc::new(Node::Boolean(b))),
            TokenKind::OpenMap => {
                self.enter(&tok)?;
                let map = self.parse_map();
                self.depth -= 1;
                map
            }
            TokenKind::OpenSeq => {
                self.enter(&tok)?;
                let list = self.parse_list();
                self.depth -= 1;
                list
            }
            _ => Err(self.unexpected(&tok, "a value")),
        }
    }

    /// Steps into a `{` or `[`, the recursion below is bounded by `max_depth`.
    fn enter(&mut self, tok: &Token) -> YamlResult<()> {
        if self.depth >= self.max_depth {
            return Err(Self::error_at(
                ErrorKind::WrongSyntax,
                tok,
                format!("nesting deeper than {}", self.max_depth),
            ));
        }
        self.depth += 1;
        self.deepest = self.deepest.max(self.depth);
        Ok(())
    }

    fn parse_list(&mut self) -> YamlResult<NodeRef> {
        let mut items = Vec::new();
        if self.scanner.peek_token()?.kind == TokenKind::CloseSeq {
            self.scanner.next_token()?;
            return Ok(Rc::new(Node::List(items)));
        }

        loop {
            items.push(self.parse_value()?);
            let tok = self.scanner.next_token()?;
            match tok.kind {
                TokenKind::Comma => continue,
                TokenKind::CloseSeq => break,
                kind if kind.starts_value() => {
                    return Err(Self::error_at(ErrorKind::MissingComma, &tok, String::new()))
                }
                _ => return Err(self.unexpected(&tok, "`]`")),
            }
        }

        Ok(Rc::new(Node::List(items)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvil_common::share_count;

    fn parse(input: &str) -> NodeRef {
        Parser::new(input.as_bytes(), ParseOptions::default())
            .parse()
            .unwrap()
    }

    fn parse_err(input: &str) -> YamlError {
        match Parser::new(input.as_bytes(), ParseOptions::default()).parse() {
            Err(ParseError::Syntax(err)) => err,
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }

    fn num(n: f64) -> NodeRef {
        Rc::new(Node::Number(n))
    }

    #[test]
    fn test_bare_map() {
        let root = parse("name: \"hello world\"\nversion: 1");
        assert_eq!(
            *root,
            Node::Map(vec![
                Entry::new("name", Rc::new(Node::String("hello world".into()))),
                Entry::new("version", num(1.0)),
            ])
        );
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(*parse(""), Node::Map(vec![]));
        assert_eq!(*parse("# only a comment\n"), Node::Map(vec![]));
    }

    #[test]
    fn test_top_level_value() {
        assert_eq!(*parse("[1, 2]"), Node::List(vec![num(1.0), num(2.0)]));
        assert_eq!(*parse("'x'"), Node::String("x".into()));
        assert_eq!(*parse("{}"), Node::Map(vec![]));
    }

    #[test]
    fn test_alias_shares_node() {
        let root = parse("a: &n {x: 1}\nb: *n");
        let a = root.get("a").unwrap();
        let b = root.get("b").unwrap();
        assert!(Rc::ptr_eq(a, b));
        assert_eq!(share_count(a), 1);
    }

    #[test]
    fn test_merge_aliased_map() {
        let root = parse("a: &base {x: 1}\nc: {<<: *base, y: 2}");
        let a = root.get("a").unwrap();
        let c = root.get("c").unwrap();
        assert_eq!(
            **c,
            Node::Map(vec![Entry::new("x", num(1.0)), Entry::new("y", num(2.0))])
        );
        let ax = a.get("x").unwrap();
        let cx = c.get("x").unwrap();
        assert!(Rc::ptr_eq(ax, cx));
        assert_eq!(share_count(ax), 1);
    }

    #[test]
    fn test_merge_inline_map() {
        let root = parse("c: {<<: {x: 1, y: 2}, z: 3}");
        let c = root.get("c").unwrap();
        let keys: Vec<&str> = c.as_map().unwrap().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["x", "y", "z"]);
        assert_eq!(share_count(c.get("x").unwrap()), 0);
    }

    #[test]
    fn test_explicit_beats_merged() {
        let root = parse("b: &b {x: 1, y: 2}\nc: {<<: *b, x: 9}");
        let c = root.get("c").unwrap();
        assert_eq!(
            **c,
            Node::Map(vec![Entry::new("x", num(9.0)), Entry::new("y", num(2.0))])
        );
    }

    #[test]
    fn test_first_merge_wins() {
        let root = parse("p: &p {x: 1}\nq: &q {x: 2, y: 3}\nr: {x: 0, <<: *p, <<: *q}");
        let r = root.get("r").unwrap();
        assert_eq!(
            **r,
            Node::Map(vec![Entry::new("x", num(0.0)), Entry::new("y", num(3.0))])
        );
    }

    #[test]
    fn test_nested_anchor_inside_anchored_value() {
        let root = parse("a: &outer {b: &inner [1]}\nc: *inner\nd: *outer");
        assert!(Rc::ptr_eq(
            root.get("c").unwrap(),
            root.get("a").unwrap().get("b").unwrap()
        ));
        assert!(Rc::ptr_eq(root.get("d").unwrap(), root.get("a").unwrap()));
    }

    #[test]
    fn test_numbers() {
        let root = parse("nums: [1_000_000, +1, -1, 1.5e3]");
        assert_eq!(
            **root.get("nums").unwrap(),
            Node::List(vec![num(1_000_000.0), num(1.0), num(-1.0), num(1500.0)])
        );
    }

    #[test]
    fn test_unclosed_quote() {
        let err = parse_err("s: \"abc");
        assert_eq!(err.kind, ErrorKind::UnclosedQuote);
        assert_eq!(err.expected, "`\"`");
        assert_eq!(err.got, "EOF");
    }

    #[test]
    fn test_list_closed_by_brace() {
        let err = parse_err("[1, 2}");
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
        assert_eq!(err.expected, "`]`");
        assert_eq!(err.got, "`}`");
        assert_eq!(err.message(), "Expected `]`, found `}`.");
    }

    #[test]
    fn test_key_redefinition() {
        let err = parse_err("a: 1\na: 2");
        assert_eq!(err.kind, ErrorKind::KeyRedefinition);
        assert_eq!(err.message(), "`a` is redefined in the current context.");
        assert_eq!(err.mark.line, 2);
    }

    #[test]
    fn test_alias_errors() {
        let err = parse_err("a: *missing");
        assert_eq!(err.kind, ErrorKind::UndefinedAlias);
        assert_eq!(err.message(), "Alias `*missing` is undefined.");

        let err = parse_err("a: &x 1\nb: &x 2");
        assert_eq!(err.kind, ErrorKind::RedefinedAlias);

        // not visible while its own value is being parsed
        let err = parse_err("a: &self [*self]");
        assert_eq!(err.kind, ErrorKind::UndefinedAlias);

        let err = parse_err("a: &x &y 1");
        assert_eq!(err.kind, ErrorKind::UnexpectedToken);
        assert_eq!(err.got, "anchor `&y`");
    }

    #[test]
    fn test_missing_value_and_comma() {
        let err = parse_err("a:\nb: 1");
        assert_eq!(err.kind, ErrorKind::MissingValue);
        assert_eq!(err.message(), "Missing value after key `a`.");

        assert_eq!(parse_err("{a: 1 b: 2}").kind, ErrorKind::MissingComma);
        assert_eq!(parse_err("[1 2]").kind, ErrorKind::MissingComma);
    }

    #[test]
    fn test_commas() {
        assert_eq!(
            *parse("{a: 1, b: 2,}"),
            Node::Map(vec![Entry::new("a", num(1.0)), Entry::new("b", num(2.0))])
        );
        assert_eq!(parse_err("a: 1, b: 2").kind, ErrorKind::UnexpectedToken);
        assert_eq!(parse_err("{, a: 1}").kind, ErrorKind::UnexpectedToken);
        assert_eq!(parse_err("{a: 1,, b: 2}").kind, ErrorKind::UnexpectedToken);
        let err = parse_err("[1,]");
        assert_eq!(err.expected, "a value");
    }

    #[test]
    fn test_merge_errors() {
        let err = parse_err("a: {<<: [1]}");
        assert_eq!(err.expected, "map or map alias");
        let err = parse_err("l: &l [1]\na: {<<: *l}");
        assert_eq!(err.expected, "map");
        assert_eq!(err.got, "list");
    }

    #[test]
    fn test_nesting_limit() {
        let opts = ParseOptions::default().with_max_depth(3);
        let parse_with = |input: &str| Parser::new(input.as_bytes(), opts).parse();

        assert!(parse_with("[{a: [1]}]").is_ok());
        assert!(parse_with("a: {b: {c: [1]}}").is_ok());

        let Err(ParseError::Syntax(err)) = parse_with("[{a: [[1]]}]") else {
            panic!("expected a syntax error");
        };
        assert_eq!(err.kind, ErrorKind::WrongSyntax);
        assert_eq!(err.message(), "Invalid syntax: nesting deeper than 3.");
        assert_eq!(err.mark.col, 7);
    }

    #[test]
    fn test_structure_errors() {
        let err = parse_err("{a: 1");
        assert_eq!(err.expected, "`}`");
        assert_eq!(err.got, "EOF");

        let err = parse_err("[1] 2");
        assert_eq!(err.expected, "EOF");

        let err = parse_err("a: plain");
        assert_eq!(err.expected, "a value");
        assert_eq!(err.got, "word `plain`");

        let err = parse_err("}");
        assert_eq!(err.expected, "a key");
    }
}
