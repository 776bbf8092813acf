use crate::char_utils::{as_hex, is_anchor_char, is_delimiter, is_number_char, is_number_start};
use crate::options::ParseOptions;
use crate::source::ChunkSource;
use crate::store::{Slice, ValueStore};
use anvil_common::{ErrorKind, Marker, ParseError, YamlError, YamlResult};
use std::borrow::Cow;
use std::io::Read;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare scalar terminated by `:`, the colon is not part of the text.
    Key,
    /// Double quoted string, escapes already resolved.
    String,
    /// Single quoted string.
    StringLit,
    Number,
    Boolean(bool),
    Anchor,
    Alias,
    /// Bare scalar that is neither a key, a number nor a boolean.
    Word,
    Comma,
    OpenMap,
    CloseMap,
    OpenSeq,
    CloseSeq,
    Eof,
}

impl TokenKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TokenKind::Key => "KEY",
            TokenKind::String => "STRING",
            TokenKind::StringLit => "STRING_LIT",
            TokenKind::Number => "NUMBER",
            TokenKind::Boolean(_) => "BOOLEAN",
            TokenKind::Anchor => "ANCHOR",
            TokenKind::Alias => "ALIAS",
            TokenKind::Word => "WORD",
            TokenKind::Comma => "COMMA",
            TokenKind::OpenMap => "OPEN_MAP",
            TokenKind::CloseMap => "CLOSE_MAP",
            TokenKind::OpenSeq => "OPEN_SEQ",
            TokenKind::CloseSeq => "CLOSE_SEQ",
            TokenKind::Eof => "EOF",
        }
    }

    /// How the kind reads in a diagnostic.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            TokenKind::Key => "key",
            TokenKind::String | TokenKind::StringLit => "string",
            TokenKind::Number => "number",
            TokenKind::Boolean(_) => "boolean",
            TokenKind::Anchor => "anchor",
            TokenKind::Alias => "alias",
            TokenKind::Word => "word",
            TokenKind::Comma => "`,`",
            TokenKind::OpenMap => "`{`",
            TokenKind::CloseMap => "`}`",
            TokenKind::OpenSeq => "`[`",
            TokenKind::CloseSeq => "`]`",
            TokenKind::Eof => "EOF",
        }
    }

    #[must_use]
    pub const fn starts_value(self) -> bool {
        matches!(
            self,
            TokenKind::String
                | TokenKind::StringLit
                | TokenKind::Number
                | TokenKind::Boolean(_)
                | TokenKind::Anchor
                | TokenKind::Alias
                | TokenKind::OpenMap
                | TokenKind::OpenSeq
        )
    }

    #[must_use]
    pub const fn has_text(self) -> bool {
        matches!(
            self,
            TokenKind::Key
                | TokenKind::String
                | TokenKind::StringLit
                | TokenKind::Number
                | TokenKind::Boolean(_)
                | TokenKind::Anchor
                | TokenKind::Alias
                | TokenKind::Word
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Text in the scanner's value store, `None` for punctuation.
    pub text: Option<Slice>,
    pub mark: Marker,
    /// Bytes of input the token spans.
    pub len: usize,
}

/// Turns a byte reader into tokens, one lookahead at a time.
pub struct Scanner<R> {
    src: ChunkSource<R>,
    store: ValueStore,
    scratch: Vec<u8>,
    lookahead: Option<Token>,
    options: ParseOptions,
    produced: usize,
}

impl<R: Read> Scanner<R> {
    pub fn new(reader: R, options: ParseOptions) -> Self {
        Scanner {
            src: ChunkSource::new(reader, options.chunk_size),
            store: ValueStore::with_baseline(options.store_baseline),
            scratch: Vec::new(),
            lookahead: None,
            options,
            produced: 0,
        }
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> YamlResult<Token> {
        match self.lookahead {
            Some(tok) => Ok(tok),
            None => {
                let tok = self.fetch_token()?;
                self.lookahead = Some(tok);
                Ok(tok)
            }
        }
    }

    pub fn next_token(&mut self) -> YamlResult<Token> {
        match self.lookahead.take() {
            Some(tok) => Ok(tok),
            None => self.fetch_token(),
        }
    }

    #[must_use]
    pub fn text(&self, tok: &Token) -> &[u8] {
        tok.text.map_or(&[], |slice| self.store.get(slice))
    }

    /// Token text as UTF-8.
    pub fn text_str(&self, tok: &Token) -> YamlResult<&str> {
        match tok.text {
            None => Ok(""),
            Some(slice) => self.store.get_str(slice).map_err(|_| {
                YamlError::new(ErrorKind::WrongSyntax, tok.mark)
                    .got("invalid UTF-8")
                    .with_len(tok.len)
                    .into()
            }),
        }
    }

    #[must_use]
    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    #[must_use]
    pub fn tokens_produced(&self) -> usize {
        self.produced
    }

    #[must_use]
    pub fn chunk_refills(&self) -> usize {
        self.src.refills()
    }

    fn fetch_token(&mut self) -> YamlResult<Token> {
        self.skip_to_next_token()?;
        let start = self.src.mark();
        let tok = match self.src.peek()? {
            None => Token {
                kind: TokenKind::Eof,
                text: None,
                mark: start,
                len: 0,
            },
            Some(b',') => self.single(TokenKind::Comma),
            Some(b'{') => self.single(TokenKind::OpenMap),
            Some(b'}') => self.single(TokenKind::CloseMap),
            Some(b'[') => self.single(TokenKind::OpenSeq),
            Some(b']') => self.single(TokenKind::CloseSeq),
            Some(b'"') => self.scan_double_quoted()?,
            Some(b'\'') => self.scan_single_quoted()?,
            Some(b'&') => self.scan_anchor(false)?,
            Some(b'*') => self.scan_anchor(true)?,
            Some(_) => self.scan_plain()?,
        };
        self.produced += 1;
        trace!(
            kind = tok.kind.name(),
            line = tok.mark.line,
            col = tok.mark.col,
            "token"
        );
        Ok(tok)
    }

    fn skip_to_next_token(&mut self) -> YamlResult<()> {
        loop {
            match self.src.peek()? {
                Some(b' ' | b'\r' | b'\n') => self.src.bump(),
                Some(b'\t') => {
                    return Err(YamlError::new(ErrorKind::TabIndentation, self.src.mark()).into())
                }
                Some(b'#') => self.src.skip_to_eol()?,
                _ => return Ok(()),
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let mark = self.src.mark();
        self.src.bump();
        Token {
            kind,
            text: None,
            mark,
            len: 1,
        }
    }

    /// Moves the scratch text into the store and wraps it in a token.
    fn finish(&mut self, kind: TokenKind, start: Marker) -> Token {
        let text = self.store.push(&self.scratch);
        Token {
            kind,
            text: Some(text),
            mark: start,
            len: self.src.mark().pos - start.pos,
        }
    }

    fn unclosed(&self, start: Marker, quote: &'static str, got: &'static str) -> ParseError {
        YamlError::new(ErrorKind::UnclosedQuote, start)
            .expected(quote)
            .got(got)
            .with_len(self.src.mark().pos - start.pos)
            .into()
    }

    fn syntax(mark: Marker, got: impl Into<Cow<'static, str>>, len: usize) -> ParseError {
        YamlError::new(ErrorKind::WrongSyntax, mark)
            .got(got)
            .with_len(len)
            .into()
    }

    fn scan_double_quoted(&mut self) -> YamlResult<Token> {
        const QUOTE: &str = "`\"`";
        let start = self.src.mark();
        self.src.bump();
        self.scratch.clear();

        loop {
            match self.src.peek()? {
                None => return Err(self.unclosed(start, QUOTE, "EOF")),
                Some(b'\n' | b'\r') => return Err(self.unclosed(start, QUOTE, "newline")),
                Some(b'"') => {
                    self.src.bump();
                    break;
                }
                Some(b'\\') => {
                    let chr = self.resolve_escape_sequence(start)?;
                    let mut utf8 = [0u8; 4];
                    self.scratch
                        .extend_from_slice(chr.encode_utf8(&mut utf8).as_bytes());
                }
                Some(c) => {
                    self.scratch.push(c);
                    self.src.bump();
                }
            }
        }
        Ok(self.finish(TokenKind::String, start))
    }

    fn resolve_escape_sequence(&mut self, start: Marker) -> YamlResult<char> {
        const QUOTE: &str = "`\"`";
        let escape_mark = self.src.mark();
        // backslash
        self.src.bump();

        let code_length = match self.src.peek()? {
            None => return Err(self.unclosed(start, QUOTE, "EOF")),
            Some(b'\n' | b'\r') => return Err(self.unclosed(start, QUOTE, "newline")),
            Some(c) => {
                let simple = match c {
                    b'n' => Some('\n'),
                    b't' => Some('\t'),
                    b'r' => Some('\r'),
                    b'\\' => Some('\\'),
                    b'"' => Some('"'),
                    b'/' => Some('/'),
                    b'\'' => Some('\''),
                    b'0' => Some('\0'),
                    b'a' => Some('\x07'),
                    b'b' => Some('\x08'),
                    b'e' => Some('\x1b'),
                    b'f' => Some('\x0c'),
                    b'v' => Some('\x0b'),
                    _ => None,
                };
                if let Some(chr) = simple {
                    self.src.bump();
                    return Ok(chr);
                }
                match c {
                    b'x' => 2,
                    b'u' => 4,
                    b'U' => 8,
                    _ => {
                        return Err(Self::syntax(
                            escape_mark,
                            format!("unknown escape `\\{}`", c as char),
                            2,
                        ))
                    }
                }
            }
        };
        self.src.bump();

        let mut value = 0u32;
        for _ in 0..code_length {
            let Some(digit) = self.src.peek()?.and_then(as_hex) else {
                return Err(Self::syntax(
                    escape_mark,
                    "expected a hexadecimal digit in escape",
                    self.src.mark().pos - escape_mark.pos + 1,
                ));
            };
            value = (value << 4) | digit;
            self.src.bump();
        }

        char::from_u32(value).ok_or_else(|| {
            Self::syntax(
                escape_mark,
                format!("invalid unicode escape `{value:x}`"),
                code_length + 2,
            )
        })
    }

    fn scan_single_quoted(&mut self) -> YamlResult<Token> {
        const QUOTE: &str = "`'`";
        let start = self.src.mark();
        self.src.bump();
        self.scratch.clear();

        loop {
            match self.src.peek()? {
                None => return Err(self.unclosed(start, QUOTE, "EOF")),
                Some(b'\n' | b'\r') => return Err(self.unclosed(start, QUOTE, "newline")),
                Some(b'\'') => {
                    self.src.bump();
                    if self.src.peek()? == Some(b'\'') {
                        self.scratch.push(b'\'');
                        self.src.bump();
                    } else {
                        break;
                    }
                }
                Some(c) => {
                    self.scratch.push(c);
                    self.src.bump();
                }
            }
        }
        Ok(self.finish(TokenKind::StringLit, start))
    }

    fn scan_anchor(&mut self, alias: bool) -> YamlResult<Token> {
        let start = self.src.mark();
        self.src.bump();
        self.scratch.clear();

        while let Some(c) = self.src.peek()? {
            if !is_anchor_char(c) {
                break;
            }
            self.scratch.push(c);
            self.src.bump();
        }

        if self.scratch.is_empty() {
            let got = if alias {
                "empty alias name"
            } else {
                "empty anchor name"
            };
            return Err(Self::syntax(start, got, 1));
        }

        let kind = if alias {
            TokenKind::Alias
        } else {
            TokenKind::Anchor
        };
        Ok(self.finish(kind, start))
    }

    fn key_too_long(&self, start: Marker) -> ParseError {
        YamlError::new(ErrorKind::KeyTooLong, start)
            .expected(self.options.max_key_len.to_string())
            .with_len(self.scratch.len())
            .into()
    }

    fn push_key_byte(&mut self, c: u8, start: Marker) -> YamlResult<()> {
        if self.scratch.len() >= self.options.max_key_len {
            return Err(self.key_too_long(start));
        }
        self.scratch.push(c);
        Ok(())
    }

    /// Numbers, booleans, keys and bare words.
    fn scan_plain(&mut self) -> YamlResult<Token> {
        let start = self.src.mark();
        self.scratch.clear();

        if self.src.peek()?.is_some_and(is_number_start) {
            while let Some(c) = self.src.peek()? {
                if !is_number_char(c) {
                    break;
                }
                self.scratch.push(c);
                self.src.bump();
            }
            if is_delimiter(self.src.peek()?) && self.scratch.iter().any(u8::is_ascii_digit) {
                if self.scratch.len() > self.options.max_number_len {
                    return Err(YamlError::new(ErrorKind::NumberTooLong, start)
                        .expected(self.options.max_number_len.to_string())
                        .with_len(self.scratch.len())
                        .into());
                }
                return Ok(self.finish(TokenKind::Number, start));
            }
            // not a number after all, what was read stays as key text
            if self.scratch.len() > self.options.max_key_len {
                return Err(self.key_too_long(start));
            }
        }

        loop {
            match self.src.peek()? {
                None => break,
                Some(b':') => {
                    self.src.bump();
                    if is_delimiter(self.src.peek()?) {
                        if self.scratch.is_empty() {
                            return Err(Self::syntax(start, "empty key", 1));
                        }
                        return Ok(self.finish(TokenKind::Key, start));
                    }
                    self.push_key_byte(b':', start)?;
                }
                Some(c) if is_delimiter(Some(c)) => break,
                Some(c) => {
                    self.push_key_byte(c, start)?;
                    self.src.bump();
                }
            }
        }

        let kind = match self.scratch.as_slice() {
            b"true" => TokenKind::Boolean(true),
            b"false" => TokenKind::Boolean(false),
            _ => TokenKind::Word,
        };
        Ok(self.finish(kind, start))
    }
}
