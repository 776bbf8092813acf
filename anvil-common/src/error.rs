use crate::Marker;
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter, Write};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A specialized `Result` type where the error is hard-wired to [`ParseError`].
///
/// [`ParseError`]: enum.ParseError.html
pub type YamlResult<T> = Result<T, ParseError>;

/// Every way a document can be rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TabIndentation,
    UnexpectedToken,
    WrongSyntax,
    KeyRedefinition,
    UndefinedAlias,
    RedefinedAlias,
    MissingValue,
    MissingComma,
    UnclosedQuote,
    NumberTooLong,
    KeyTooLong,
}

impl ErrorKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ErrorKind::TabIndentation => "TAB_INDENTATION",
            ErrorKind::UnexpectedToken => "UNEXPECTED_TOKEN",
            ErrorKind::WrongSyntax => "WRONG_SYNTAX",
            ErrorKind::KeyRedefinition => "KEY_REDEFINITION",
            ErrorKind::UndefinedAlias => "UNDEFINED_ALIAS",
            ErrorKind::RedefinedAlias => "REDEFINED_ALIAS",
            ErrorKind::MissingValue => "MISSING_VALUE",
            ErrorKind::MissingComma => "MISSING_COMMA",
            ErrorKind::UnclosedQuote => "UNCLOSED_QUOTE",
            ErrorKind::NumberTooLong => "NUMBER_TOO_LONG",
            ErrorKind::KeyTooLong => "KEY_TOO_LONG",
        }
    }

    /// Message template of the kind.
    ///
    /// `#{exp}` is replaced by the expected text, `#{got}` and a bare `#{}` by
    /// the text that was found instead.
    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            ErrorKind::TabIndentation => "Tabs cannot be used for indentation.",
            ErrorKind::UnexpectedToken => "Expected #{exp}, found #{got}.",
            ErrorKind::WrongSyntax => "Invalid syntax: #{}.",
            ErrorKind::KeyRedefinition => "#{} is redefined in the current context.",
            ErrorKind::UndefinedAlias => "Alias #{} is undefined.",
            ErrorKind::RedefinedAlias => "Alias #{} is already defined.",
            ErrorKind::MissingValue => "Missing value after key #{}.",
            ErrorKind::MissingComma => "Comma missing between elements in a collection.",
            ErrorKind::UnclosedQuote => "Reached #{got} while looking for matching #{exp}.",
            ErrorKind::NumberTooLong => "Number is longer than #{exp} bytes.",
            ErrorKind::KeyTooLong => "Key is longer than #{exp} bytes.",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A syntax error with the context needed to render its diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YamlError {
    pub kind: ErrorKind,
    pub expected: Cow<'static, str>,
    pub got: Cow<'static, str>,
    /// Where the offending construct starts.
    pub mark: Marker,
    /// Length in bytes of the offending construct, used for underlining.
    pub len: usize,
}

impl YamlError {
    #[must_use]
    pub fn new(kind: ErrorKind, mark: Marker) -> Self {
        YamlError {
            kind,
            expected: Cow::Borrowed(""),
            got: Cow::Borrowed(""),
            mark,
            len: 1,
        }
    }

    #[must_use]
    pub fn expected(mut self, expected: impl Into<Cow<'static, str>>) -> Self {
        self.expected = expected.into();
        self
    }

    #[must_use]
    pub fn got(mut self, got: impl Into<Cow<'static, str>>) -> Self {
        self.got = got.into();
        self
    }

    #[must_use]
    pub fn with_len(mut self, len: usize) -> Self {
        self.len = len.max(1);
        self
    }

    /// The kind's template with its placeholders filled in.
    #[must_use]
    pub fn message(&self) -> String {
        let template = self.kind.template();
        let mut out = String::with_capacity(template.len() + self.expected.len() + self.got.len());
        let mut rest = template;
        while let Some(start) = rest.find("#{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                rest = "";
                break;
            };
            match &after[..end] {
                "exp" => out.push_str(&self.expected),
                _ => out.push_str(&self.got),
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        out
    }

    /// Renders the lines around the error with the offending bytes underlined:
    ///
    /// ```text
    /// YamlError::UNCLOSED_QUOTE
    ///   1 |name: "anvil"
    ///   2 |s: "abc
    ///     |   ^^^^
    /// ```
    #[must_use]
    pub fn render_snippet(&self, source: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "YamlError::{}", self.kind.name());

        let lines: Vec<&str> = source.lines().collect();
        let line_idx = self.mark.line.saturating_sub(1) as usize;

        if line_idx > 0 {
            if let Some(prev) = lines.get(line_idx - 1) {
                let _ = writeln!(out, "{:3} |{}", line_idx, prev);
            }
        }
        match lines.get(line_idx) {
            Some(line) => {
                let _ = writeln!(out, "{:3} |{}", line_idx + 1, line);
            }
            // error at the very end of a document that ends with a line break
            None => {
                let _ = writeln!(out, "{:3} |", line_idx + 1);
            }
        }
        let column = self.mark.col.saturating_sub(1) as usize;
        let _ = writeln!(out, "    |{}{}", " ".repeat(column), "^".repeat(self.len));
        if let Some(next) = lines.get(line_idx + 1) {
            let _ = writeln!(out, "{:3} |{}", line_idx + 2, next);
        }
        out
    }
}

impl Display for YamlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for YamlError {}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Syntax(#[from] YamlError),
}

impl ParseError {
    /// Position of a syntax error, `None` for I/O failures.
    #[must_use]
    pub fn mark(&self) -> Option<Marker> {
        match self {
            ParseError::Io(_) => None,
            ParseError::Syntax(err) => Some(err.mark),
        }
    }

    #[must_use]
    pub fn as_syntax(&self) -> Option<&YamlError> {
        match self {
            ParseError::Io(_) => None,
            ParseError::Syntax(err) => Some(err),
        }
    }
}

/// A [`ParseError`] tied to the file it came from.
///
/// Displays as `path:line:col -> message`.
#[derive(Debug)]
pub struct LocatedError {
    pub path: PathBuf,
    pub error: ParseError,
}

impl LocatedError {
    pub fn new(path: impl AsRef<Path>, error: ParseError) -> Self {
        LocatedError {
            path: path.as_ref().to_path_buf(),
            error,
        }
    }
}

impl Display for LocatedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.error.mark() {
            Some(mark) => write!(f, "{}:{} -> {}", self.path.display(), mark, self.error),
            None => write!(f, "{} -> {}", self.path.display(), self.error),
        }
    }
}

impl std::error::Error for LocatedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.error {
            ParseError::Io(err) => Some(err),
            ParseError::Syntax(err) => Some(err),
        }
    }
}
