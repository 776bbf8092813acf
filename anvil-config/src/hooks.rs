//! Policies attached to argument hooks.

use std::fmt::{self, Display, Formatter};

/// How strictly a hook's output string is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidateStr {
    Off,
    Compact,
    Content,
    Strict,
}

impl ValidateStr {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "off" => Some(ValidateStr::Off),
            "compact" => Some(ValidateStr::Compact),
            "content" => Some(ValidateStr::Content),
            "strict" => Some(ValidateStr::Strict),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ValidateStr::Off => "off",
            ValidateStr::Compact => "compact",
            ValidateStr::Content => "content",
            ValidateStr::Strict => "strict",
        }
    }
}

impl Display for ValidateStr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// When a hook's result may be reused instead of running it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    Never,
    Memoize,
    Always,
}

impl CachePolicy {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "never" => Some(CachePolicy::Never),
            "memoize" => Some(CachePolicy::Memoize),
            "always" => Some(CachePolicy::Always),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CachePolicy::Never => "never",
            CachePolicy::Memoize => "memoize",
            CachePolicy::Always => "always",
        }
    }
}

impl Display for CachePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
