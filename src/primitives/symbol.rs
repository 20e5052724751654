use std::fmt;

/// A `symbol` is a sequence of ASCII characters that acts as a type-system
/// identifier: descriptor names, field names, and restricted-type choice
/// names are all symbols. The implementation wraps a `String` rather than
/// validating ASCII, matching `amqpnetlite`'s choice to let the transport's
/// own encoder reject non-ASCII content.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(pub String);

impl Symbol {
    /// Builds a new symbol from anything convertible to a `String`.
    pub fn new(val: impl Into<String>) -> Self {
        Self(val.into())
    }

    /// Consumes the symbol, returning the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Borrows the symbol as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0[..]
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Symbol {
    fn from(val: String) -> Self {
        Self(val)
    }
}

impl From<&str> for Symbol {
    fn from(val: &str) -> Self {
        Self(val.into())
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
