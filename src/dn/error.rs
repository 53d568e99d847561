use std::fmt;


/// The reason why a string could not be parsed as a distinguished name.
///
/// All positions are byte offsets into the complete input string.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ParseErrorKind {
    /// A double quote opens a region that is never closed.
    UnterminatedQuote { pos: usize },

    /// The string ends with a backslash that escapes nothing.
    DanglingEscape { pos: usize },

    /// An RDN or attribute is missing its attribute type.
    EmptyAttributeType { pos: usize },

    /// An attribute type contains whitespace, a double quote or a backslash.
    InvalidAttributeType { pos: usize },

    /// An attribute has a type but no `=` separating it from a value.
    MissingEquals { pos: usize },

    /// A backslash is followed by a single hex digit instead of a pair.
    MalformedHexEscape { pos: usize },

    /// A double quote appears where a value may not contain one.
    StrayQuote { pos: usize },

    /// Hex escapes within a value do not decode to valid UTF-8.
    InvalidUtf8 { pos: usize },

    /// A relative distinguished name (RDN) contains an unescaped `,` or `;` and is therefore
    /// actually multiple RDNs.
    MultipleRdns { pos: usize },
}
impl ParseErrorKind {
    /// The position at which the problem was detected.
    pub fn position(&self) -> usize {
        match *self {
            Self::UnterminatedQuote { pos } => pos,
            Self::DanglingEscape { pos } => pos,
            Self::EmptyAttributeType { pos } => pos,
            Self::InvalidAttributeType { pos } => pos,
            Self::MissingEquals { pos } => pos,
            Self::MalformedHexEscape { pos } => pos,
            Self::StrayQuote { pos } => pos,
            Self::InvalidUtf8 { pos } => pos,
            Self::MultipleRdns { pos } => pos,
        }
    }
}
impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedQuote { pos }
                => write!(f, "quote opened at position {} is never closed", pos),
            Self::DanglingEscape { pos }
                => write!(f, "string ends with an incomplete escape sequence at position {}", pos),
            Self::EmptyAttributeType { pos }
                => write!(f, "missing attribute type at position {}", pos),
            Self::InvalidAttributeType { pos }
                => write!(f, "invalid character in attribute type at position {}", pos),
            Self::MissingEquals { pos }
                => write!(f, "expected '=' at position {}", pos),
            Self::MalformedHexEscape { pos }
                => write!(f, "hex escape at position {} has an odd number of hex digits", pos),
            Self::StrayQuote { pos }
                => write!(f, "unexpected quote at position {}", pos),
            Self::InvalidUtf8 { pos }
                => write!(f, "escaped bytes in value at position {} are not valid UTF-8", pos),
            Self::MultipleRdns { pos }
                => write!(f, "RDN separator at position {} within a single RDN", pos),
        }
    }
}


/// An error which can occur during parsing of a distinguished name.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ParseError {
    input: String,
    kind: ParseErrorKind,
}
impl ParseError {
    pub(crate) fn new(input: &str, kind: ParseErrorKind) -> Self {
        Self {
            input: input.to_owned(),
            kind,
        }
    }

    /// The string that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// What went wrong.
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// The byte offset into [`input`](Self::input) at which the problem was detected.
    pub fn position(&self) -> usize {
        self.kind.position()
    }
}
impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid DN {:?}: {}", self.input, self.kind)
    }
}
impl std::error::Error for ParseError {
}
