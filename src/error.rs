use thiserror::Error;

/// The input could not be read as a well-formed XML token stream.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The tokenizer rejected the input.
    #[error(transparent)]
    Parser(#[from] xmlparser::Error),
    /// An entity reference without the closing `;`.
    #[error("unclosed entity: &{0}")]
    UnclosedEntity(String),
    /// An entity reference that is neither predefined nor a character reference.
    #[error("invalid entity: &{0};")]
    InvalidEntity(String),
    /// A close tag that doesn't match the innermost open element.
    #[error("close tag </{found}> does not match open tag <{expected}>")]
    InvalidCloseTag { expected: String, found: String },
    /// A close tag while no element is open at this level.
    #[error("close tag </{0}> without matching open tag")]
    UnexpectedCloseTag(String),
    /// Input ended while elements were still open.
    #[error("unexpected end of input: {0} element(s) left unclosed")]
    Unbalanced(usize),
    /// The bytes are not valid in the detected character encoding.
    #[error("input is not valid {0}")]
    Encoding(&'static str),
}

/// Which safety ceiling was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Limit {
    /// More tokens than `Limits::max_tokens`.
    #[error("more than {0} tokens")]
    Tokens(usize),
    /// Inline fragments nested deeper than `Limits::max_fragment_depth`.
    #[error("inline fragments nested more than {0} deep")]
    FragmentDepth(usize),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("decoding xml: {0}")]
    Decode(#[from] DecodeError),
    #[error("encoding xml: {0}")]
    Encode(#[source] std::io::Error),
    #[error("reading input: {0}")]
    Io(#[from] std::io::Error),
    /// Processing character data that holds an embedded XML document failed.
    #[error("inline xml fragment: {0}")]
    InlineFragment(#[source] Box<Error>),
    #[error("limit exceeded: {0}")]
    LimitExceeded(Limit),
    #[error("unknown masking kind {0:?}")]
    UnknownMaskingKind(String),
    #[error("invalid mask rule {0:?}, expected [space:]name=kind")]
    InvalidMaskRule(String),
}

impl From<xmlparser::Error> for Error {
    #[inline]
    fn from(e: xmlparser::Error) -> Self {
        Error::Decode(DecodeError::Parser(e))
    }
}

impl Error {
    /// The error at the bottom of any inline fragment wrapping.
    pub fn innermost(&self) -> &Error {
        match self {
            Error::InlineFragment(inner) => inner.innermost(),
            _ => self,
        }
    }
}
