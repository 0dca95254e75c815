use thiserror::Error;

/// A fatal condition. The splitter that produced it is retired.
#[derive(Error, Debug)]
#[error("{source} at offset {offset}")]
pub struct ParserError {
    pub(crate) source: ErrorSource,
    pub(crate) offset: usize,
}

impl ParserError {
    pub(crate) fn new(source: ErrorSource, offset: usize) -> Self {
        Self { source, offset }
    }

    /// What went wrong.
    #[must_use]
    pub fn kind(&self) -> &ErrorSource {
        &self.source
    }

    /// Offset in units from the start of the stream.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The structural error, if this is one.
    #[must_use]
    pub fn syntax(&self) -> Option<SyntaxError> {
        match self.source {
            ErrorSource::Syntax(err) => Some(err),
            _ => None,
        }
    }
}

/// Cause of a [`ParserError`].
#[derive(Error, Debug)]
pub enum ErrorSource {
    /// Malformed structure.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    /// A captured subtree, bare scalar or envelope failed to decode.
    ///
    /// Numbers outside the `f64` range, such as `1e400`, pass the scanner but
    /// are rejected here.
    #[error("failed to decode subtree at `{path}`: {source}")]
    SubtreeDecode {
        /// Filter path of the subtree.
        path: String,
        /// Decoder error.
        source: serde_json::Error,
    },
    /// Byte input that must be read as text is not UTF-8.
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] bstr::Utf8Error),
    /// The global error envelope's code does not fit an `i64`.
    #[error("error envelope code does not fit an i64")]
    InvalidEnvelope,
    /// The splitter already failed; it never recovers.
    #[error("splitter was retired by an earlier error")]
    Retired,
}

/// Malformed structure in the input.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    /// An opener where no value may appear.
    #[error("unexpected container '{}'", char::from(*.0))]
    UnexpectedContainer(u8),
    /// A closer with no open container.
    #[error("unexpected '{}' outside of any container", char::from(*.0))]
    UnexpectedCloser(u8),
    /// A closer of the wrong kind.
    #[error("'{}' does not close the innermost container", char::from(*.0))]
    MismatchedCloser(u8),
    /// A closer directly after a separator.
    #[error("trailing ','")]
    TrailingSeparator,
    /// A separator where none may appear.
    #[error("unexpected ','")]
    StraySeparator,
    /// A property name not followed by ':'.
    #[error("expected ':' after property name")]
    MissingColon,
    /// Two values without a separator.
    #[error("expected ',' between values")]
    MissingSeparator,
    /// A value where a property name is expected, or a bare top-level string.
    #[error("unexpected value")]
    UnexpectedValue,
    /// A number that does not match the number grammar.
    #[error("invalid number literal")]
    InvalidNumber,
    /// A unit no token starts with.
    #[error("bogus character {:?}", char::from(*.0))]
    BogusCharacter(u8),
    /// The input ended inside the document.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// Content after the document ended.
    #[error("trailing data after the document")]
    TrailingData,
}
