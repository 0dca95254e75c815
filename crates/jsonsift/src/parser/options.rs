/// Configuration options for a [`JsonSplitter`](crate::JsonSplitter).
///
/// # Examples
///
/// ```rust
/// use jsonsift::{FilterRegistry, JsonSplitter, ParserOptions, Text};
///
/// let options = ParserOptions {
///     error_envelope: None,
///     ..Default::default()
/// };
/// let splitter = JsonSplitter::<Text>::with_options(FilterRegistry::new(), options);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Shape of the global error envelope.
    ///
    /// A document made of the envelope prefix, an integer and `}` is decoded
    /// as a whole and reported through
    /// [`Completion::error_code`](crate::Completion) instead of being scanned.
    /// Documents that only start with the prefix are scanned as data. `None`
    /// disables the detection.
    ///
    /// # Default
    ///
    /// `Some(ErrorEnvelope::default())`
    pub error_envelope: Option<ErrorEnvelope>,

    #[cfg(any(test, feature = "fuzzing"))]
    /// Panic on fatal errors instead of returning them.
    ///
    /// Enabled only in test builds to produce backtraces at the failure site.
    pub panic_on_error: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            error_envelope: Some(ErrorEnvelope::default()),
            #[cfg(any(test, feature = "fuzzing"))]
            panic_on_error: false,
        }
    }
}

/// The fixed-shape top-level object reserved for application errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorEnvelope {
    /// Units the envelope starts with, up to its integer code.
    ///
    /// # Default
    ///
    /// `{"err":`
    pub prefix: &'static str,

    /// Property holding the integer error code.
    ///
    /// # Default
    ///
    /// `err`
    pub code_key: &'static str,
}

impl Default for ErrorEnvelope {
    fn default() -> Self {
        Self {
            prefix: r#"{"err":"#,
            code_key: "err",
        }
    }
}
