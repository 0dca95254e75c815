use serde_json::Number;

/// Result of a successful [`feed`](crate::JsonSplitter::feed).
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    /// The buffered input ends inside the document; feed more.
    NeedMoreData,
    /// The document is complete.
    Done(Completion),
}

impl Status {
    /// Returns `true` if the status is [`Status::Done`].
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// How a document completed.
///
/// Both fields are `None` for an ordinary container document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    /// The document was a single number.
    pub bare_scalar: Option<Number>,
    /// The document was the global error envelope carrying this code.
    pub error_code: Option<i64>,
}
