//! Chunk coordinator.
//!
//! Owns the residual between `feed` calls. Each call joins the residual with
//! the new chunk, lets the engine consume as much as it can, and keeps only
//! the unconsumed suffix. Text already delivered or already copied into a
//! bucket is never retained, so the residual stays within the longest pending
//! literal. Before the first scan it may also hold a prefix of the error
//! envelope.

use std::borrow::Cow;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    Completion, Status,
    filter::{FilterRegistry, TOP_LEVEL},
    parser::{
        Bytes, ErrorEnvelope, ErrorSource, InputMode, ParserError, ParserOptions, ParserState,
        Scan, SyntaxError, Text, decode,
    },
};

#[derive(Debug, Clone, PartialEq)]
enum Lifecycle {
    /// Nothing scanned yet; the document may still turn out to be the error
    /// envelope.
    Detecting,
    Scanning,
    Done(Completion),
    Failed,
}

enum Envelope {
    Absent,
    /// The buffered prefix matches so far but the envelope has not closed.
    Undecided,
    /// The envelope spans `end` units and was delivered.
    Found { completion: Completion, end: usize },
}

/// Units after the envelope prefix inspected for ` *-?[0-9]+ *}` before the
/// document is scanned as data.
pub(crate) const ENVELOPE_WINDOW: usize = 32;

/// How far the units after the prefix match the envelope's code.
enum CodeShape {
    Partial,
    /// Closed by `}` after this many units.
    Closed(usize),
    Mismatch,
}

fn code_shape(rest: &[u8]) -> CodeShape {
    let window = &rest[..rest.len().min(ENVELOPE_WINDOW)];
    let spaces = |from: usize| from + window[from..].iter().take_while(|&&u| u == b' ').count();

    let mut at = spaces(0);
    if window.get(at) == Some(&b'-') {
        at += 1;
    }
    let digits = window[at..].iter().take_while(|u| u.is_ascii_digit()).count();
    at = spaces(at + digits);
    match window.get(at) {
        Some(b'}') if digits > 0 => CodeShape::Closed(at + 1),
        Some(_) => CodeShape::Mismatch,
        None if window.len() == ENVELOPE_WINDOW => CodeShape::Mismatch,
        None => CodeShape::Partial,
    }
}

/// Streaming extractor of filtered subtrees.
///
/// Feed chunks in order; every matched subtree is decoded and handed to its
/// [`Handler`](crate::Handler) as soon as it closes. Exactly one call should
/// pass `input_complete = true`, possibly with an empty chunk.
///
/// # Examples
///
/// ```rust
/// use std::cell::RefCell;
///
/// use jsonsift::{FilterRegistry, JsonSplitter, Status, Value};
///
/// let seen = RefCell::new(Vec::new());
/// let filters = FilterRegistry::new().on("[{", |v: Value| seen.borrow_mut().push(v));
/// let mut splitter = JsonSplitter::text(filters);
///
/// for chunk in [r#"[{"a":1},{"#, r#""a":"x"}"#, "]"] {
///     splitter.feed(chunk, false).unwrap();
/// }
/// assert!(matches!(splitter.feed("", true), Ok(Status::Done(_))));
/// assert_eq!(seen.borrow().len(), 2);
/// ```
#[derive(Debug)]
pub struct JsonSplitter<'a, M: InputMode = Text> {
    filters: FilterRegistry<'a>,
    options: ParserOptions,
    state: ParserState<M>,
    residual: Option<M::Buf>,
    /// Units dropped from the front of the stream so far.
    consumed: usize,
    lifecycle: Lifecycle,
}

/// Splitter over `&str` chunks.
pub type TextSplitter<'a> = JsonSplitter<'a, Text>;

/// Splitter over `&[u8]` chunks.
pub type ByteSplitter<'a> = JsonSplitter<'a, Bytes>;

impl<'a> JsonSplitter<'a, Text> {
    /// A splitter over `&str` chunks with default options.
    #[must_use]
    pub fn text(filters: FilterRegistry<'a>) -> Self {
        Self::with_options(filters, ParserOptions::default())
    }
}

impl<'a> JsonSplitter<'a, Bytes> {
    /// A splitter over `&[u8]` chunks with default options.
    #[must_use]
    pub fn bytes(filters: FilterRegistry<'a>) -> Self {
        Self::with_options(filters, ParserOptions::default())
    }
}

impl<'a, M: InputMode> JsonSplitter<'a, M> {
    /// A splitter with explicit options.
    #[must_use]
    pub fn with_options(filters: FilterRegistry<'a>, options: ParserOptions) -> Self {
        Self {
            filters,
            options,
            state: ParserState::new(),
            residual: None,
            consumed: 0,
            lifecycle: Lifecycle::Detecting,
        }
    }

    /// Consumes the next chunk.
    ///
    /// Returns [`Status::NeedMoreData`] while the document is open and
    /// [`Status::Done`] once it completed. Once done, further chunks made of
    /// spaces only keep answering with the same completion.
    ///
    /// # Errors
    ///
    /// Any [`ParserError`] is fatal: the splitter is retired and every later
    /// call fails with [`ErrorSource::Retired`]. Handlers are never invoked
    /// for the subtree that failed.
    ///
    /// Values are delivered the moment they close, in every chunking. A
    /// handler may therefore already have received a subtree, a bare scalar
    /// or the envelope when a later unit of the same document is fatal: `7 8`
    /// delivers `7` and then fails with [`SyntaxError::TrailingData`].
    #[instrument(level = "trace", skip(self, chunk), fields(chunk_len = M::len(chunk)))]
    pub fn feed(&mut self, chunk: &M::Chunk, input_complete: bool) -> Result<Status, ParserError> {
        let result = self.advance(chunk, input_complete);
        if let Err(err) = &result {
            self.retire(err);
        }
        result
    }

    /// Units retained for the next call.
    #[must_use]
    pub fn residual_len(&self) -> usize {
        self.residual
            .as_ref()
            .map_or(0, |residual| M::len(M::as_chunk(residual)))
    }

    /// Units held by subtrees still being captured.
    #[must_use]
    pub fn captured_len(&self) -> usize {
        self.state.captured_len()
    }

    /// Whether the document completed or the splitter failed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Done(_) | Lifecycle::Failed)
    }

    fn advance(&mut self, chunk: &M::Chunk, input_complete: bool) -> Result<Status, ParserError> {
        match &self.lifecycle {
            Lifecycle::Failed => return Err(ParserError::new(ErrorSource::Retired, self.consumed)),
            Lifecycle::Done(completion) => {
                let completion = completion.clone();
                self.trailing_spaces(M::units(chunk))?;
                return Ok(Status::Done(completion));
            }
            Lifecycle::Detecting | Lifecycle::Scanning => {}
        }

        let combined: Cow<'_, M::Chunk> = match self.residual.take() {
            Some(residual) => Cow::Owned(M::concat(residual, chunk)),
            None => Cow::Borrowed(chunk),
        };
        self.process(&combined, input_complete)
    }

    fn process(&mut self, buf: &M::Chunk, input_complete: bool) -> Result<Status, ParserError> {
        if self.lifecycle == Lifecycle::Detecting {
            let envelope = self
                .detect_envelope(buf, input_complete)
                .map_err(|source| ParserError::new(source, self.consumed))?;
            match envelope {
                Envelope::Undecided => {
                    self.residual = (M::len(buf) > 0).then(|| buf.to_owned());
                    return Ok(Status::NeedMoreData);
                }
                Envelope::Found { completion, end } => {
                    self.consumed += end;
                    self.trailing_spaces(&M::units(buf)[end..])?;
                    return Ok(self.finish(completion));
                }
                Envelope::Absent => self.lifecycle = Lifecycle::Scanning,
            }
        }

        let scanned = self.state.scan(buf, input_complete, &mut self.filters);
        match scanned.map_err(|source| ParserError::new(source, self.consumed + self.state.cursor))? {
            Scan::Done(completion) => {
                let cursor = self.state.cursor;
                self.consumed += cursor;
                self.trailing_spaces(&M::units(buf)[cursor..])?;
                Ok(self.finish(completion))
            }
            Scan::Incomplete if input_complete => Err(ParserError::new(
                SyntaxError::UnexpectedEndOfInput.into(),
                self.consumed + M::len(buf),
            )),
            Scan::Incomplete => {
                self.consumed += self.state.cursor;
                // A buffer with no progress at all comes back whole, so a token
                // spanning many chunks keeps growing instead of livelocking.
                self.residual = self.state.rewind(buf);
                Ok(Status::NeedMoreData)
            }
        }
    }

    /// Recognizes the global error envelope without running the scan loop.
    ///
    /// The envelope is the configured prefix, an integer and `}`. The buffer
    /// is held back only while it can still become exactly that, so the
    /// residual stays within the prefix plus [`ENVELOPE_WINDOW`]. Any other
    /// document, including one that merely starts with the prefix, is
    /// scanned as data.
    fn detect_envelope(
        &mut self,
        buf: &M::Chunk,
        input_complete: bool,
    ) -> Result<Envelope, ErrorSource> {
        let Some(ErrorEnvelope { prefix, code_key }) = self.options.error_envelope else {
            return Ok(Envelope::Absent);
        };
        let units = M::units(buf);
        let prefix = prefix.as_bytes();
        let shared = units.len().min(prefix.len());
        if units[..shared] != prefix[..shared] {
            return Ok(Envelope::Absent);
        }
        let end = match code_shape(&units[shared..]) {
            CodeShape::Closed(end) => prefix.len() + end,
            CodeShape::Partial if !input_complete => return Ok(Envelope::Undecided),
            CodeShape::Partial | CodeShape::Mismatch => return Ok(Envelope::Absent),
        };

        let value = decode::<M, Value>(M::slice(buf, 0, end), TOP_LEVEL)?;
        let code = value
            .get(code_key)
            .and_then(Value::as_i64)
            .ok_or(ErrorSource::InvalidEnvelope)?;
        debug!(code, "global error envelope");
        self.filters.deliver(TOP_LEVEL, value);
        Ok(Envelope::Found {
            completion: Completion {
                bare_scalar: None,
                error_code: Some(code),
            },
            end,
        })
    }

    /// Accepts units after the document as long as they are spaces.
    fn trailing_spaces(&mut self, units: &[u8]) -> Result<(), ParserError> {
        match units.iter().position(|&unit| unit != b' ') {
            Some(at) => Err(ParserError::new(
                SyntaxError::TrailingData.into(),
                self.consumed + at,
            )),
            None => {
                self.consumed += units.len();
                Ok(())
            }
        }
    }

    fn finish(&mut self, completion: Completion) -> Status {
        debug!(consumed = self.consumed, "document complete");
        self.residual = None;
        self.lifecycle = Lifecycle::Done(completion.clone());
        Status::Done(completion)
    }

    fn retire(&mut self, err: &ParserError) {
        if self.lifecycle != Lifecycle::Failed {
            debug!(offset = err.offset(), error = %err, "splitter retired");
        }
        self.residual = None;
        self.lifecycle = Lifecycle::Failed;

        #[cfg(any(test, feature = "fuzzing"))]
        assert!(!self.options.panic_on_error, "{err}");
    }
}
