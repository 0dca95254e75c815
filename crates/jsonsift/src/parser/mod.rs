//! One-pass structural engine.
//!
//! The engine walks a combined buffer (residual plus the newest chunk) unit by
//! unit. It never tokenizes values it does not need: strings and numbers are
//! only delimited, containers only tracked. Text belonging to a matched
//! container is copied into that container's bucket, and decoded the moment
//! the container closes.
//!
//! Buffer offsets
//! - `cursor` is the next unit to examine. It only moves past a token once the
//!   whole token is in the buffer, so on [`Scan::Incomplete`] everything from
//!   `cursor` on is the in-flight token.
//! - `last_flush` marks the first unit not yet copied into the innermost
//!   bucket. Units between `last_flush` and `cursor` belong to that bucket.
//!
//! Invariants
//! - `buckets.len()` equals the number of open containers marked filtered.
//! - `cursor <= len(buffer)`.
//! - `Expect::Value` and `Expect::Key` hold only right after `:`, `,` or at
//!   the start of the document.

mod buffer;
mod error;
mod numbers;
mod options;
mod path;
mod scanner;


pub use buffer::{Bytes, InputMode, Text};
pub use error::{ErrorSource, ParserError, SyntaxError};
pub use options::{ErrorEnvelope, ParserOptions};
use path::{ContainerKind, PathStack};
use scanner::LiteralEnd;
use serde_json::{Number, Value};
use tracing::trace;

use crate::{
    Completion,
    filter::{FilterRegistry, TOP_LEVEL},
};

/// What the engine may see next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expect {
    /// A value is compulsory: document start, after `:`, after `,` in an
    /// array.
    Value,
    /// A value or the closer: right after `[`.
    OptionalValue,
    /// A property name is compulsory: after `,` in an object.
    Key,
    /// A property name or the closer: right after `{`.
    OptionalKey,
    /// A separator or a closer: after a complete value.
    Separator,
}

impl Expect {
    fn is_value(self) -> bool {
        matches!(self, Expect::Value | Expect::OptionalValue)
    }

    fn is_required(self) -> bool {
        matches!(self, Expect::Value | Expect::Key)
    }
}

/// Outcome of one pass over a buffer.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Scan {
    /// The buffer ended inside the document.
    Incomplete,
    /// The document completed; `cursor` points past its last unit.
    Done(Completion),
}

enum Step {
    Continue,
    Stop(Scan),
}

/// Parser state, owned by exactly one splitter.
#[derive(Debug)]
pub(crate) struct ParserState<M: InputMode> {
    pub(crate) cursor: usize,
    last_flush: usize,
    path: PathStack,
    expect: Expect,
    last_property_name: String,
    buckets: Vec<M::Buf>,
}

impl<M: InputMode> ParserState<M> {
    pub(crate) fn new() -> Self {
        Self {
            cursor: 0,
            last_flush: 0,
            path: PathStack::new(),
            expect: Expect::Value,
            last_property_name: String::new(),
            buckets: Vec::new(),
        }
    }

    /// Advances over `buf` until the document completes or the buffer can no
    /// longer be consumed.
    pub(crate) fn scan(
        &mut self,
        buf: &M::Chunk,
        input_complete: bool,
        filters: &mut FilterRegistry<'_>,
    ) -> Result<Scan, ErrorSource> {
        let units = M::units(buf);
        while let Some(&unit) = units.get(self.cursor) {
            let step = match unit {
                b'{' => self.open(buf, ContainerKind::Object, filters)?,
                b'[' => self.open(buf, ContainerKind::Array, filters)?,
                b'}' => self.close(buf, ContainerKind::Object, filters)?,
                b']' => self.close(buf, ContainerKind::Array, filters)?,
                b',' => self.separator()?,
                b'"' => self.string(buf)?,
                b'0'..=b'9' | b'-' | b'.' => self.number(buf, input_complete, filters)?,
                b' ' => {
                    self.cursor += 1;
                    Step::Continue
                }
                other => return Err(SyntaxError::BogusCharacter(other).into()),
            };
            if let Step::Stop(scan) = step {
                return Ok(scan);
            }
        }
        Ok(Scan::Incomplete)
    }

    /// Copies consumed bucket text out of `buf` and returns the unconsumed
    /// suffix, resetting offsets for the next combined buffer.
    ///
    /// When nothing was consumed the suffix is the whole buffer.
    pub(crate) fn rewind(&mut self, buf: &M::Chunk) -> Option<M::Buf> {
        self.flush(buf);
        let len = M::len(buf);
        let residual = (self.cursor < len).then(|| M::slice(buf, self.cursor, len).to_owned());
        self.cursor = 0;
        self.last_flush = 0;
        residual
    }

    /// Units held by open buckets.
    pub(crate) fn captured_len(&self) -> usize {
        self.buckets.iter().map(|bucket| M::len(M::as_chunk(bucket))).sum()
    }

    /// Moves `last_flush..cursor` into the innermost bucket, if any.
    fn flush(&mut self, buf: &M::Chunk) {
        if let Some(bucket) = self.buckets.last_mut() {
            M::append(bucket, M::slice(buf, self.last_flush, self.cursor));
        }
        self.last_flush = self.cursor;
    }

    fn open(
        &mut self,
        buf: &M::Chunk,
        kind: ContainerKind,
        filters: &FilterRegistry<'_>,
    ) -> Result<Step, ErrorSource> {
        if !self.expect.is_value() {
            return Err(SyntaxError::UnexpectedContainer(kind.opener()).into());
        }
        self.path.push(kind, &self.last_property_name);
        self.last_property_name.clear();

        if filters.matches(self.path.key()) {
            // The enclosing bucket keeps everything up to the opener.
            self.flush(buf);
            self.buckets.push(M::empty());
            self.path.mark_filtered();
            trace!(path = self.path.key(), depth = self.path.depth(), "capturing subtree");
        }

        self.cursor += 1;
        self.expect = match kind {
            ContainerKind::Array => Expect::OptionalValue,
            ContainerKind::Object => Expect::OptionalKey,
        };
        Ok(Step::Continue)
    }

    fn close(
        &mut self,
        buf: &M::Chunk,
        kind: ContainerKind,
        filters: &mut FilterRegistry<'_>,
    ) -> Result<Step, ErrorSource> {
        let Some(&top) = self.path.top() else {
            return Err(SyntaxError::UnexpectedCloser(kind.closer()).into());
        };
        if self.expect.is_required() {
            return Err(SyntaxError::TrailingSeparator.into());
        }
        if top.kind != kind {
            return Err(SyntaxError::MismatchedCloser(kind.closer()).into());
        }

        self.cursor += 1;
        if top.filtered {
            self.emit(buf, filters)?;
        }
        self.path.pop();
        self.last_property_name.clear();
        self.expect = Expect::Separator;

        if self.path.is_empty() {
            return Ok(Step::Stop(Scan::Done(Completion::default())));
        }
        Ok(Step::Continue)
    }

    /// Completes the innermost bucket, decodes it and hands it to its filter.
    fn emit(&mut self, buf: &M::Chunk, filters: &mut FilterRegistry<'_>) -> Result<(), ErrorSource> {
        let Some(mut bucket) = self.buckets.pop() else {
            debug_assert!(false, "filtered frame without a bucket");
            return Ok(());
        };
        M::append(&mut bucket, M::slice(buf, self.last_flush, self.cursor));
        self.last_flush = self.cursor;

        let captured = M::as_chunk(&bucket);
        let value = decode::<M, Value>(captured, self.path.key())?;
        // Enclosing captures keep the literal text of nested matches.
        if let Some(outer) = self.buckets.last_mut() {
            M::append(outer, captured);
        }
        filters.deliver(self.path.key(), value);
        Ok(())
    }

    fn separator(&mut self) -> Result<Step, ErrorSource> {
        let Some(&top) = self.path.top() else {
            return Err(SyntaxError::StraySeparator.into());
        };
        if self.expect != Expect::Separator {
            return Err(SyntaxError::StraySeparator.into());
        }
        // Nothing is capturing, so the separator after a delivered subtree is
        // simply dropped. Inside a bucket it stays to keep the capture valid.
        if self.last_flush == self.cursor && self.buckets.is_empty() {
            self.last_flush += 1;
        }
        self.cursor += 1;
        self.expect = match top.kind {
            ContainerKind::Array => Expect::Value,
            ContainerKind::Object => Expect::Key,
        };
        Ok(Step::Continue)
    }

    fn string(&mut self, buf: &M::Chunk) -> Result<Step, ErrorSource> {
        match self.expect {
            Expect::Separator => return Err(SyntaxError::MissingSeparator.into()),
            Expect::Value | Expect::OptionalValue if self.path.is_empty() => {
                return Err(SyntaxError::UnexpectedValue.into());
            }
            _ => {}
        }

        let units = M::units(buf);
        let LiteralEnd::Found(end) = scanner::string_literal_end(units, self.cursor) else {
            return Ok(Step::Stop(Scan::Incomplete));
        };

        if self.expect.is_value() {
            self.cursor = end;
            self.expect = Expect::Separator;
            return Ok(Step::Continue);
        }

        match units.get(end) {
            None => return Ok(Step::Stop(Scan::Incomplete)),
            Some(b':') => {}
            Some(_) => return Err(SyntaxError::MissingColon.into()),
        }
        let name = M::decode_to_string(M::slice(buf, self.cursor + 1, end - 1))?;
        self.last_property_name.clear();
        self.last_property_name.push_str(name);
        self.cursor = end + 1;
        self.expect = Expect::Value;
        Ok(Step::Continue)
    }

    fn number(
        &mut self,
        buf: &M::Chunk,
        input_complete: bool,
        filters: &mut FilterRegistry<'_>,
    ) -> Result<Step, ErrorSource> {
        match self.expect {
            Expect::Value | Expect::OptionalValue => {}
            Expect::Separator => return Err(SyntaxError::MissingSeparator.into()),
            Expect::Key | Expect::OptionalKey => return Err(SyntaxError::UnexpectedValue.into()),
        }

        let units = M::units(buf);
        let end = match scanner::number_literal_end(units, self.cursor) {
            LiteralEnd::Found(end) => end,
            LiteralEnd::Incomplete if input_complete && self.path.is_empty() => {
                match scanner::terminal_number_end(units, self.cursor) {
                    LiteralEnd::Found(end) => end,
                    _ => return Err(SyntaxError::InvalidNumber.into()),
                }
            }
            LiteralEnd::Incomplete => return Ok(Step::Stop(Scan::Incomplete)),
            LiteralEnd::Invalid => return Err(SyntaxError::InvalidNumber.into()),
        };

        if self.path.is_empty() {
            return self.bare_scalar(buf, end, filters);
        }
        self.cursor = end;
        self.expect = Expect::Separator;
        Ok(Step::Continue)
    }

    /// A document consisting of one number.
    fn bare_scalar(
        &mut self,
        buf: &M::Chunk,
        end: usize,
        filters: &mut FilterRegistry<'_>,
    ) -> Result<Step, ErrorSource> {
        let number = decode::<M, Number>(M::slice(buf, self.cursor, end), TOP_LEVEL)?;
        self.cursor = end;
        self.expect = Expect::Separator;
        trace!(%number, "bare scalar document");
        filters.deliver(TOP_LEVEL, Value::Number(number.clone()));
        Ok(Step::Stop(Scan::Done(Completion {
            bare_scalar: Some(number),
            error_code: None,
        })))
    }

    #[cfg(test)]
    pub(crate) fn open_buckets(&self) -> usize {
        self.buckets.len()
    }

    #[cfg(test)]
    pub(crate) fn filtered_depth(&self) -> usize {
        self.path.filtered_depth()
    }
}

/// Decodes captured units as JSON.
pub(crate) fn decode<M, T>(captured: &M::Chunk, path: &str) -> Result<T, ErrorSource>
where
    M: InputMode,
    T: serde::de::DeserializeOwned,
{
    let text = M::decode_to_string(captured)?;
    serde_json::from_str(text).map_err(|source| ErrorSource::SubtreeDecode {
        path: path.to_owned(),
        source,
    })
}
