//! Input representations.
//!
//! A splitter is bound to one representation for its whole life: [`Text`]
//! consumes `&str` chunks, [`Bytes`] consumes `&[u8]` chunks. Both are scanned
//! through the same byte view, so the structural engine never branches on the
//! representation per character. Every offset the engine slices at sits on an
//! ASCII unit (a quote, a bracket, a separator or the buffer ends), which keeps
//! text slicing on `char` boundaries.

use std::fmt;

use bstr::ByteSlice;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Text {}
    impl Sealed for super::Bytes {}
}

/// Buffer primitives shared by the scanner, the engine and the splitter.
pub trait InputMode: sealed::Sealed + fmt::Debug + 'static {
    /// Borrowed chunk type accepted by `feed`.
    type Chunk: ?Sized + fmt::Debug + ToOwned<Owned = Self::Buf>;
    /// Owned accumulator for residuals and captured subtrees.
    type Buf: fmt::Debug + Clone;

    /// Unit view used for single-unit comparisons.
    fn units(chunk: &Self::Chunk) -> &[u8];

    /// Borrows `start..end` of `chunk`.
    fn slice(chunk: &Self::Chunk, start: usize, end: usize) -> &Self::Chunk;

    /// Appends `chunk` to a retained residual.
    fn concat(mut residual: Self::Buf, chunk: &Self::Chunk) -> Self::Buf {
        Self::append(&mut residual, chunk);
        residual
    }

    /// Appends `src` to `dst`.
    fn append(dst: &mut Self::Buf, src: &Self::Chunk);

    /// A fresh, empty accumulator.
    fn empty() -> Self::Buf;

    /// Borrows an accumulator as a chunk.
    fn as_chunk(buf: &Self::Buf) -> &Self::Chunk;

    /// Views `chunk` as UTF-8 text without copying.
    ///
    /// # Errors
    ///
    /// Fails in byte mode when the chunk is not valid UTF-8.
    fn decode_to_string(chunk: &Self::Chunk) -> Result<&str, bstr::Utf8Error>;

    /// Whether `chunk` may be split at `index` into two valid chunks.
    fn is_boundary(chunk: &Self::Chunk, index: usize) -> bool;

    /// Length of `chunk` in units.
    #[inline]
    fn len(chunk: &Self::Chunk) -> usize {
        Self::units(chunk).len()
    }
}

/// Character-sequence input (`&str` chunks).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Text;

/// Byte-sequence input (`&[u8]` chunks).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bytes;

impl InputMode for Text {
    type Chunk = str;
    type Buf = String;

    #[inline]
    fn units(chunk: &str) -> &[u8] {
        chunk.as_bytes()
    }

    #[inline]
    fn slice(chunk: &str, start: usize, end: usize) -> &str {
        &chunk[start..end]
    }

    #[inline]
    fn append(dst: &mut String, src: &str) {
        dst.push_str(src);
    }

    fn empty() -> String {
        String::new()
    }

    #[inline]
    fn as_chunk(buf: &String) -> &str {
        buf.as_str()
    }

    #[inline]
    fn decode_to_string(chunk: &str) -> Result<&str, bstr::Utf8Error> {
        Ok(chunk)
    }

    fn is_boundary(chunk: &str, index: usize) -> bool {
        chunk.is_char_boundary(index)
    }
}

impl InputMode for Bytes {
    type Chunk = [u8];
    type Buf = Vec<u8>;

    #[inline]
    fn units(chunk: &[u8]) -> &[u8] {
        chunk
    }

    #[inline]
    fn slice(chunk: &[u8], start: usize, end: usize) -> &[u8] {
        &chunk[start..end]
    }

    #[inline]
    fn append(dst: &mut Vec<u8>, src: &[u8]) {
        dst.extend_from_slice(src);
    }

    fn empty() -> Vec<u8> {
        Vec::new()
    }

    #[inline]
    fn as_chunk(buf: &Vec<u8>) -> &[u8] {
        buf.as_slice()
    }

    #[inline]
    fn decode_to_string(chunk: &[u8]) -> Result<&str, bstr::Utf8Error> {
        chunk.to_str()
    }

    fn is_boundary(chunk: &[u8], index: usize) -> bool {
        index <= chunk.len()
    }
}
