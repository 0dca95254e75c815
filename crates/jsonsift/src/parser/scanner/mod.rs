//! Token scanner: locates the end of string and number literals in place.
//!
//! Neither routine copies; the number grammar check runs over a borrowed span.
//! Both report [`LiteralEnd::Incomplete`] when the buffered units cannot decide
//! where the literal ends, which the engine turns into a request for more data.

use bstr::ByteSlice;

use super::numbers::{is_number_unit, number_prefix_len};

/// Outcome of scanning for the end of a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LiteralEnd {
    /// Offset just past the literal.
    Found(usize),
    /// The buffer ran out before the literal could be delimited.
    Incomplete,
    /// The units at the start offset do not form a literal.
    Invalid,
}

/// Finds the end of the string literal whose opening quote sits at
/// `open_quote`.
///
/// A quote preceded by an odd run of backslashes is escaped; an even run
/// (including zero) terminates the literal.
pub(crate) fn string_literal_end(units: &[u8], open_quote: usize) -> LiteralEnd {
    let mut from = open_quote + 1;
    while let Some(relative) = units.get(from..).and_then(|rest| rest.find_byte(b'"')) {
        let quote = from + relative;
        let backslashes = units[open_quote + 1..quote]
            .iter()
            .rev()
            .take_while(|&&unit| unit == b'\\')
            .count();
        if backslashes % 2 == 0 {
            return LiteralEnd::Found(quote + 1);
        }
        from = quote + 1;
    }
    LiteralEnd::Incomplete
}

/// Finds the end of the number literal starting at `start`.
///
/// A run of number units reaching the end of the buffer is always
/// [`LiteralEnd::Incomplete`]: the next chunk may extend it.
pub(crate) fn number_literal_end(units: &[u8], start: usize) -> LiteralEnd {
    let span = units.get(start..).unwrap_or(&[]);
    let run = span.iter().take_while(|&&unit| is_number_unit(unit)).count();
    if run == span.len() {
        return LiteralEnd::Incomplete;
    }
    match number_prefix_len(&span[..run]) {
        0 => LiteralEnd::Invalid,
        len => LiteralEnd::Found(start + len),
    }
}

/// Validates a number literal running from `start` to the end of a complete
/// input.
pub(crate) fn terminal_number_end(units: &[u8], start: usize) -> LiteralEnd {
    let span = units.get(start..).unwrap_or(&[]);
    if !span.is_empty() && number_prefix_len(span) == span.len() {
        LiteralEnd::Found(units.len())
    } else {
        LiteralEnd::Invalid
    }
}

#[cfg(test)]
mod tests;
