//! Restricted number grammar: `-?(0|[1-9]\d*)(\.\d+)?([eE][+-]?\d+)?`.

/// Units that may appear inside a number literal.
#[inline]
pub(crate) fn is_number_unit(unit: u8) -> bool {
    matches!(unit, b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E')
}

/// Length of the longest prefix of `span` matching the number grammar, or `0`
/// when no prefix matches.
///
/// Optional groups behave greedily like the equivalent anchored regex: `1.`
/// matches `1`, `1e+` matches `1`.
pub(crate) fn number_prefix_len(span: &[u8]) -> usize {
    let mut len = usize::from(span.first() == Some(&b'-'));

    match span.get(len) {
        Some(b'0') => len += 1,
        Some(b'1'..=b'9') => len += 1 + digits(&span[len + 1..]),
        _ => return 0,
    }

    if span.get(len) == Some(&b'.') {
        let fraction = digits(&span[len + 1..]);
        if fraction > 0 {
            len += 1 + fraction;
        }
    }

    if matches!(span.get(len), Some(b'e' | b'E')) {
        let mut exponent = len + 1;
        if matches!(span.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let count = digits(span.get(exponent..).unwrap_or(&[]));
        if count > 0 {
            len = exponent + count;
        }
    }

    len
}

fn digits(span: &[u8]) -> usize {
    span.iter().take_while(|unit| unit.is_ascii_digit()).count()
}
