use rstest::rstest;

use super::*;

#[rstest]
#[case(br#""abc""#, 0, LiteralEnd::Found(5))]
#[case(br#"[1,"abc",2]"#, 3, LiteralEnd::Found(8))]
#[case(br#""""#, 0, LiteralEnd::Found(2))]
#[case(br#""a\"b""#, 0, LiteralEnd::Found(6))]
#[case(br#""a\\"b"#, 0, LiteralEnd::Found(5))]
#[case(br#""a\\\"b""#, 0, LiteralEnd::Found(8))]
#[case(br#""\\\\""#, 0, LiteralEnd::Found(6))]
#[case(br#""abc"#, 0, LiteralEnd::Incomplete)]
#[case(br#""a\""#, 0, LiteralEnd::Incomplete)]
#[case(br#"""#, 0, LiteralEnd::Incomplete)]
fn string_ends(#[case] units: &[u8], #[case] start: usize, #[case] expected: LiteralEnd) {
    assert_eq!(string_literal_end(units, start), expected);
}

#[test]
fn string_end_ignores_backslashes_before_the_literal() {
    // The backslash preceding the opening quote belongs to another token.
    let units = br#"\"x""#;
    assert_eq!(string_literal_end(units, 1), LiteralEnd::Found(4));
}

#[test]
fn string_end_handles_multibyte_content() {
    let units = "\"h\u{e9}llo \u{1f600}\",".as_bytes();
    assert_eq!(string_literal_end(units, 0), LiteralEnd::Found(units.len() - 1));
}

#[rstest]
#[case(b"12,", 0, LiteralEnd::Found(2))]
#[case(b"[-1.5e3]", 1, LiteralEnd::Found(7))]
#[case(b"0 ", 0, LiteralEnd::Found(1))]
#[case(b"01]", 0, LiteralEnd::Found(1))]
#[case(b"1.]", 0, LiteralEnd::Found(1))]
#[case(b"12", 0, LiteralEnd::Incomplete)]
#[case(b"[1", 1, LiteralEnd::Incomplete)]
#[case(b"-", 0, LiteralEnd::Incomplete)]
#[case(b".5]", 0, LiteralEnd::Invalid)]
#[case(b"-]", 0, LiteralEnd::Invalid)]
#[case(b"+1,", 0, LiteralEnd::Invalid)]
fn number_ends(#[case] units: &[u8], #[case] start: usize, #[case] expected: LiteralEnd) {
    assert_eq!(number_literal_end(units, start), expected);
}

#[rstest]
#[case(b"42", 0, LiteralEnd::Found(2))]
#[case(b" -0.5", 1, LiteralEnd::Found(5))]
#[case(b"1e", 0, LiteralEnd::Invalid)]
#[case(b"-", 0, LiteralEnd::Invalid)]
#[case(b"", 0, LiteralEnd::Invalid)]
fn terminal_number_ends(#[case] units: &[u8], #[case] start: usize, #[case] expected: LiteralEnd) {
    assert_eq!(terminal_number_end(units, start), expected);
}
