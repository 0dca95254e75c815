use crate::{Bytes, Text, produce_chunks, split_at_offsets};

#[test]
fn produce_chunks_example() {
    let payload = "[\"foo\",\"bar\"]";
    let chunks = produce_chunks::<Text>(payload, 5);
    assert_eq!(chunks, vec!["[\"f", "oo\"", ",\"b", "ar\"", "]"]);
    let chunks = produce_chunks::<Bytes>(payload.as_bytes(), 5);
    assert_eq!(chunks.concat(), payload.as_bytes());
}

#[test]
fn produce_chunks_multibyte() {
    let payload = "[\"f😊o\",\"b🚀r\"]";
    let chunks = produce_chunks::<Text>(payload, 5);
    let mut idx = 0;
    for chunk in &chunks {
        idx += chunk.len();
        assert!(payload.is_char_boundary(idx));
    }
    assert_eq!(chunks.concat(), payload);

    // Bytes may split inside a code point.
    let chunks = produce_chunks::<Bytes>(payload.as_bytes(), payload.len());
    assert_eq!(chunks.len(), payload.len());
}

#[test]
fn split_at_offsets_skips_unusable_offsets() {
    let payload = "[\"é\"]";
    assert_eq!(split_at_offsets::<Text>(payload, &[1, 4, 3, 0, 6]), vec!["[", "\"é", "\"]"]);
    assert_eq!(
        split_at_offsets::<Bytes>(payload.as_bytes(), &[1, 3]),
        vec![&b"["[..], &b"\"\xc3"[..], &b"\xa9\"]"[..]]
    );
    assert_eq!(split_at_offsets::<Text>(payload, &[]), vec![payload]);
}
