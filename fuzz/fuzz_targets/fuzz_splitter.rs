#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsonsift::{
    Bytes, FilterRegistry, InputMode, JsonSplitter, ParserOptions, Status, TOP_LEVEL, Text,
    split_at_offsets,
};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 5; // 1 flag + 4-byte seed

/// Paths registered on every run. Generated documents reuse these keys so
/// that nested captures actually happen.
const PATHS: &[&str] = &["[", "{", "[{", "[[", "{[a", "{{b", "[{[a", "[{[a{", "{[a{{b", TOP_LEVEL];
const KEYS: &[&str] = &["a", "b", "err", "a\"", "é"];

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x03);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let limit = max_size - HEADER;
        HEADER + append_document(&mut data[HEADER..], size.max(HEADER * 2), limit)
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fn append_document(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..size * 2).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryDoc::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break value;
        }
    };

    let serialized = serde_json::to_vec(&value.0).expect("Failed to serialize arbitrary value");
    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

/// A value in the accepted grammar: no literals, integer numbers.
#[derive(Debug)]
struct ArbitraryDoc(Value);

impl<'a> Arbitrary<'a> for ArbitraryDoc {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(12)? {
            0 | 1 => Value::from(u.arbitrary::<i64>()?),
            2..=4 => Value::String(u.arbitrary()?),
            5..=7 => {
                let elems: Vec<ArbitraryDoc> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            _ => {
                let entries: Vec<(usize, ArbitraryDoc)> = u.arbitrary()?;
                Value::Object(Map::from_iter(
                    entries
                        .into_iter()
                        .map(|(k, v)| (KEYS[k % KEYS.len()].to_owned(), v.0)),
                ))
            }
        };
        Ok(ArbitraryDoc(value))
    }
}

type Outcome = (Vec<(String, String)>, Result<Status, (String, usize)>);

fn run<M: InputMode>(chunks: &[&M::Chunk], options: ParserOptions) -> Outcome {
    let seen = RefCell::new(Vec::new());
    let filters = PATHS.iter().fold(FilterRegistry::new(), |filters, &path| {
        let seen = &seen;
        filters.on(path, move |value: Value| {
            seen.borrow_mut().push((path.to_owned(), value.to_string()));
        })
    });
    let mut splitter = JsonSplitter::<M>::with_options(filters, options);

    let mut status = Ok(Status::NeedMoreData);
    for (i, chunk) in chunks.iter().enumerate() {
        status = splitter.feed(chunk, i + 1 == chunks.len());
        if status.is_err() {
            break;
        }
    }
    drop(splitter);
    let status = status.map_err(|err| (err.to_string(), err.offset()));
    (seen.into_inner(), status)
}

/// Feeding whole and feeding in pieces must agree on every delivery and on
/// the final outcome.
fn differential<M: InputMode>(payload: &M::Chunk, split_seed: u64, options: ParserOptions) {
    let len = M::len(payload);
    let mut offsets = Vec::new();
    let mut state = split_seed | 1;
    for _ in 0..len.min(16) {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        offsets.push((state >> 33) as usize % len.max(1));
    }
    offsets.sort_unstable();

    let whole = run::<M>(&[payload], options);
    let split = run::<M>(&split_at_offsets::<M>(payload, &offsets), options);
    assert_eq!(whole, split);
}

fn splitter(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let split_seed = u64::from(u32::from_le_bytes(data[1..5].try_into().unwrap()));
    let data = &data[HEADER..];

    let options = ParserOptions {
        error_envelope: if flags & 2 != 0 { None } else { Some(Default::default()) },
        panic_on_error: false,
    };

    if flags & 1 != 0 {
        differential::<Bytes>(data, split_seed, options);
    } else {
        let text = String::from_utf8_lossy(data);
        differential::<Text>(&text, split_seed, options);
    }
}

fuzz_target!(|data: &[u8]| splitter(data));
