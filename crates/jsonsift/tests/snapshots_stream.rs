#![expect(missing_docs)]

use std::{cell::RefCell, fmt::Write};

use insta::assert_snapshot;
use jsonsift::{
    Bytes, Filter, FilterRegistry, InputMode, JsonSplitter, MarkFileVersion, ParserOptions, Text,
    Value, produce_chunks,
};

mod common;

fn record<'a>(out: &'a RefCell<String>, path: &'static str) -> impl FnMut(Value) + 'a {
    move |value| writeln!(out.borrow_mut(), "{path} {value}").unwrap()
}

fn render<M: InputMode>(stream: &[&M::Chunk]) -> String {
    let out = RefCell::new(String::new());
    let filters = FilterRegistry::new()
        .on("[{[f{", record(&out, "[{[f{"))
        .insert(
            "[{[f2{",
            Filter::new(record(&out, "[{[f2{")).with_hook(MarkFileVersion::default()),
        )
        .on("[{{ok", record(&out, "[{{ok"));
    let mut splitter = JsonSplitter::<M>::with_options(filters, ParserOptions::default());

    let mut statuses = Vec::new();
    for (i, chunk) in stream.iter().enumerate() {
        statuses.push(splitter.feed(chunk, i + 1 == stream.len()).unwrap());
    }
    drop(splitter);

    // Only the final call may complete the document.
    let (last, init) = statuses.split_last().unwrap();
    assert!(init.iter().all(|status| !status.is_done()));

    let mut out = out.into_inner();
    writeln!(out, "{last:?}").unwrap();
    out
}

#[test]
fn snapshot_file_listing_stream() {
    assert_snapshot!(render::<Text>(&common::STREAM), @r#"
    [{[f{ {"h":"a1","p":"root","t":1,"s":0,"n":"notes \"draft\""}
    [{[f{ {"h":"b2","p":"a1","t":0,"s":2048,"n":"café.txt"}
    [{[f2{ {"h":"c3","p":"b2","t":0,"s":1024,"n":"a.bin","fv":1}
    [{{ok {"ts":1712345678}
    Done(Completion { bare_scalar: None, error_code: None })
    "#);
}

#[test]
fn byte_chunks_render_identically() {
    let joined = common::STREAM.join("");
    let expected = render::<Text>(&common::STREAM);
    for parts in [1, 2, 7, 23, joined.len()] {
        let chunks = produce_chunks::<Bytes>(joined.as_bytes(), parts);
        assert_eq!(render::<Bytes>(&chunks), expected, "{parts} parts");
    }
}
