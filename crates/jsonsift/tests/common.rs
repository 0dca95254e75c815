#![allow(missing_docs)]
#![expect(clippy::needless_raw_string_hashes)]

pub const ORIGINAL: &str = r#"
[
    {
        "sn": "x9",
        "f": [
            {
                "h": "a1",
                "p": "root",
                "t": 1,
                "s": 0,
                "n": "notes \"draft\""
            },
            {
                "h": "b2",
                "p": "a1",
                "t": 0,
                "s": 2048,
                "n": "café.txt"
            }
        ],
        "f2": [
            {
                "h": "c3",
                "p": "b2",
                "t": 0,
                "s": 1024,
                "n": "a.bin"
            }
        ],
        "ok": {
            "ts": 1712345678
        }
    }
]"#;

// A file listing response as a transport would hand it over, cut on the
// seams the splitter must resume from.
#[rustfmt::skip]
pub const STREAM: [&str; 9] = [
    r#"[{"sn":"x"#,                                                   // inside a string value
    r#"9","f":[{"h"#,                                                 // inside a property name
    r#"":"a1","p":"root","t":1,"s":0,"n":"notes \"#,                  // right after a backslash
    r#""draft\""},{"h":"b2","p":"a1","t":0,"s":20"#,                  // inside a number
    r#"48,"n":"café.txt"}"#,                                          // a matched subtree closes on the seam
    r#"],"f2""#,                                                      // property name complete, colon pending
    r#":[{"h":"c3","p":"b2","t":0,"s":1024,"n":"a.bin"}],"#,          // ends on a separator
    r#""ok":{"ts":1712345678}}"#,
    r#"]"#,                                                           // closes the document
];

#[test]
fn assert_stream_example() {
    let streamed = STREAM.join("");

    let value: serde_json::Value = serde_json::from_str(ORIGINAL).unwrap();
    let original = serde_json::to_string(&value).unwrap();

    assert_eq!(streamed, original);
}
