//! Incremental extraction of filtered JSON subtrees.
//!
//! `jsonsift` consumes a JSON document that arrives in arbitrary chunks and
//! hands every subtree whose container path is registered in a
//! [`FilterRegistry`] to its handler as soon as the subtree closes. Only the
//! matched subtrees are ever decoded; the rest of the document is merely
//! delimited. The memory held between chunks is bounded by the longest
//! literal still in flight plus the text of subtrees being captured.
//!
//! A container path is the concatenation, from the root, of each open
//! container's opener followed by the property name it was opened under:
//! `[{[f{` is every object inside the `f` array of every object of a root
//! array. Property names are compared as they appear in the input, escapes
//! included.
//!
//! ```rust
//! use std::cell::RefCell;
//!
//! use jsonsift::{FilterRegistry, MarkFileVersion, Filter, Status, TextSplitter, Value};
//!
//! let files = RefCell::new(Vec::new());
//! let filters = FilterRegistry::new().insert(
//!     "{[files{",
//!     Filter::new(|v: Value| files.borrow_mut().push(v)).with_hook(MarkFileVersion::default()),
//! );
//! let mut splitter = TextSplitter::text(filters);
//!
//! splitter.feed(r#"{"files":[{"h":"a1"},{"h":"#, false).unwrap();
//! let status = splitter.feed(r#""b2"}]}"#, true).unwrap();
//!
//! assert!(matches!(status, Status::Done(_)));
//! assert_eq!(files.borrow()[1]["h"], "b2");
//! assert_eq!(files.borrow()[1]["fv"], 1);
//! ```
//!
//! The accepted grammar is narrow: containers, strings and numbers, with
//! spaces as the only whitespace. `true`, `false`, `null`, tabs and newlines
//! are rejected as bogus characters.

mod chunk_utils;
mod filter;
mod hooks;
mod parser;
mod splitter;
mod status;

#[cfg(test)]
mod tests;

#[doc(hidden)]
pub use chunk_utils::{produce_chunks, split_at_offsets};
pub use filter::{Filter, FilterRegistry, Handler, PostProcess, TOP_LEVEL};
pub use hooks::{MarkFileVersion, SequenceNumber};
pub use parser::{
    Bytes, ErrorEnvelope, ErrorSource, InputMode, ParserError, ParserOptions, SyntaxError, Text,
};
pub use serde_json::{Number, Value};
pub use splitter::{ByteSplitter, JsonSplitter, TextSplitter};
pub use status::{Completion, Status};
