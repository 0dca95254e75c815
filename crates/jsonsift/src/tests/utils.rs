use std::cell::RefCell;

use crate::{FilterRegistry, InputMode, JsonSplitter, ParserError, ParserOptions, Status, Value};

/// Deliveries as `(path, compact JSON)` pairs, in delivery order.
pub(crate) type Seen = RefCell<Vec<(String, String)>>;

/// A registry recording every delivery for `paths` into `seen`.
pub(crate) fn recording<'a, P: AsRef<str>>(paths: &[P], seen: &'a Seen) -> FilterRegistry<'a> {
    paths.iter().fold(FilterRegistry::new(), |filters, path| {
        let name = path.as_ref().to_owned();
        filters.on(path.as_ref(), move |value: Value| {
            seen.borrow_mut().push((name.clone(), value.to_string()));
        })
    })
}

/// Outcome of streaming one document.
#[derive(Debug)]
pub(crate) struct Run {
    pub(crate) deliveries: Vec<(String, String)>,
    pub(crate) status: Result<Status, ParserError>,
    /// Largest residual observed after any call.
    pub(crate) peak_residual: usize,
}

/// Feeds `chunks` in order, then finalizes with an empty chunk.
pub(crate) fn feed_all<M: InputMode, P: AsRef<str>>(
    chunks: &[&M::Chunk],
    paths: &[P],
    options: ParserOptions,
) -> Run {
    let seen = Seen::default();
    let mut splitter = JsonSplitter::<M>::with_options(recording(paths, &seen), options);
    let mut peak_residual = 0;
    let mut status = Ok(Status::NeedMoreData);
    for chunk in chunks {
        status = splitter.feed(chunk, false);
        peak_residual = peak_residual.max(splitter.residual_len());
        if status.is_err() {
            break;
        }
    }
    if status.is_ok() {
        let empty = M::empty();
        status = splitter.feed(M::as_chunk(&empty), true);
    }
    drop(splitter);
    Run {
        deliveries: seen.into_inner(),
        status,
        peak_residual,
    }
}

/// Options with the error envelope disabled.
pub(crate) fn plain() -> ParserOptions {
    ParserOptions {
        error_envelope: None,
        ..Default::default()
    }
}
