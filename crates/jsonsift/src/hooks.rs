//! Built-in [`PostProcess`] hooks for protocol-specific augmentation.
//!
//! Which paths these attach to is the caller's decision; the engine itself
//! never augments values.

use std::{cell::Cell, rc::Rc};

use serde_json::Value;

use crate::filter::PostProcess;

/// Flags delivered objects as file versions by inserting `key: 1`.
///
/// Non-object values pass through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkFileVersion {
    key: &'static str,
}

impl MarkFileVersion {
    /// Flags under a custom key.
    #[must_use]
    pub fn with_key(key: &'static str) -> Self {
        Self { key }
    }
}

impl Default for MarkFileVersion {
    fn default() -> Self {
        Self { key: "fv" }
    }
}

impl PostProcess for MarkFileVersion {
    fn apply(&mut self, value: &mut Value) {
        if let Some(object) = value.as_object_mut() {
            object.insert(self.key.into(), Value::from(1));
        }
    }
}

/// Stamps delivered objects with a running sequence number.
///
/// The counter is shared so the owner can seed it and observe it while the
/// hook lives inside a registry. Each stamped object advances it by one.
#[derive(Debug, Clone)]
pub struct SequenceNumber {
    key: String,
    counter: Rc<Cell<u64>>,
}

impl SequenceNumber {
    /// Stamps under `key` from `counter`.
    pub fn new(key: impl Into<String>, counter: Rc<Cell<u64>>) -> Self {
        Self {
            key: key.into(),
            counter,
        }
    }
}

impl PostProcess for SequenceNumber {
    fn apply(&mut self, value: &mut Value) {
        if let Some(object) = value.as_object_mut() {
            let current = self.counter.get();
            object.insert(self.key.clone(), Value::from(current));
            self.counter.set(current + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn file_version_flag_is_appended_last() {
        let mut value = json!({"h": "abc", "s": 3});
        MarkFileVersion::default().apply(&mut value);
        assert_eq!(value.to_string(), r#"{"h":"abc","s":3,"fv":1}"#);

        let mut value = json!([1]);
        MarkFileVersion::with_key("v").apply(&mut value);
        assert_eq!(value, json!([1]));
    }

    #[test]
    fn sequence_number_advances_shared_counter() {
        let counter = Rc::new(Cell::new(7));
        let mut hook = SequenceNumber::new("i", Rc::clone(&counter));
        let mut first = json!({"a": 1});
        let mut second = json!({"a": 2});
        let mut skipped = json!(3);
        hook.apply(&mut first);
        hook.apply(&mut skipped);
        hook.apply(&mut second);
        assert_eq!(first, json!({"a": 1, "i": 7}));
        assert_eq!(second, json!({"a": 2, "i": 8}));
        assert_eq!(skipped, json!(3));
        assert_eq!(counter.get(), 9);
    }
}
