/// Kind of an open container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContainerKind {
    /// `{ ... }`
    Object,
    /// `[ ... ]`
    Array,
}

impl ContainerKind {
    /// The opening unit, which doubles as the kind marker in a filter path.
    #[must_use]
    pub(crate) fn opener(self) -> u8 {
        match self {
            ContainerKind::Object => b'{',
            ContainerKind::Array => b'[',
        }
    }

    /// The closing unit.
    #[must_use]
    pub(crate) fn closer(self) -> u8 {
        match self {
            ContainerKind::Object => b'}',
            ContainerKind::Array => b']',
        }
    }
}

/// One open container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Frame {
    pub(crate) kind: ContainerKind,
    /// Length of the joined key before this frame's segment was appended.
    key_len: usize,
    /// Whether a bucket was opened for this container.
    pub(crate) filtered: bool,
}

/// Stack of open containers together with the joined filter key.
///
/// Each frame contributes one segment, its kind marker followed by the
/// property name it was opened under (empty inside arrays and at the root).
/// The joined key mirrors exactly the currently open containers.
#[derive(Debug, Default, Clone)]
pub(crate) struct PathStack {
    key: String,
    frames: Vec<Frame>,
}

impl PathStack {
    pub(crate) fn new() -> Self {
        Self {
            key: String::new(),
            frames: Vec::with_capacity(16),
        }
    }

    pub(crate) fn push(&mut self, kind: ContainerKind, name: &str) {
        self.frames.push(Frame {
            kind,
            key_len: self.key.len(),
            filtered: false,
        });
        self.key.push(char::from(kind.opener()));
        self.key.push_str(name);
    }

    pub(crate) fn pop(&mut self) -> Option<Frame> {
        let frame = self.frames.pop()?;
        self.key.truncate(frame.key_len);
        Some(frame)
    }

    pub(crate) fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub(crate) fn mark_filtered(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.filtered = true;
        }
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn filtered_depth(&self) -> usize {
        self.frames.iter().filter(|frame| frame.filtered).count()
    }
}
