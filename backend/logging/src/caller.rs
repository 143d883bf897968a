//! Caller resolution
//!
//! Turns an invocation context into a `Type::method` / `function` label.
//! Frames are captured at the call site with [`here!`](crate::here) rather
//! than by walking the native stack.

/// Last path segment `here!()` appends to the captured function path.
#[doc(hidden)]
pub const HERE_MARKER: &str = "__here";

/// One entry of a call stack snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub owner: Option<String>,
    pub function: Option<String>,
}

impl Frame {
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            owner: None,
            function: Some(name.into()),
        }
    }

    pub fn method(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            function: Some(name.into()),
        }
    }

    /// Build a frame from a fully qualified function path such as
    /// `app::cache::Cache::flush` or `<app::Cache as app::Store>::get`.
    ///
    /// Closure segments and the `here!` marker are skipped. The segment
    /// before the function counts as its owner when it names a type.
    pub fn from_type_path(path: &str) -> Self {
        let mut segments: Vec<&str> = split_path(path)
            .into_iter()
            .filter(|s| !s.is_empty() && !s.starts_with("{{"))
            .collect();
        if segments.last() == Some(&HERE_MARKER) {
            segments.pop();
        }

        let Some(function) = segments.pop() else {
            return Self::default();
        };
        let owner = segments.pop().and_then(owner_name);
        Self {
            owner,
            function: Some(function.to_string()),
        }
    }

    /// `Owner::function`, `function`, or empty when nothing identifies it.
    pub fn label(&self) -> String {
        match (self.owner.as_deref(), self.function.as_deref()) {
            (Some(owner), Some(function)) => format!("{owner}::{function}"),
            (None, Some(function)) => function.to_string(),
            (Some(owner), None) => owner.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Snapshot of active calls, innermost first.
///
/// Frame 0 is the logging entry point, frame 1 the code that called it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallStack {
    frames: Vec<Frame>,
}

impl CallStack {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    /// The two-frame stack the shorthand macros build.
    pub fn entry(entry_point: Frame, caller: Frame) -> Self {
        Self::new(vec![entry_point, caller])
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

/// Label of whoever called the logging entry point. Empty when the stack is
/// too shallow or the frame carries nothing.
pub fn label_for(stack: &CallStack) -> String {
    stack.frames().get(1).map(Frame::label).unwrap_or_default()
}

/// Split on `::` outside of angle brackets.
fn split_path(path: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let bytes = path.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                out.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    out.push(&path[start..]);
    out
}

/// Short type name of an owner segment, if it is one.
fn owner_name(segment: &str) -> Option<String> {
    // `<T as Trait>` / `<impl T>` / `<T>`
    if let Some(inner) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        let inner = inner.strip_prefix("impl ").unwrap_or(inner);
        let ty = split_top_level(inner, " as ").next().unwrap_or(inner);
        return owner_name(last_segment(ty));
    }

    let base = segment.split('<').next().unwrap_or(segment);
    base.chars()
        .next()
        .filter(char::is_ascii_uppercase)
        .map(|_| base.to_string())
}

fn last_segment(path: &str) -> &str {
    split_path(path).last().copied().unwrap_or(path)
}

/// Split on `sep` outside of angle brackets.
fn split_top_level<'a>(s: &'a str, sep: &'a str) -> impl Iterator<Item = &'a str> {
    let mut depth = 0usize;
    let mut cut = None;
    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 && s[i..].starts_with(sep) => {
                cut = Some(i);
                break;
            }
            _ => {}
        }
    }
    match cut {
        Some(i) => vec![&s[..i], &s[i + sep.len()..]].into_iter(),
        None => vec![s].into_iter(),
    }
}
