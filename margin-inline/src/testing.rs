//! In-memory implementations for testing.
//!
//! Available behind the `test-utils` feature flag. [`ScratchBuffer`] is a
//! line-based document standing in for the host editor; [`ScriptedModel`]
//! replays canned generation events.

use std::cell::RefCell;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use margin_types::{
    GenerateEvent, GenerateHandle, Model, ModelError, NoteEditor, Position,
};

/// An in-memory line buffer implementing [`NoteEditor`].
///
/// Tracks the region writes, scrolls, and notices the processor performs so
/// tests can assert on them.
pub struct ScratchBuffer {
    inner: RefCell<BufferState>,
}

struct BufferState {
    lines: Vec<String>,
    cursor: Position,
    selection: Option<String>,
    selection_output: String,
    region_len: Option<usize>,
    region_writes: Vec<String>,
    scrolls: Vec<Position>,
    notices: Vec<String>,
}

impl ScratchBuffer {
    /// Build a buffer from initial lines, cursor at the origin.
    #[must_use]
    pub fn from_lines(lines: &[&str]) -> Self {
        Self {
            inner: RefCell::new(BufferState {
                lines: lines.iter().map(|l| (*l).to_string()).collect(),
                cursor: Position::new(0, 0),
                selection: None,
                selection_output: String::new(),
                region_len: None,
                region_writes: Vec::new(),
                scrolls: Vec::new(),
                notices: Vec::new(),
            }),
        }
    }

    /// Pretend the user selected `text`.
    pub fn select(&self, text: &str) {
        self.inner.borrow_mut().selection = Some(text.to_string());
    }

    /// The whole document.
    #[must_use]
    pub fn text(&self) -> String {
        self.inner.borrow().lines.join("\n")
    }

    /// Everything streamed through `replace_selection`, concatenated.
    #[must_use]
    pub fn selection_output(&self) -> String {
        self.inner.borrow().selection_output.clone()
    }

    /// Every full-region rewrite, in order.
    #[must_use]
    pub fn region_writes(&self) -> Vec<String> {
        self.inner.borrow().region_writes.clone()
    }

    /// Positions scrolled to, in order.
    #[must_use]
    pub fn scrolls(&self) -> Vec<Position> {
        self.inner.borrow().scrolls.clone()
    }

    /// Notices shown, in order.
    #[must_use]
    pub fn notices(&self) -> Vec<String> {
        self.inner.borrow().notices.clone()
    }
}

fn byte_index(line: &str, ch: usize) -> usize {
    line.char_indices()
        .nth(ch)
        .map_or(line.len(), |(idx, _)| idx)
}

impl NoteEditor for ScratchBuffer {
    fn cursor(&self) -> Position {
        self.inner.borrow().cursor
    }

    fn set_cursor(&self, pos: Position) {
        self.inner.borrow_mut().cursor = pos;
    }

    fn line_text(&self, line: usize) -> Option<String> {
        self.inner.borrow().lines.get(line).cloned()
    }

    fn set_line(&self, line: usize, text: &str) {
        let mut state = self.inner.borrow_mut();
        if line >= state.lines.len() {
            state.lines.resize(line + 1, String::new());
        }
        state.lines[line] = text.to_string();
    }

    fn insert_at(&self, pos: Position, text: &str) {
        let mut state = self.inner.borrow_mut();
        if pos.line >= state.lines.len() {
            state.lines.resize(pos.line + 1, String::new());
        }
        let line = state.lines[pos.line].clone();
        let split = byte_index(&line, pos.ch);
        let combined = format!("{}{}{}", &line[..split], text, &line[split..]);
        let new_lines: Vec<String> = combined.split('\n').map(str::to_string).collect();
        state.lines.splice(pos.line..=pos.line, new_lines);
    }

    fn selected_text(&self) -> Option<String> {
        self.inner.borrow().selection.clone()
    }

    fn replace_selection(&self, text: &str) {
        // After the first replacement the selection has collapsed, so
        // every call appends.
        self.inner.borrow_mut().selection_output.push_str(text);
    }

    fn write_region(&self, origin: Position, text: &str) {
        let mut state = self.inner.borrow_mut();
        let start = origin.line + 1;
        if start > state.lines.len() {
            state.lines.resize(start, String::new());
        }
        let prev_len = state.region_len.unwrap_or(1);
        let end = (start + prev_len).min(state.lines.len());
        let new_lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        state.region_len = Some(new_lines.len());
        state.lines.splice(start..end, new_lines);
        state.region_writes.push(text.to_string());
    }

    fn scroll_to(&self, pos: Position) {
        self.inner.borrow_mut().scrolls.push(pos);
    }

    fn notify(&self, message: &str) {
        self.inner.borrow_mut().notices.push(message.to_string());
    }
}

/// What a [`ScriptedModel`] does when asked to generate.
enum Script {
    /// Yield these events, then end the stream.
    Stream(Vec<GenerateEvent>),
    /// Refuse the request outright.
    Refuse(ModelError),
}

/// A [`Model`] that replays a canned script and records its prompts.
pub struct ScriptedModel {
    script: Script,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    /// Stream these tokens, then end.
    #[must_use]
    pub fn tokens(tokens: &[&str]) -> Self {
        Self::from_script(Script::Stream(
            tokens
                .iter()
                .map(|t| GenerateEvent::Token((*t).to_string()))
                .collect(),
        ))
    }

    /// Stream these tokens, then fail mid-stream.
    #[must_use]
    pub fn tokens_then_error(tokens: &[&str], err: ModelError) -> Self {
        let mut events: Vec<GenerateEvent> = tokens
            .iter()
            .map(|t| GenerateEvent::Token((*t).to_string()))
            .collect();
        events.push(GenerateEvent::Error(err));
        Self::from_script(Script::Stream(events))
    }

    /// Refuse every request with this error.
    #[must_use]
    pub fn refuse(err: ModelError) -> Self {
        Self::from_script(Script::Refuse(err))
    }

    fn from_script(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// How many generations were started.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The prompts received, in order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("not poisoned").clone()
    }
}

impl Model for ScriptedModel {
    fn generate(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<GenerateHandle, ModelError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .expect("not poisoned")
            .push(prompt.to_string());

        let result = match &self.script {
            Script::Stream(events) => Ok(events.clone()),
            Script::Refuse(err) => Err(err.clone()),
        };

        async move {
            // Park once so a concurrently driven trigger can observe the
            // in-flight state.
            tokio::task::yield_now().await;
            result.map(|events| GenerateHandle::new(futures::stream::iter(events)))
        }
    }

    fn models(&self) -> impl Future<Output = Vec<String>> + Send {
        async { Vec::new() }
    }
}
