//! The inline command processor: trigger to streamed document rewrite.

use std::cell::Cell;

use margin_types::{Model, NoteEditor, Position};

use crate::trigger::Trigger;

/// Text shown when a generation cycle finishes.
const DONE_NOTICE: &str = "Ollama response generated";

/// Where the processor is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    /// Ready to accept a trigger.
    Idle,
    /// A generation is streaming into the document.
    Streaming,
}

/// Detects trigger lines and streams model output into the document.
///
/// At most one streaming cycle runs at a time, system-wide: a trigger that
/// fires while one is active performs no model call and no document
/// mutation. The state cell makes the processor single-thread only, which
/// is where the host editor lives anyway.
pub struct InlineProcessor {
    state: Cell<ProcessorState>,
    trigger: Trigger,
}

impl InlineProcessor {
    /// Create an idle processor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Cell::new(ProcessorState::Idle),
            trigger: Trigger::new(),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ProcessorState {
        self.state.get()
    }

    /// Enter the streaming state. Refuses when a cycle is already active.
    fn begin(&self) -> bool {
        if self.state.get() == ProcessorState::Streaming {
            tracing::debug!("inline trigger ignored, a generation is already streaming");
            return false;
        }
        self.state.set(ProcessorState::Streaming);
        true
    }

    /// Leave the streaming state. Runs at the end of every cycle, success
    /// and error-as-text alike.
    fn finish(&self) {
        self.state.set(ProcessorState::Idle);
    }

    /// Explicit invocation: process an `ollama <prompt>` line directly
    /// above the cursor. Does nothing when the line does not match or a
    /// cycle is already streaming.
    pub async fn run_command<E, M>(&self, editor: &E, model: &M)
    where
        E: NoteEditor,
        M: Model,
    {
        let cursor = editor.cursor();
        let Some(trigger_line) = cursor.line.checked_sub(1) else {
            return;
        };
        let Some(above) = editor.line_text(trigger_line) else {
            return;
        };
        let Some(prompt) = self.trigger.inline_prompt(&above).map(str::to_string) else {
            return;
        };
        self.stream_line_command(editor, model, &prompt, trigger_line)
            .await;
    }

    /// Enter-keypress path. Returns whether the event was consumed, so the
    /// host knows to suppress its default handling.
    pub async fn on_enter<E, M>(&self, editor: &E, model: &M) -> bool
    where
        E: NoteEditor,
        M: Model,
    {
        let cursor = editor.cursor();
        let Some(trigger_line) = cursor.line.checked_sub(1) else {
            return false;
        };
        let Some(above) = editor.line_text(trigger_line) else {
            return false;
        };
        let Some(prompt) = self.trigger.enter_prompt(&above).map(str::to_string) else {
            return false;
        };
        self.stream_line_command(editor, model, &prompt, trigger_line)
            .await
    }

    /// Selection-based invocation: the selected text is the prompt,
    /// verbatim. Chunks stream through `replace_selection`, so output lands
    /// where the selection was; there is no trigger line and no response
    /// region.
    pub async fn run_selection<E, M>(&self, editor: &E, model: &M)
    where
        E: NoteEditor,
        M: Model,
    {
        let Some(selection) = editor.selected_text() else {
            return;
        };
        if selection.is_empty() {
            return;
        }
        if !self.begin() {
            return;
        }

        model
            .generate_response(&selection, |chunk| editor.replace_selection(chunk))
            .await;

        self.finish();
    }

    /// The streaming cycle shared by the line-based entry points.
    ///
    /// Returns whether a cycle actually ran.
    async fn stream_line_command<E, M>(
        &self,
        editor: &E,
        model: &M,
        prompt: &str,
        trigger_line: usize,
    ) -> bool
    where
        E: NoteEditor,
        M: Model,
    {
        if !self.begin() {
            return false;
        }

        let origin = Position::new(trigger_line, 0);

        // Clear the trigger line and open a blank response region at the
        // cursor.
        editor.set_line(trigger_line, "");
        let cursor = editor.cursor();
        editor.set_cursor(Position::new(cursor.line, 0));
        editor.insert_at(Position::new(cursor.line, 0), "\n");

        // The accumulator is the source of truth: every chunk rewrites the
        // whole region from it rather than appending.
        let mut response = String::new();
        model
            .generate_response(prompt, |chunk| {
                response.push_str(chunk);
                editor.write_region(origin, &response);
                editor.scroll_to(origin);
            })
            .await;

        // One final resynchronization, then park the cursor after the
        // response.
        editor.write_region(origin, &response);
        editor.scroll_to(origin);
        let newline_count = response.matches('\n').count();
        editor.set_cursor(Position::new(origin.line + 1 + newline_count, 0));
        editor.notify(DONE_NOTICE);

        self.finish();
        true
    }
}

impl Default for InlineProcessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
