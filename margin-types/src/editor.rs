//! The host-editor capability seam.
//!
//! The host adapts its own editor behind [`NoteEditor`]; widgets, settings
//! persistence, and plugin lifecycle stay on the host side. Methods take
//! `&self`: an implementation is a handle onto the host's editor, and all
//! calls happen on the host's single UI thread.

/// A cursor position: zero-based line index and character column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Zero-based line index.
    pub line: usize,
    /// Character column within the line (not a byte offset).
    pub ch: usize,
}

impl Position {
    /// Build a position.
    #[must_use]
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// The narrow surface the inline processor needs from the host's editor.
pub trait NoteEditor {
    /// Current cursor position.
    fn cursor(&self) -> Position;

    /// Move the cursor.
    fn set_cursor(&self, pos: Position);

    /// Text of the given line, if it exists.
    fn line_text(&self, line: usize) -> Option<String>;

    /// Replace the full text of a line.
    fn set_line(&self, line: usize, text: &str);

    /// Insert text at a position without replacing anything.
    fn insert_at(&self, pos: Position, text: &str);

    /// Currently selected text, if any.
    fn selected_text(&self) -> Option<String>;

    /// Replace the current selection with `text`.
    ///
    /// Once the selection has collapsed, further calls insert at the
    /// cursor, so repeated calls append.
    fn replace_selection(&self, text: &str);

    /// Overwrite the response region with `text`.
    ///
    /// The region begins at the line after `origin` and extends over
    /// whatever the previous call wrote. Each call resynchronizes the whole
    /// region to `text`; it is a full rewrite, not an append.
    fn write_region(&self, origin: Position, text: &str);

    /// Keep `pos` visible.
    fn scroll_to(&self, pos: Position);

    /// Show a transient notification to the user.
    fn notify(&self, message: &str);
}
