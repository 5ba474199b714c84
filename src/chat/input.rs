//! The input field: draft text, cursor, busy state, and key handling.

/// Where to put the cursor after replacing the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    /// At the end of the text.
    End,
    /// Immediately after the first `[`, or at the end if there is none.
    AfterFirstBracket,
}

/// A key press as the line editor reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key.
    pub key: Key,
    /// Whether Shift was held.
    pub shift: bool,
    /// Whether Alt/Meta was held.
    pub alt: bool,
}

/// The keys the input field cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Enter/Return.
    Enter,
    /// Anything else.
    Other,
}

/// What a key press should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Submit the draft.
    Submit,
    /// Insert a line break into the draft.
    InsertNewline,
    /// Leave the key to the editor.
    Default,
}

impl KeyPress {
    /// An unmodified key press.
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            shift: false,
            alt: false,
        }
    }

    /// A key press with Shift held.
    pub fn shifted(key: Key) -> Self {
        Self {
            shift: true,
            ..Self::plain(key)
        }
    }

    /// A key press with Alt held.
    pub fn with_alt(key: Key) -> Self {
        Self {
            alt: true,
            ..Self::plain(key)
        }
    }
}

/// State of the input field.
///
/// The cursor is a byte offset into the draft and always sits on a char boundary.
#[derive(Debug)]
pub struct InputController {
    draft: String,
    cursor: usize,
    busy: bool,
    focused: bool,
}

impl InputController {
    /// Creates an empty, enabled, focused input field.
    pub fn new() -> Self {
        Self {
            draft: String::new(),
            cursor: 0,
            busy: false,
            focused: true,
        }
    }

    /// Returns the draft as it will be submitted: trimmed of surrounding whitespace.
    pub fn get_draft(&self) -> &str {
        self.draft.trim()
    }

    /// Returns the draft exactly as typed.
    pub fn raw_draft(&self) -> &str {
        &self.draft
    }

    /// Replaces the draft and positions the cursor.
    pub fn set_draft(&mut self, text: impl Into<String>, hint: CursorHint) {
        self.draft = text.into();
        self.cursor = match hint {
            CursorHint::End => self.draft.len(),
            CursorHint::AfterFirstBracket => self
                .draft
                .find('[')
                .map(|pos| pos + 1)
                .unwrap_or(self.draft.len()),
        };
    }

    /// Empties the draft.
    pub fn clear_draft(&mut self) {
        self.draft.clear();
        self.cursor = 0;
    }

    /// Fills the draft with a template so its bracketed placeholder can be typed over.
    pub fn apply_template(&mut self, template: &str) {
        self.set_draft(template, CursorHint::AfterFirstBracket);
        self.focused = true;
    }

    /// Returns the cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the draft split at the cursor.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.draft.split_at(self.cursor)
    }

    /// Enables or disables the field.  Re-enabling returns focus to it.
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
        self.focused = !busy;
    }

    /// Returns true while a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Returns true if the field accepts input and submission.
    pub fn is_enabled(&self) -> bool {
        !self.busy
    }

    /// Returns true if the field has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Decides what a key press does.
    ///
    /// Enter submits.  Shift+Enter inserts a line break instead; Alt+Enter does the same for
    /// terminals that cannot report Shift with Enter.
    pub fn key_action(press: KeyPress) -> KeyAction {
        match press.key {
            Key::Enter if press.shift || press.alt => KeyAction::InsertNewline,
            Key::Enter => KeyAction::Submit,
            Key::Other => KeyAction::Default,
        }
    }
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}
