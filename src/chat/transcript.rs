//! The transcript: everything the session has shown, in order.

use std::fmt;

/// Who a transcript entry came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MessageRole {
    /// Text the user submitted.
    User,
    /// A reply from the model.
    Assistant,
    /// A failure reported to the user.
    Error,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => f.write_str("user"),
            MessageRole::Assistant => f.write_str("assistant"),
            MessageRole::Error => f.write_str("error"),
        }
    }
}

/// A rendered transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Who the entry came from.
    pub role: MessageRole,
    /// The text shown.
    pub text: String,
    /// Position in the session, assigned on append.  Starts at 1.
    pub sequence: u64,
}

/// What a [`Transcript::append`] changed beyond adding the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendEffect {
    /// True if this append removed the welcome entry.
    pub removed_welcome: bool,
}

/// Append-only list of transcript entries.
///
/// The welcome entry is not a message.  It exists until the first append and is never restored.
#[derive(Debug)]
pub struct Transcript {
    messages: Vec<Message>,
    next_sequence: u64,
    has_welcome: bool,
}

impl Transcript {
    /// Creates an empty transcript showing the welcome entry.
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_sequence: 1,
            has_welcome: true,
        }
    }

    /// Appends an entry and assigns its sequence number.
    pub fn append(
        &mut self,
        role: MessageRole,
        text: impl Into<String>,
    ) -> (&Message, AppendEffect) {
        let removed_welcome = std::mem::replace(&mut self.has_welcome, false);
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.messages.push(Message {
            role,
            text: text.into(),
            sequence,
        });
        let message = &self.messages[self.messages.len() - 1];
        (message, AppendEffect { removed_welcome })
    }

    /// Removes every entry.  Sequence numbers keep increasing and the welcome entry stays gone.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Returns the entries in append order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the newest entry.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns true while the welcome entry is still shown.
    pub fn has_welcome(&self) -> bool {
        self.has_welcome
    }

    /// Counts the entries with the given role.
    pub fn count(&self, role: MessageRole) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
