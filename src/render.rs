//! Output rendering for the chat session.
//!
//! The session never writes to the terminal itself.  It reports what happened to a
//! [`Renderer`]: messages appended to the transcript, fragments of the reply in flight, the busy
//! indicator, and the one-time removal of the welcome entry.  [`PlainTextRenderer`] draws all of
//! this on stdout, with optional ANSI styling.

use std::io::{self, Stdout, Write};

use crate::chat::{Message, MessageRole};

/// ANSI escape code for dim text (used for the welcome banner and busy indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the reply label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Returns the cursor to column zero and erases the line.
const ANSI_CLEAR_LINE: &str = "\r\x1b[2K";

/// Label printed ahead of each reply.
const REPLY_LABEL: &str = "Translator:";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Recording renderers in tests
pub trait Renderer: Send {
    /// Shows the welcome entry displayed before the first message.
    fn show_welcome(&mut self, text: &str) {
        _ = text;
    }

    /// Removes the welcome entry.  Called at most once per session.
    fn remove_welcome(&mut self) {}

    /// Renders a message that was just appended to the transcript.
    fn render_message(&mut self, message: &Message);

    /// Prints a fragment of the reply currently being streamed.
    ///
    /// This is called incrementally as fragments arrive, before the complete reply is appended
    /// to the transcript with [`Renderer::render_message`].
    fn print_fragment(&mut self, text: &str);

    /// Shows or hides the busy indicator.
    fn set_busy(&mut self, busy: bool) {
        _ = busy;
    }

    /// Moves the view to the newest transcript entry.
    fn scroll_to_latest(&mut self) {}

    /// Print an informational message that is not part of the transcript.
    fn print_info(&mut self, info: &str);

    /// Print an error that is not part of the transcript, such as a bad command.
    fn print_error(&mut self, error: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    indicator_visible: bool,
    streaming: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            indicator_visible: false,
            streaming: false,
        }
    }

    /// Flushes stdout to ensure immediate display of streamed content.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn clear_indicator(&mut self) {
        if self.indicator_visible {
            print!("{ANSI_CLEAR_LINE}");
            self.indicator_visible = false;
        }
    }

    fn print_label(&mut self) {
        if self.use_color {
            print!("{ANSI_CYAN}{REPLY_LABEL}{ANSI_RESET} ");
        } else {
            print!("{REPLY_LABEL} ");
        }
    }

    fn print_transcript_error(&mut self, text: &str) {
        if self.use_color {
            println!("{ANSI_RED}\u{26a0}\u{fe0f} Error: {text}{ANSI_RESET}");
        } else {
            println!("\u{26a0}\u{fe0f} Error: {text}");
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn show_welcome(&mut self, text: &str) {
        if self.use_color {
            println!("{ANSI_DIM}{text}{ANSI_RESET}\n");
        } else {
            println!("{text}\n");
        }
        self.flush();
    }

    // Scrollback cannot be edited; the banner simply scrolls away.
    fn remove_welcome(&mut self) {}

    fn render_message(&mut self, message: &Message) {
        self.clear_indicator();
        match message.role {
            // The line editor already echoed what the user typed.
            MessageRole::User => {}
            MessageRole::Assistant => {
                if !self.streaming {
                    self.print_label();
                    print!("{}", message.text);
                }
                println!();
            }
            MessageRole::Error => {
                if self.streaming {
                    println!();
                }
                self.print_transcript_error(&message.text);
            }
        }
        self.streaming = false;
        self.flush();
    }

    fn print_fragment(&mut self, text: &str) {
        self.clear_indicator();
        if !self.streaming {
            self.print_label();
            self.streaming = true;
        }
        print!("{text}");
        self.flush();
    }

    fn set_busy(&mut self, busy: bool) {
        if busy {
            // Without escape codes the indicator could not be erased again.
            if self.use_color && !self.indicator_visible {
                print!("{ANSI_DIM}translating...{ANSI_RESET}");
                self.indicator_visible = true;
            }
        } else {
            self.clear_indicator();
        }
        self.flush();
    }

    fn scroll_to_latest(&mut self) {
        self.flush();
    }

    fn print_info(&mut self, info: &str) {
        self.clear_indicator();
        println!("{info}");
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.clear_indicator();
        eprintln!("Error: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
    }

    #[test]
    fn streamed_reply_is_not_reprinted() {
        let mut renderer = PlainTextRenderer::with_color(false);
        renderer.print_fragment("Bon");
        assert!(renderer.streaming);
        renderer.render_message(&Message {
            role: MessageRole::Assistant,
            text: "Bon".to_string(),
            sequence: 2,
        });
        assert!(!renderer.streaming);
    }

    #[test]
    fn indicator_needs_color() {
        let mut renderer = PlainTextRenderer::with_color(false);
        renderer.set_busy(true);
        assert!(!renderer.indicator_visible);

        let mut renderer = PlainTextRenderer::with_color(true);
        renderer.set_busy(true);
        assert!(renderer.indicator_visible);
        renderer.set_busy(false);
        assert!(!renderer.indicator_visible);
    }
}
