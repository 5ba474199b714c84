//! Slash command parsing for the chat application.
//!
//! Lines that start with `/` control the session and are never sent to the service.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Clear the transcript.
    Clear,

    /// Fill the input with the configured template.
    Template,

    /// Display help information.
    Help,

    /// Display session statistics.
    Stats,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it should be treated as
/// text to translate.  Commands are single lines; multi-line input is always text.
///
/// # Examples
///
/// ```
/// # use parley::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
/// assert_eq!(parse_command("/template"), Some(ChatCommand::Template));
/// assert!(parse_command("Bonjour tout le monde").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();
    if input.contains('\n') {
        return None;
    }
    let rest = input.strip_prefix('/')?;

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(str::trim).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "clear" => no_argument(ChatCommand::Clear, "/clear", argument),
        "template" | "t" => no_argument(ChatCommand::Template, "/template", argument),
        "help" | "?" => ChatCommand::Help,
        "stats" | "status" => no_argument(ChatCommand::Stats, "/stats", argument),
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "" => ChatCommand::Invalid("empty command; try /help".to_string()),
        other => ChatCommand::Invalid(format!("unknown command /{other}; try /help")),
    };
    Some(result)
}

fn no_argument(command: ChatCommand, name: &str, argument: Option<&str>) -> ChatCommand {
    match argument {
        Some(_) => ChatCommand::Invalid(format!("{name} takes no argument")),
        None => command,
    }
}

/// Returns the help text for available commands.
pub fn help_text() -> &'static str {
    r#"Type text and press Enter to translate it.
Shift+Enter (or Alt+Enter) starts a new line.

Available commands:
  /template              Fill the input with the template
  /clear                 Clear the transcript
  /stats                 Show session statistics
  /help                  Show this help message
  /quit                  Exit the chat"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_clear() {
        assert_eq!(parse_command("/clear"), Some(ChatCommand::Clear));
        assert_eq!(parse_command("/CLEAR"), Some(ChatCommand::Clear));
        assert_eq!(
            parse_command("/clear all"),
            Some(ChatCommand::Invalid("/clear takes no argument".to_string()))
        );
    }

    #[test]
    fn parse_template() {
        assert_eq!(parse_command("/template"), Some(ChatCommand::Template));
        assert_eq!(parse_command("/t"), Some(ChatCommand::Template));
    }

    #[test]
    fn parse_help_and_stats() {
        assert_eq!(parse_command("/help"), Some(ChatCommand::Help));
        assert_eq!(parse_command("/?"), Some(ChatCommand::Help));
        assert_eq!(parse_command("/stats"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/status"), Some(ChatCommand::Stats));
    }

    #[test]
    fn unknown_commands_are_invalid() {
        assert!(matches!(
            parse_command("/model gpt"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("/model")
        ));
        assert!(matches!(parse_command("/"), Some(ChatCommand::Invalid(_))));
    }

    #[test]
    fn non_commands() {
        assert!(parse_command("hello").is_none());
        assert!(parse_command("Translate [text] to French").is_none());
        assert!(parse_command("").is_none());
    }

    #[test]
    fn multi_line_input_is_text() {
        assert!(parse_command("/clear\nmore text").is_none());
        assert!(parse_command("/template\r\nTranslate this").is_none());
        assert_eq!(parse_command("/clear\n"), Some(ChatCommand::Clear));
    }

    #[test]
    fn help_lists_every_command() {
        let help = help_text();
        for name in ["/template", "/clear", "/stats", "/help", "/quit"] {
            assert!(help.contains(name), "missing {name}");
        }
    }
}
