//! Interactive translation chat.
//!
//! This binary reads lines from the terminal, sends each one with a fixed translation
//! instruction to the Hugging Face chat-completion endpoint, and streams the reply back.
//!
//! # Usage
//!
//! ```bash
//! export HF_API_KEY=hf_...
//! parley-chat
//!
//! # Start /template from a different phrase
//! parley-chat --template "Translate [text] to Spanish"
//!
//! # Disable colors (useful for piping output)
//! parley-chat --no-color
//! ```
//!
//! Logs go to stderr and are filtered with `RUST_LOG` (default `warn`).
//!
//! # Commands
//!
//! - `/template` - Fill the input with the template, cursor inside the brackets
//! - `/clear` - Clear the transcript
//! - `/stats` - Show session statistics
//! - `/help` - Show available commands
//! - `/quit` - Exit the application

use arrrg::CommandLine;
use rustyline::error::ReadlineError;
use rustyline::{Cmd, DefaultEditor, KeyCode, KeyEvent, Modifiers};
use tracing_subscriber::EnvFilter;

use parley::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, CursorHint, InputController, Key, KeyAction,
    KeyPress, PlainTextRenderer, Renderer, help_text, parse_command,
};
use parley::client::DEFAULT_TIMEOUT;
use parley::{HuggingFace, InferenceClient};

const PROMPT: &str = "You: ";

/// Main entry point for the parley-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("parley-chat [OPTIONS]");
    let config = ChatConfig::from_env(args);
    let use_color = config.use_color;

    let client = HuggingFace::with_options(config.base_url.clone(), config.timeout)?;
    let mut session = ChatSession::new(client, config);
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;
    bind_newline_keys(&mut rl);

    println!("Parley (model: {})", session.config().model);
    session.start(&mut renderer);

    loop {
        let readline = {
            let initial = session.input().split_at_cursor();
            rl.readline_with_initial(PROMPT, initial)
        };

        match readline {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }

                if let Some(cmd) = parse_command(&line) {
                    if let ChatCommand::Invalid(message) = &cmd {
                        renderer.print_error(message);
                        session.input_mut().set_draft(line, CursorHint::End);
                        continue;
                    }
                    session.input_mut().clear_draft();
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear();
                            renderer.print_info("Transcript cleared.");
                        }
                        ChatCommand::Template => {
                            session.use_template();
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                renderer.print_info(&format!("    {line}"));
                            }
                        }
                        ChatCommand::Stats => {
                            print_stats(&session, &mut renderer);
                        }
                        ChatCommand::Invalid(_) => {}
                    }
                    continue;
                }

                session.input_mut().set_draft(line, CursorHint::End);
                let outcome = session.submit(&mut renderer).await;
                tracing::debug!(?outcome, "submission finished");
            }
            Err(ReadlineError::Interrupted) => {
                session.input_mut().clear_draft();
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {err}"));
                break;
            }
        }
    }

    Ok(())
}

/// Binds every Enter chord that should break the line instead of submitting.
fn bind_newline_keys(rl: &mut DefaultEditor) {
    let chords = [
        (KeyPress::shifted(Key::Enter), Modifiers::SHIFT),
        (KeyPress::with_alt(Key::Enter), Modifiers::ALT),
    ];
    for (press, modifiers) in chords {
        if InputController::key_action(press) == KeyAction::InsertNewline {
            rl.bind_sequence(KeyEvent(KeyCode::Enter, modifiers), Cmd::Newline);
        }
    }
}

fn print_stats<C: InferenceClient>(session: &ChatSession<C>, renderer: &mut dyn Renderer) {
    let stats = session.stats();
    let config = session.config();
    renderer.print_info("    Session Statistics:");
    renderer.print_info(&format!("      Model: {}", stats.model));
    renderer.print_info(&format!(
        "      API key: {}",
        if stats.has_credential {
            "configured"
        } else {
            "missing"
        }
    ));
    renderer.print_info(&format!(
        "      Messages: {} ({} sent, {} replies, {} errors)",
        stats.message_count, stats.user_messages, stats.assistant_messages, stats.error_messages
    ));
    renderer.print_info(&format!(
        "      Requests: {} ({} replies, {} failures, {} rejected)",
        stats.submissions, stats.replies, stats.failures, stats.rejected
    ));
    renderer.print_info(&format!("      Max tokens: {}", config.max_tokens));
    renderer.print_info(&format!("      Temperature: {:.2}", config.temperature));
    let timeout = config.timeout.unwrap_or(DEFAULT_TIMEOUT).as_secs();
    renderer.print_info(&format!("      Timeout: {timeout}s"));
    renderer.print_info(&format!("      Template: {}", config.template));
}
