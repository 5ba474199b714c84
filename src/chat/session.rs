//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the transcript and the input field
//! and drives one request at a time through an [`InferenceClient`].

use crate::accumulator::fold_fragments;
use crate::chat::config::ChatConfig;
use crate::chat::input::InputController;
use crate::chat::transcript::{Message, MessageRole, Transcript};
use crate::client::{ApiKey, InferenceClient};
use crate::error::{Error, FailureKind, Result};
use crate::observability::{
    SESSION_FAILURES, SESSION_REJECTED, SESSION_REPLIES, SESSION_SUBMISSIONS,
};
use crate::render::Renderer;
use crate::types::{ChatCompletionRequest, Model};

/// A submission that was admitted and is waiting for its reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    /// The trimmed text that was submitted.
    pub user_message: String,
    /// Sequence number of the user's transcript entry.
    pub sequence: u64,
}

/// The result of asking the session to accept the current draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The draft was recorded and a request may start.
    Accepted(PendingTurn),
    /// The draft was empty after trimming; nothing changed.
    Empty,
    /// A request is already in flight; nothing changed.
    Busy,
    /// No credential is configured; an error entry was appended.
    MissingCredential,
}

/// What a call to [`ChatSession::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The draft was empty.
    Ignored,
    /// A request was already in flight.
    Rejected,
    /// A reply was appended.
    Replied,
    /// An error entry was appended.
    Failed(FailureKind),
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The model used for the session.
    pub model: Model,
    /// Whether a credential is configured.
    pub has_credential: bool,
    /// The number of entries in the transcript.
    pub message_count: usize,
    /// Entries submitted by the user.
    pub user_messages: usize,
    /// Replies from the model.
    pub assistant_messages: usize,
    /// Errors reported to the user.
    pub error_messages: usize,
    /// Submissions that started a request.
    pub submissions: u64,
    /// Requests that ended with a reply.
    pub replies: u64,
    /// Submissions that ended with an error entry.
    pub failures: u64,
    /// Submissions turned away because a request was in flight.
    pub rejected: u64,
}

/// A chat session that manages the transcript, the input field, and API interactions.
///
/// The session is either idle or sending.  While sending, the input field is busy and further
/// submissions are turned away; the busy flag is the only admission control.
pub struct ChatSession<C: InferenceClient> {
    client: C,
    config: ChatConfig,
    credential: Result<ApiKey>,
    transcript: Transcript,
    input: InputController,
    submissions: u64,
    replies: u64,
    failures: u64,
    rejected: u64,
}

impl<C: InferenceClient> ChatSession<C> {
    /// Creates a new chat session.  The credential is validated here, once.
    pub fn new(client: C, config: ChatConfig) -> Self {
        let credential = config.api_key.clone().ok_or_else(Error::missing_api_key);
        if credential.is_err() {
            tracing::warn!("no API key configured; submissions will be refused");
        }
        Self {
            client,
            config,
            credential,
            transcript: Transcript::new(),
            input: InputController::new(),
            submissions: 0,
            replies: 0,
            failures: 0,
            rejected: 0,
        }
    }

    /// Shows the welcome entry if no message has been appended yet.
    pub fn start(&mut self, renderer: &mut dyn Renderer) {
        if self.transcript.has_welcome() {
            renderer.show_welcome(&self.config.welcome);
        }
    }

    /// Returns the transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the input field.
    pub fn input(&self) -> &InputController {
        &self.input
    }

    /// Returns the input field for editing.
    pub fn input_mut(&mut self) -> &mut InputController {
        &mut self.input
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Returns true if a credential is configured.
    pub fn has_credential(&self) -> bool {
        self.credential.is_ok()
    }

    /// Returns true while a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.input.is_busy()
    }

    /// Replaces the draft with the configured template, cursor inside its placeholder.
    pub fn use_template(&mut self) {
        let template = self.config.template.clone();
        self.input.apply_template(&template);
    }

    /// Clears the transcript.  The welcome entry does not come back.
    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    /// Submits the current draft and waits for the outcome.
    ///
    /// This runs [`begin`](Self::begin), [`stream_reply`](Self::stream_reply), and
    /// [`finish`](Self::finish) in order.  Whatever the reply does, `finish` runs and the input
    /// field is re-enabled.
    pub async fn submit(&mut self, renderer: &mut dyn Renderer) -> SubmitOutcome {
        let turn = match self.begin(renderer) {
            Admission::Accepted(turn) => turn,
            Admission::Empty => return SubmitOutcome::Ignored,
            Admission::Busy => return SubmitOutcome::Rejected,
            Admission::MissingCredential => {
                return SubmitOutcome::Failed(FailureKind::Configuration);
            }
        };
        let reply = self.stream_reply(&turn, renderer).await;
        let outcome = match &reply {
            Ok(_) => SubmitOutcome::Replied,
            Err(err) => SubmitOutcome::Failed(err.kind()),
        };
        self.finish(reply, renderer);
        outcome
    }

    /// Admits the current draft.
    ///
    /// On success the trimmed draft is appended as a user entry, the draft is cleared, and the
    /// session becomes busy.
    pub fn begin(&mut self, renderer: &mut dyn Renderer) -> Admission {
        if self.input.is_busy() {
            SESSION_REJECTED.click();
            self.rejected += 1;
            tracing::debug!("submission rejected: request in flight");
            return Admission::Busy;
        }
        let draft = self.input.get_draft().to_string();
        if draft.is_empty() {
            return Admission::Empty;
        }
        if let Err(err) = &self.credential {
            let text = err.user_message();
            self.failures += 1;
            SESSION_FAILURES.click();
            self.append(MessageRole::Error, text, renderer);
            return Admission::MissingCredential;
        }

        let sequence = self.append(MessageRole::User, draft.clone(), renderer).sequence;
        self.input.clear_draft();
        self.input.set_busy(true);
        renderer.set_busy(true);
        self.submissions += 1;
        SESSION_SUBMISSIONS.click();
        tracing::debug!(sequence, "submission accepted");
        Admission::Accepted(PendingTurn {
            user_message: draft,
            sequence,
        })
    }

    /// Sends the pending turn and folds the streamed reply, rendering fragments as they arrive.
    pub async fn stream_reply(
        &self,
        turn: &PendingTurn,
        renderer: &mut dyn Renderer,
    ) -> Result<String> {
        let api_key = self.credential.as_ref().map_err(Clone::clone)?;
        let request = ChatCompletionRequest::translation(
            self.config.model.clone(),
            &self.config.system_prompt,
            &turn.user_message,
            self.config.max_tokens,
            self.config.temperature,
        )
        .streaming();
        let fragments = self.client.stream_completion(api_key, request).await?;
        fold_fragments(fragments, |fragment| renderer.print_fragment(fragment)).await
    }

    /// Records the outcome of a turn and returns the session to idle.
    pub fn finish(&mut self, reply: Result<String>, renderer: &mut dyn Renderer) -> &Message {
        self.input.set_busy(false);
        renderer.set_busy(false);
        match reply {
            Ok(text) => {
                self.replies += 1;
                SESSION_REPLIES.click();
                self.append(MessageRole::Assistant, text, renderer)
            }
            Err(err) => {
                self.failures += 1;
                SESSION_FAILURES.click();
                tracing::error!(error = %err, kind = ?err.kind(), "failed to get a reply");
                self.append(MessageRole::Error, err.user_message(), renderer)
            }
        }
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            model: self.config.model.clone(),
            has_credential: self.has_credential(),
            message_count: self.transcript.len(),
            user_messages: self.transcript.count(MessageRole::User),
            assistant_messages: self.transcript.count(MessageRole::Assistant),
            error_messages: self.transcript.count(MessageRole::Error),
            submissions: self.submissions,
            replies: self.replies,
            failures: self.failures,
            rejected: self.rejected,
        }
    }

    fn append(
        &mut self,
        role: MessageRole,
        text: String,
        renderer: &mut dyn Renderer,
    ) -> &Message {
        let (message, effect) = self.transcript.append(role, text);
        if effect.removed_welcome {
            renderer.remove_welcome();
        }
        renderer.render_message(message);
        renderer.scroll_to_latest();
        message
    }
}
