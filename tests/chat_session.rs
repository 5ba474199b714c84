use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::stream;

use parley::chat::{
    Admission, ChatConfig, ChatSession, CursorHint, Message, MessageRole, Renderer, SubmitOutcome,
};
use parley::chat::config::{DEFAULT_TEMPLATE, SYSTEM_PROMPT};
use parley::error::{INVALID_API_KEY_MESSAGE, MISSING_API_KEY_MESSAGE, MODEL_LOADING_MESSAGE};
use parley::{
    ApiKey, ChatCompletionRequest, ChatRole, Error, FailureKind, FragmentStream, InferenceClient,
    Result,
};

type Script = Result<Vec<Result<String>>>;

/// An inference client that replays canned replies and records what it was asked.
#[derive(Default)]
struct FakeClient {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<ChatCompletionRequest>>,
    calls: AtomicUsize,
}

impl FakeClient {
    fn with_replies(replies: &[&[&str]]) -> Self {
        let client = Self::default();
        for reply in replies {
            client.push(Ok(reply.iter().map(|f| Ok(f.to_string())).collect()));
        }
        client
    }

    fn failing(err: Error) -> Self {
        let client = Self::default();
        client.push(Err(err));
        client
    }

    fn push(&self, script: Script) {
        self.scripts.lock().unwrap().push_back(script);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl InferenceClient for FakeClient {
    async fn stream_completion(
        &self,
        _: &ApiKey,
        request: ChatCompletionRequest,
    ) -> Result<FragmentStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(vec![]));
        Ok(Box::pin(stream::iter(script?)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    ShowWelcome,
    RemoveWelcome,
    Message(MessageRole, String),
    Fragment(String),
    Busy(bool),
    Scroll,
}

#[derive(Default)]
struct RecordingRenderer {
    events: Vec<Event>,
}

impl RecordingRenderer {
    fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Renderer for RecordingRenderer {
    fn show_welcome(&mut self, _: &str) {
        self.events.push(Event::ShowWelcome);
    }

    fn remove_welcome(&mut self) {
        self.events.push(Event::RemoveWelcome);
    }

    fn render_message(&mut self, message: &Message) {
        self.events.push(Event::Message(message.role, message.text.clone()));
    }

    fn print_fragment(&mut self, text: &str) {
        self.events.push(Event::Fragment(text.to_string()));
    }

    fn set_busy(&mut self, busy: bool) {
        self.events.push(Event::Busy(busy));
    }

    fn scroll_to_latest(&mut self) {
        self.events.push(Event::Scroll);
    }

    fn print_info(&mut self, _: &str) {}

    fn print_error(&mut self, _: &str) {}
}

fn configured() -> ChatConfig {
    ChatConfig::new().with_api_key(ApiKey::new("hf_test"))
}

fn entries<C: InferenceClient>(session: &ChatSession<C>) -> Vec<(MessageRole, String)> {
    session
        .transcript()
        .messages()
        .iter()
        .map(|m| (m.role, m.text.clone()))
        .collect()
}

#[tokio::test]
async fn successful_translation() {
    let client = Arc::new(FakeClient::with_replies(&[&["Bonjour"]]));
    let mut session = ChatSession::new(client.clone(), configured());
    let mut renderer = RecordingRenderer::default();
    session.start(&mut renderer);

    session.input_mut().set_draft("hello", CursorHint::End);
    let outcome = session.submit(&mut renderer).await;

    assert_eq!(outcome, SubmitOutcome::Replied);
    assert_eq!(
        entries(&session),
        vec![
            (MessageRole::User, "hello".to_string()),
            (MessageRole::Assistant, "Bonjour".to_string()),
        ]
    );
    assert!(!session.is_busy());
    assert!(session.input().is_focused());
    assert_eq!(session.input().raw_draft(), "");

    let requests = client.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.model.to_string(), "Qwen/Qwen2.5-72B-Instruct");
    assert_eq!(request.max_tokens, 250);
    assert_eq!(request.temperature, Some(0.7));
    assert!(request.stream);
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, ChatRole::System);
    assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
    assert_eq!(request.messages[1].role, ChatRole::User);
    assert_eq!(request.messages[1].content, "hello");
}

#[tokio::test]
async fn model_loading_failure() {
    let client = FakeClient::failing(Error::from_service(
        None,
        None,
        "Model Qwen/Qwen2.5-72B-Instruct is currently loading".to_string(),
    ));
    let mut session = ChatSession::new(client, configured());
    let mut renderer = RecordingRenderer::default();

    session.input_mut().set_draft("hi", CursorHint::End);
    let outcome = session.submit(&mut renderer).await;

    assert_eq!(outcome, SubmitOutcome::Failed(FailureKind::ServiceUnavailable));
    assert_eq!(
        entries(&session),
        vec![
            (MessageRole::User, "hi".to_string()),
            (MessageRole::Error, MODEL_LOADING_MESSAGE.to_string()),
        ]
    );
    assert!(!session.is_busy());
    assert!(session.input().is_focused());
}

#[tokio::test]
async fn missing_credential() {
    let client = Arc::new(FakeClient::with_replies(&[&["unused"]]));
    let mut session = ChatSession::new(client.clone(), ChatConfig::new());
    let mut renderer = RecordingRenderer::default();

    session.input_mut().set_draft("hi", CursorHint::End);
    let outcome = session.submit(&mut renderer).await;

    assert_eq!(outcome, SubmitOutcome::Failed(FailureKind::Configuration));
    assert_eq!(
        entries(&session),
        vec![(MessageRole::Error, MISSING_API_KEY_MESSAGE.to_string())]
    );
    assert_eq!(client.calls(), 0);
    assert!(!session.is_busy());
    assert_eq!(renderer.count(|e| matches!(e, Event::Busy(_))), 0);
}

#[test]
fn template_places_cursor_in_placeholder() {
    let mut session = ChatSession::new(FakeClient::default(), configured());
    session.use_template();
    assert_eq!(session.input().raw_draft(), DEFAULT_TEMPLATE);
    assert_eq!(session.input().raw_draft(), "Translate [text] to French");
    assert_eq!(session.input().cursor(), 11);
    assert!(session.input().is_focused());
}

#[tokio::test]
async fn every_cycle_adds_two_entries() {
    let client = FakeClient::with_replies(&[&["un"], &["deux"]]);
    let mut session = ChatSession::new(client, configured());
    let mut renderer = RecordingRenderer::default();

    for (i, text) in ["one", "two"].into_iter().enumerate() {
        session.input_mut().set_draft(text, CursorHint::End);
        session.submit(&mut renderer).await;
        assert_eq!(session.transcript().len(), 2 * (i + 1));
    }
    session.input_mut().set_draft("three", CursorHint::End);
    assert_eq!(session.submit(&mut renderer).await, SubmitOutcome::Replied);
    assert_eq!(session.transcript().len(), 6);
    assert_eq!(
        session.transcript().last().map(|m| m.text.as_str()),
        Some("No response generated.")
    );

    let sequences: Vec<u64> = session
        .transcript()
        .messages()
        .iter()
        .map(|m| m.sequence)
        .collect();
    assert_eq!(sequences, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(renderer.count(|e| *e == Event::Scroll), 6);
}

#[tokio::test]
async fn whitespace_draft_is_ignored() {
    let client = Arc::new(FakeClient::with_replies(&[&["x"]]));
    let mut session = ChatSession::new(client.clone(), configured());
    let mut renderer = RecordingRenderer::default();

    for draft in ["", "   ", "\n\t "] {
        session.input_mut().set_draft(draft, CursorHint::End);
        assert_eq!(session.submit(&mut renderer).await, SubmitOutcome::Ignored);
    }
    assert!(session.transcript().is_empty());
    assert!(session.transcript().has_welcome());
    assert_eq!(client.calls(), 0);
    assert!(renderer.events.is_empty());
}

#[tokio::test]
async fn busy_session_rejects_submissions() {
    let client = Arc::new(FakeClient::with_replies(&[&["Hel", "lo"]]));
    let mut session = ChatSession::new(client.clone(), configured());
    let mut renderer = RecordingRenderer::default();

    session.input_mut().set_draft("hello", CursorHint::End);
    let turn = match session.begin(&mut renderer) {
        Admission::Accepted(turn) => turn,
        other => panic!("expected the draft to be accepted, got {other:?}"),
    };
    assert_eq!(turn.user_message, "hello");
    assert_eq!(turn.sequence, 1);
    assert!(session.is_busy());
    assert!(!session.input().is_enabled());

    session.input_mut().set_draft("again", CursorHint::End);
    let before = entries(&session);
    assert_eq!(session.begin(&mut renderer), Admission::Busy);
    assert_eq!(session.submit(&mut renderer).await, SubmitOutcome::Rejected);
    assert_eq!(entries(&session), before);
    assert_eq!(client.calls(), 0);

    let reply = session.stream_reply(&turn, &mut renderer).await;
    assert_eq!(reply.as_deref().ok(), Some("Hello"));
    let message = session.finish(reply, &mut renderer);
    assert_eq!(message.role, MessageRole::Assistant);
    assert_eq!(message.text, "Hello");
    assert!(!session.is_busy());
    assert_eq!(client.calls(), 1);
    assert_eq!(session.stats().rejected, 2);
    assert_eq!(session.input().raw_draft(), "again");
}

#[tokio::test]
async fn fragments_render_before_the_reply() {
    let client = FakeClient::with_replies(&[&["Hel", "lo"]]);
    let mut session = ChatSession::new(client, configured());
    let mut renderer = RecordingRenderer::default();

    session.input_mut().set_draft("hi", CursorHint::End);
    session.submit(&mut renderer).await;

    assert_eq!(
        renderer.events,
        vec![
            Event::RemoveWelcome,
            Event::Message(MessageRole::User, "hi".to_string()),
            Event::Scroll,
            Event::Busy(true),
            Event::Fragment("Hel".to_string()),
            Event::Fragment("lo".to_string()),
            Event::Busy(false),
            Event::Message(MessageRole::Assistant, "Hello".to_string()),
            Event::Scroll,
        ]
    );
}

#[tokio::test]
async fn stream_error_mid_reply_becomes_error_entry() {
    let client = FakeClient::default();
    client.push(Ok(vec![
        Ok("Bon".to_string()),
        Err(Error::streaming("connection reset", None)),
    ]));
    let mut session = ChatSession::new(client, configured());
    let mut renderer = RecordingRenderer::default();

    session.input_mut().set_draft("hello", CursorHint::End);
    let outcome = session.submit(&mut renderer).await;

    assert_eq!(outcome, SubmitOutcome::Failed(FailureKind::Transport));
    let last = session.transcript().last().unwrap();
    assert_eq!(last.role, MessageRole::Error);
    assert!(last.text.starts_with("Failed to get AI response: "));
    assert!(last.text.contains("connection reset"));
    assert_eq!(session.transcript().count(MessageRole::Assistant), 0);
}

#[tokio::test]
async fn rejected_credential_is_reported() {
    let client = FakeClient::failing(Error::from_service(
        Some(401),
        None,
        "Invalid credentials in Authorization header".to_string(),
    ));
    let mut session = ChatSession::new(client, configured());
    let mut renderer = RecordingRenderer::default();

    session.input_mut().set_draft("hi", CursorHint::End);
    session.submit(&mut renderer).await;
    assert_eq!(
        session.transcript().last().map(|m| m.text.as_str()),
        Some(INVALID_API_KEY_MESSAGE)
    );
}

#[tokio::test]
async fn welcome_is_removed_once() {
    let client = FakeClient::with_replies(&[&["a"], &["b"], &["c"]]);
    let mut session = ChatSession::new(client, configured());
    let mut renderer = RecordingRenderer::default();
    session.start(&mut renderer);
    assert_eq!(renderer.count(|e| *e == Event::ShowWelcome), 1);

    session.input_mut().set_draft("one", CursorHint::End);
    session.submit(&mut renderer).await;
    session.input_mut().set_draft("two", CursorHint::End);
    session.submit(&mut renderer).await;
    session.clear();
    assert!(session.transcript().is_empty());
    assert!(!session.transcript().has_welcome());

    session.start(&mut renderer);
    session.input_mut().set_draft("three", CursorHint::End);
    session.submit(&mut renderer).await;

    assert_eq!(renderer.count(|e| *e == Event::ShowWelcome), 1);
    assert_eq!(renderer.count(|e| *e == Event::RemoveWelcome), 1);
    assert_eq!(renderer.events[1], Event::RemoveWelcome);
    assert_eq!(session.transcript().messages()[0].sequence, 5);
}

#[tokio::test]
async fn error_without_reason_names_unknown_error() {
    let client = FakeClient::failing(Error::streaming("", None));
    let mut session = ChatSession::new(client, configured());
    let mut renderer = RecordingRenderer::default();

    session.input_mut().set_draft("hi", CursorHint::End);
    session.submit(&mut renderer).await;
    assert_eq!(
        session.transcript().last().map(|m| m.text.as_str()),
        Some("Failed to get AI response: unknown error")
    );
}
