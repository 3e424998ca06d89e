//! Behavioural tests for the chat session controller.

use std::sync::Arc;

use eyre::{Result, WrapErr, eyre};
use hoverchat::session::{
    adapters::memory::{InMemoryBridge, InMemoryCaptureFeed, RecordingNotifier},
    domain::{AttachmentId, MAX_ATTACHMENTS, Sender, SessionState, segment},
    error::{AttachmentError, SendError},
    ports::{CaptureEvent, DispatchResponse, Severity, Subscription},
    services::SessionController,
};
use mockable::DefaultClock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

type TestController = SessionController<InMemoryBridge, RecordingNotifier, DefaultClock>;

const SCREENSHOT: &str = "/tmp/screenshot-1.png";
const CODE_REPLY: &str = "Here you go:\n```text\n =^.^=\n```\n";

/// World state for chat session scenarios.
struct ChatWorld {
    bridge: Arc<InMemoryBridge>,
    notifier: Arc<RecordingNotifier>,
    controller: Arc<TestController>,
    _subscription: Subscription,
    send_result: Option<Result<String, SendError>>,
    attachment_result: Option<Result<(), AttachmentError>>,
}

impl Default for ChatWorld {
    fn default() -> Self {
        let bridge = Arc::new(InMemoryBridge::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let feed = InMemoryCaptureFeed::new();
        bridge.connect_feed(feed.clone());
        let controller = Arc::new(SessionController::new(
            Arc::clone(&bridge),
            Arc::clone(&notifier),
            Arc::new(DefaultClock),
        ));
        let subscription = controller.subscribe_captures(&feed);

        Self {
            bridge,
            notifier,
            controller,
            _subscription: subscription,
            send_result: None,
            attachment_result: None,
        }
    }
}

impl ChatWorld {
    fn capture(&self, id: &str) -> Result<()> {
        self.bridge
            .queue_capture(CaptureEvent::captured(id, format!("data:{id}")));
        run_async(self.controller.trigger_capture()).wrap_err("trigger capture")
    }
}

#[fixture]
fn world() -> ChatWorld {
    ChatWorld::default()
}

fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

// ============================================================================
// Given Steps
// ============================================================================

#[given("an idle chat session")]
fn idle_session(world: &mut ChatWorld) -> Result<()> {
    if world.controller.state() != SessionState::Idle {
        return Err(eyre!("new session is not idle"));
    }
    Ok(())
}

#[given("a screenshot has been captured")]
fn screenshot_captured(world: &mut ChatWorld) -> Result<()> {
    world.capture(SCREENSHOT)
}

#[given("five screenshots have been captured")]
fn five_screenshots_captured(world: &mut ChatWorld) -> Result<()> {
    for index in 0..MAX_ATTACHMENTS {
        world.capture(&format!("/tmp/screenshot-{index}.png"))?;
    }
    Ok(())
}

#[given("the backend will reply with a code sample")]
fn backend_replies_with_code(world: &mut ChatWorld) {
    world
        .bridge
        .push_response(DispatchResponse::success(CODE_REPLY));
}

#[given("the backend will refuse with \"quota exceeded\"")]
fn backend_refuses(world: &mut ChatWorld) {
    world
        .bridge
        .push_response(DispatchResponse::failure("quota exceeded"));
}

#[given("the host refuses deletions")]
fn host_refuses_deletions(world: &mut ChatWorld) {
    world.bridge.fail_deletes("file is locked");
}

// ============================================================================
// When Steps
// ============================================================================

#[when("the user sends \"draw a cat\"")]
fn user_sends_prompt(world: &mut ChatWorld) {
    world.send_result = Some(run_async(world.controller.submit("draw a cat")));
}

#[when("the user sends an empty prompt")]
fn user_sends_empty_prompt(world: &mut ChatWorld) {
    world.send_result = Some(run_async(world.controller.submit("   ")));
}

#[when("the user takes another screenshot")]
fn user_takes_screenshot(world: &mut ChatWorld) {
    world
        .bridge
        .queue_capture(CaptureEvent::captured("/tmp/extra.png", "data:extra"));
    world.attachment_result = Some(run_async(world.controller.trigger_capture()));
}

#[when("the user deletes the screenshot")]
fn user_deletes_screenshot(world: &mut ChatWorld) {
    let id = AttachmentId::new(SCREENSHOT);
    world.attachment_result = Some(run_async(world.controller.delete_attachment(&id)));
}

// ============================================================================
// Then Steps
// ============================================================================

#[then("the conversation holds the prompt and the reply")]
fn conversation_holds_both_turns(world: &ChatWorld) -> Result<()> {
    let history = world.controller.history();
    let turns: Vec<(Sender, &str)> = history
        .iter()
        .map(|message| (message.sender(), message.text()))
        .collect();
    if turns != [(Sender::User, "draw a cat"), (Sender::Assistant, CODE_REPLY)] {
        return Err(eyre!("unexpected conversation: {turns:?}"));
    }

    let user = history.first().ok_or_else(|| eyre!("no user message"))?;
    if user.attachments().len() != 1 {
        return Err(eyre!(
            "expected one attachment on the prompt, got {}",
            user.attachments().len()
        ));
    }
    Ok(())
}

#[then("the reply renders as prose and code")]
fn reply_renders_segments(world: &ChatWorld) -> Result<()> {
    let history = world.controller.history();
    let reply = history.last().ok_or_else(|| eyre!("no reply"))?;
    let kinds: Vec<bool> = segment(reply.text())
        .iter()
        .map(hoverchat::session::domain::Segment::is_code)
        .collect();
    if kinds != [false, true, false] {
        return Err(eyre!("unexpected segment layout: {kinds:?}"));
    }
    Ok(())
}

#[then("the attachment strip is empty")]
fn attachment_strip_empty(world: &ChatWorld) -> Result<()> {
    let pending = world.controller.attachments().len();
    if pending != 0 {
        return Err(eyre!("expected no pending attachments, got {pending}"));
    }
    Ok(())
}

#[then("the session is idle")]
fn session_is_idle(world: &ChatWorld) -> Result<()> {
    let state = world.controller.state();
    if state != SessionState::Idle {
        return Err(eyre!("expected Idle, got {state:?}"));
    }
    Ok(())
}

#[then("the last message reads \"Error: quota exceeded\"")]
fn last_message_is_error(world: &ChatWorld) -> Result<()> {
    let history = world.controller.history();
    let last = history.last().ok_or_else(|| eyre!("conversation is empty"))?;
    if last.sender() != Sender::Assistant || last.text() != "Error: quota exceeded" {
        return Err(eyre!("unexpected last message: {last:?}"));
    }
    Ok(())
}

#[then("an error notification was shown")]
fn error_notification_shown(world: &ChatWorld) -> Result<()> {
    let shown = world
        .notifier
        .last()
        .ok_or_else(|| eyre!("no notification shown"))?;
    if shown.severity != Severity::Error {
        return Err(eyre!("expected an error notification, got {shown:?}"));
    }
    Ok(())
}

#[then("the send is rejected as empty")]
fn send_rejected_as_empty(world: &ChatWorld) -> Result<()> {
    match &world.send_result {
        Some(Err(SendError::EmptyRequest)) => Ok(()),
        other => Err(eyre!("expected EmptyRequest, got {other:?}")),
    }
}

#[then("the conversation is empty")]
fn conversation_is_empty(world: &ChatWorld) -> Result<()> {
    if world.controller.history_len() != 0 || !world.bridge.dispatches().is_empty() {
        return Err(eyre!("empty send left a trace"));
    }
    Ok(())
}

#[then("the capture is refused for capacity")]
fn capture_refused(world: &ChatWorld) -> Result<()> {
    match &world.attachment_result {
        Some(Err(AttachmentError::CapacityExceeded { capacity })) if *capacity == MAX_ATTACHMENTS => {
            Ok(())
        }
        other => Err(eyre!("expected CapacityExceeded, got {other:?}")),
    }
}

#[then("a limit notification was shown")]
fn limit_notification_shown(world: &ChatWorld) -> Result<()> {
    let shown = world
        .notifier
        .last()
        .ok_or_else(|| eyre!("no notification shown"))?;
    if shown.title != "Limit Reached" || shown.severity != Severity::Neutral {
        return Err(eyre!("unexpected notification: {shown:?}"));
    }
    Ok(())
}

#[then("the screenshot is still attached")]
fn screenshot_still_attached(world: &ChatWorld) -> Result<()> {
    if !matches!(world.attachment_result, Some(Err(AttachmentError::DeleteFailed { .. }))) {
        return Err(eyre!(
            "expected DeleteFailed, got {:?}",
            world.attachment_result
        ));
    }
    let ids: Vec<String> = world
        .controller
        .attachments()
        .iter()
        .map(|attachment| attachment.id().to_string())
        .collect();
    if ids != [SCREENSHOT] {
        return Err(eyre!("unexpected attachments: {ids:?}"));
    }
    Ok(())
}

// ============================================================================
// Scenario Definitions
// ============================================================================

#[scenario(
    path = "tests/features/chat_session.feature",
    name = "Sending a prompt with a screenshot records both turns"
)]
#[tokio::test(flavor = "multi_thread")]
async fn send_with_screenshot(world: ChatWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/chat_session.feature",
    name = "A backend failure is shown in the conversation"
)]
#[tokio::test(flavor = "multi_thread")]
async fn backend_failure(world: ChatWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/chat_session.feature",
    name = "An empty prompt without attachments is ignored"
)]
#[tokio::test(flavor = "multi_thread")]
async fn empty_prompt(world: ChatWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/chat_session.feature",
    name = "A sixth screenshot is refused"
)]
#[tokio::test(flavor = "multi_thread")]
async fn sixth_screenshot(world: ChatWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/chat_session.feature",
    name = "Deleting a screenshot the host cannot remove keeps it"
)]
#[tokio::test(flavor = "multi_thread")]
async fn delete_refused(world: ChatWorld) {
    let _ = world;
}
