//! In-memory capability bridge for tests and local wiring.

use super::InMemoryCaptureFeed;
use crate::session::{
    domain::AttachmentId,
    error::BridgeError,
    ports::{BridgeResult, CapabilityBridge, CaptureEvent, DispatchResponse, LayoutSize},
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tracing::debug;

/// A prompt received by [`InMemoryBridge::dispatch_prompt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDispatch {
    /// Prompt text as dispatched.
    pub text: String,
    /// Attachment identifiers as dispatched.
    pub attachment_ids: Vec<AttachmentId>,
}

/// Scriptable in-memory [`CapabilityBridge`].
///
/// Dispatch responses are served from a queue; with an empty queue the
/// bridge raises a fault. Captures are delivered through a connected
/// [`InMemoryCaptureFeed`], mimicking the host's asynchronous callback.
/// Every call is recorded for later inspection.
///
/// # Example
///
/// ```
/// use hoverchat::session::adapters::memory::InMemoryBridge;
/// use hoverchat::session::ports::DispatchResponse;
///
/// let bridge = InMemoryBridge::new();
/// bridge.push_response(DispatchResponse::success("hello"));
/// assert!(bridge.dispatches().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryBridge {
    state: Arc<Mutex<BridgeState>>,
}

#[derive(Debug, Default)]
struct BridgeState {
    responses: VecDeque<BridgeResult<DispatchResponse>>,
    dispatches: Vec<RecordedDispatch>,
    hold: Option<Arc<Notify>>,
    feed: Option<InMemoryCaptureFeed>,
    captures: VecDeque<CaptureEvent>,
    capture_triggers: usize,
    capture_fault: Option<String>,
    deleted: Vec<AttachmentId>,
    delete_fault: Option<String>,
    settings_opened: usize,
    layout_changes: Vec<LayoutSize>,
}

impl InMemoryBridge {
    /// Creates a bridge with no scripted behaviour.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the response for the next dispatch.
    pub fn push_response(&self, response: DispatchResponse) {
        self.lock().responses.push_back(Ok(response));
    }

    /// Queues a raised fault for the next dispatch.
    pub fn push_fault(&self, message: impl Into<String>) {
        self.lock()
            .responses
            .push_back(Err(BridgeError::fault(message)));
    }

    /// Makes every later dispatch wait until the returned handle is
    /// notified.
    ///
    /// Each `notify_one` on the handle lets one waiting dispatch through.
    #[must_use]
    pub fn hold_dispatches(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock().hold = Some(Arc::clone(&gate));
        gate
    }

    /// Connects the feed that receives capture events.
    pub fn connect_feed(&self, feed: InMemoryCaptureFeed) {
        self.lock().feed = Some(feed);
    }

    /// Queues the event emitted by the next capture trigger.
    pub fn queue_capture(&self, event: CaptureEvent) {
        self.lock().captures.push_back(event);
    }

    /// Makes capture triggers fail with `message`.
    pub fn fail_captures(&self, message: impl Into<String>) {
        self.lock().capture_fault = Some(message.into());
    }

    /// Makes deletions fail with `message`.
    pub fn fail_deletes(&self, message: impl Into<String>) {
        self.lock().delete_fault = Some(message.into());
    }

    /// Returns every dispatch received so far.
    #[must_use]
    pub fn dispatches(&self) -> Vec<RecordedDispatch> {
        self.lock().dispatches.clone()
    }

    /// Returns how many capture triggers succeeded.
    #[must_use]
    pub fn capture_triggers(&self) -> usize {
        self.lock().capture_triggers
    }

    /// Returns identifiers the host confirmed as deleted.
    #[must_use]
    pub fn deleted(&self) -> Vec<AttachmentId> {
        self.lock().deleted.clone()
    }

    /// Returns how often the settings surface was opened.
    #[must_use]
    pub fn settings_opened(&self) -> usize {
        self.lock().settings_opened
    }

    /// Returns the reported layout sizes in order.
    #[must_use]
    pub fn layout_changes(&self) -> Vec<LayoutSize> {
        self.lock().layout_changes.clone()
    }

    fn lock(&self) -> MutexGuard<'_, BridgeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CapabilityBridge for InMemoryBridge {
    async fn trigger_capture(&self) -> BridgeResult<()> {
        let (connected, event) = {
            let mut state = self.lock();
            if let Some(fault) = state.capture_fault.clone() {
                return Err(BridgeError::fault(fault));
            }
            state.capture_triggers += 1;
            let event = state.captures.pop_front();
            (state.feed.clone(), event)
        };

        if let (Some(feed), Some(captured)) = (connected, event) {
            let delivered = feed.emit(&captured);
            debug!(delivered, "scripted capture emitted");
        }
        Ok(())
    }

    async fn delete_attachment(&self, id: &AttachmentId) -> BridgeResult<()> {
        let mut state = self.lock();
        if let Some(fault) = state.delete_fault.clone() {
            return Err(BridgeError::fault(fault));
        }
        state.deleted.push(id.clone());
        Ok(())
    }

    async fn dispatch_prompt(
        &self,
        text: &str,
        attachment_ids: &[AttachmentId],
    ) -> BridgeResult<DispatchResponse> {
        let hold = {
            let mut state = self.lock();
            state.dispatches.push(RecordedDispatch {
                text: text.to_owned(),
                attachment_ids: attachment_ids.to_vec(),
            });
            state.hold.clone()
        };

        if let Some(gate) = hold {
            gate.notified().await;
        }

        self.lock()
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(BridgeError::fault("no response scripted")))
    }

    fn open_settings(&self) {
        self.lock().settings_opened += 1;
    }

    fn notify_layout_change(&self, size: LayoutSize) {
        self.lock().layout_changes.push(size);
    }
}
