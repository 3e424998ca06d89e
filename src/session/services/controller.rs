//! Session controller: runs the state machine and owns session state.
//!
//! The controller validates and dispatches sends, records both turns in the
//! conversation log, and manages the pending attachment store on behalf of
//! the capture, delete, and clear handlers.

use super::transition::{DispatchRequest, Effect, SessionEvent, transition};
use crate::session::{
    config::{AttachmentClearPolicy, SessionConfig},
    domain::{
        Attachment, AttachmentId, AttachmentStore, ConversationLog, Message, SessionId,
        SessionState,
    },
    error::{AttachmentError, SendError},
    ports::{CapabilityBridge, CaptureEvent, CaptureFeed, Notification, Notifier, Severity, Subscription},
};
use mockable::Clock;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Orchestrates a single chat session.
///
/// # Concurrency
///
/// At most one send is in flight: the state check and the switch to
/// [`SessionState::Sending`] happen under one lock, and a send issued while
/// another is pending fails with [`SendError::AlreadyInFlight`] without
/// touching the log. The user message is appended before the dispatch is
/// awaited and the reply only after it settles, so the log stays in
/// chronological order.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use hoverchat::session::adapters::memory::{InMemoryBridge, RecordingNotifier};
/// use hoverchat::session::ports::DispatchResponse;
/// use hoverchat::session::services::SessionController;
/// use mockable::DefaultClock;
///
/// # tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(async {
/// let bridge = Arc::new(InMemoryBridge::new());
/// bridge.push_response(DispatchResponse::success("a cat: :3"));
/// let controller = SessionController::new(
///     bridge,
///     Arc::new(RecordingNotifier::new()),
///     Arc::new(DefaultClock),
/// );
///
/// let reply = controller.submit("draw a cat").await.expect("send succeeds");
/// assert_eq!(reply, "a cat: :3");
/// assert_eq!(controller.history_len(), 2);
/// # });
/// ```
pub struct SessionController<B, N, C>
where
    B: CapabilityBridge,
    N: Notifier,
    C: Clock + Send + Sync,
{
    id: SessionId,
    bridge: Arc<B>,
    notifier: Arc<N>,
    clock: Arc<C>,
    config: SessionConfig,
    state: Mutex<SessionState>,
    log: RwLock<ConversationLog>,
    attachments: Mutex<AttachmentStore>,
}

impl<B, N, C> SessionController<B, N, C>
where
    B: CapabilityBridge,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates an idle session with the default configuration.
    #[must_use]
    pub fn new(bridge: Arc<B>, notifier: Arc<N>, clock: Arc<C>) -> Self {
        Self::with_config(bridge, notifier, clock, SessionConfig::default())
    }

    /// Creates an idle session with an explicit configuration.
    #[must_use]
    pub fn with_config(
        bridge: Arc<B>,
        notifier: Arc<N>,
        clock: Arc<C>,
        config: SessionConfig,
    ) -> Self {
        let store = AttachmentStore::with_capacity(config.attachment_capacity);
        Self {
            id: SessionId::new(),
            bridge,
            notifier,
            clock,
            config,
            state: Mutex::new(SessionState::Idle),
            log: RwLock::new(ConversationLog::new()),
            attachments: Mutex::new(store),
        }
    }

    /// Returns the session identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *lock(&self.state)
    }

    /// Returns a copy of the conversation history in chronological order.
    #[must_use]
    pub fn history(&self) -> Vec<Message> {
        self.read_log().all().cloned().collect()
    }

    /// Returns the number of recorded messages.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.read_log().len()
    }

    /// Returns the pending attachments in insertion order.
    #[must_use]
    pub fn attachments(&self) -> Vec<Attachment> {
        lock(&self.attachments).snapshot()
    }

    /// Sends `prompt` with an explicit attachment snapshot.
    ///
    /// The user message is recorded before the backend is contacted. On
    /// settlement an assistant message is recorded: the reply on success,
    /// or the configured error prefix plus the reason on failure, in which
    /// case the reason is also surfaced through the notifier. The session
    /// always returns to [`SessionState::Idle`].
    ///
    /// The pending attachment store is not touched; see [`Self::submit`].
    ///
    /// Dropping the returned future before it settles returns the session to
    /// idle but leaves the user message without a recorded reply.
    ///
    /// # Errors
    ///
    /// - [`SendError::EmptyRequest`] when the prompt is blank and the
    ///   snapshot is empty; nothing is recorded and the bridge is not called.
    /// - [`SendError::AlreadyInFlight`] when another send has not settled;
    ///   nothing is recorded.
    /// - [`SendError::DispatchFailure`] when the backend fails or the bridge
    ///   raises a fault.
    pub async fn send(&self, prompt: &str, snapshot: Vec<Attachment>) -> Result<String, SendError> {
        let (in_flight, request) = self.begin(prompt, snapshot)?;
        let outcome = self.dispatch(&request).await;
        self.settle(in_flight, outcome)
    }

    /// Sends `prompt` with the pending attachments.
    ///
    /// Snapshots the store, sends, and releases the attachments according
    /// to [`SessionConfig::clear_policy`]. Only the attachments that were
    /// sent are released, so captures arriving mid-send stay pending. A
    /// rejected send leaves the store untouched. Dropping the future early
    /// behaves as for [`Self::send`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::send`].
    pub async fn submit(&self, prompt: &str) -> Result<String, SendError> {
        let snapshot = lock(&self.attachments).snapshot();
        let (in_flight, request) = self.begin(prompt, snapshot)?;

        if self.config.clear_policy == AttachmentClearPolicy::OnDispatch {
            let released = lock(&self.attachments).release(&request.attachment_ids);
            debug!(session_id = %self.id, released, "released dispatched attachments");
        }

        let outcome = self.dispatch(&request).await;
        let result = self.settle(in_flight, outcome);

        if result.is_ok() && self.config.clear_policy == AttachmentClearPolicy::OnSuccess {
            let released = lock(&self.attachments).release(&request.attachment_ids);
            debug!(session_id = %self.id, released, "released sent attachments");
        }
        result
    }

    /// Asks the host for a screenshot if the store has room.
    ///
    /// The captured image arrives later through [`Self::handle_capture`].
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::CapacityExceeded`] without contacting the
    /// host when the store is full, or [`AttachmentError::TriggerFailed`]
    /// when the host raises a fault. Both are also notified.
    pub async fn trigger_capture(&self) -> Result<(), AttachmentError> {
        let (full, capacity) = {
            let store = lock(&self.attachments);
            (store.is_full(), store.capacity())
        };
        if full {
            self.notify_limit(capacity);
            return Err(AttachmentError::CapacityExceeded { capacity });
        }

        self.bridge.trigger_capture().await.map_err(|err| {
            let reason = err.to_string();
            warn!(session_id = %self.id, error = %reason, "screenshot trigger failed");
            self.notifier.notify(Notification::error(format!(
                "Failed to take screenshot: {reason}"
            )));
            AttachmentError::TriggerFailed(reason)
        })
    }

    /// Handles a capture-completion event from the host.
    ///
    /// The store's own capacity check is authoritative, so completions that
    /// race past the trigger-time check are still rejected.
    ///
    /// # Errors
    ///
    /// - [`AttachmentError::CaptureFailed`] when the event lacks an id or
    ///   preview; the user is notified.
    /// - [`AttachmentError::CapacityExceeded`] when the store is full; the
    ///   user is notified.
    /// - [`AttachmentError::DuplicateAttachment`] when the id is pending.
    pub fn handle_capture(&self, event: CaptureEvent) -> Result<usize, AttachmentError> {
        let attachment = event.into_attachment().inspect_err(|_| {
            warn!(session_id = %self.id, "capture event without id or preview");
            self.notifier
                .notify(Notification::error("Screenshot capture failed."));
        })?;
        let id = attachment.id().clone();

        let added = lock(&self.attachments).add(attachment);
        match &added {
            Ok(size) => debug!(session_id = %self.id, attachment_id = %id, size, "attachment added"),
            Err(AttachmentError::CapacityExceeded { capacity }) => self.notify_limit(*capacity),
            Err(err) => warn!(session_id = %self.id, attachment_id = %id, error = %err, "attachment rejected"),
        }
        added
    }

    /// Routes capture events from `feed` into [`Self::handle_capture`].
    ///
    /// The handler holds a weak reference, so the subscription never keeps
    /// the controller alive. Cancel the returned subscription on teardown.
    pub fn subscribe_captures<F>(self: &Arc<Self>, feed: &F) -> Subscription
    where
        F: CaptureFeed + ?Sized,
        B: 'static,
        N: 'static,
        C: 'static,
    {
        let weak = Arc::downgrade(self);
        feed.subscribe(Arc::new(move |event| {
            let Some(controller) = weak.upgrade() else {
                return;
            };
            if let Err(err) = controller.handle_capture(event) {
                debug!(session_id = %controller.id, error = %err, "capture event discarded");
            }
        }))
    }

    /// Deletes a pending attachment through the host, then drops it locally.
    ///
    /// # Errors
    ///
    /// - [`AttachmentError::NotFound`] when `id` is not pending; the host is
    ///   not contacted.
    /// - [`AttachmentError::DeleteFailed`] when the host refuses; the entry
    ///   stays pending and the user is notified.
    pub async fn delete_attachment(&self, id: &AttachmentId) -> Result<(), AttachmentError> {
        if !lock(&self.attachments).contains(id) {
            return Err(AttachmentError::NotFound(id.clone()));
        }

        if let Err(err) = self.bridge.delete_attachment(id).await {
            let reason = err.to_string();
            warn!(session_id = %self.id, attachment_id = %id, error = %reason, "attachment delete failed");
            self.notifier.notify(Notification::error(format!(
                "Failed to delete image: {reason}"
            )));
            return Err(AttachmentError::DeleteFailed {
                id: id.clone(),
                reason,
            });
        }

        lock(&self.attachments).remove(id)?;
        debug!(session_id = %self.id, attachment_id = %id, "attachment removed");
        Ok(())
    }

    /// Drops every pending attachment without contacting the host.
    pub fn clear_attachments(&self) {
        let mut store = lock(&self.attachments);
        let cleared = store.len();
        store.clear();
        debug!(session_id = %self.id, cleared, "attachments cleared");
    }

    /// Opens the host settings surface.
    pub fn open_settings(&self) {
        self.bridge.open_settings();
    }

    fn begin(
        &self,
        prompt: &str,
        snapshot: Vec<Attachment>,
    ) -> Result<(InFlight<'_>, DispatchRequest), SendError> {
        let event = SessionEvent::SendRequested {
            prompt: prompt.to_owned(),
            attachments: snapshot,
            at: self.clock.utc(),
        };

        let mut state = lock(&self.state);
        let result = transition(*state, event, &self.config).map_err(|err| {
            warn!(session_id = %self.id, error = %err, "send rejected");
            SendError::from(err)
        })?;
        *state = result.new_state;
        drop(state);
        let in_flight = InFlight { state: &self.state };

        let applied = self.apply(result.effects);
        let request = applied
            .dispatch
            .ok_or_else(|| SendError::DispatchFailure("no dispatch requested".to_owned()))?;
        info!(
            session_id = %self.id,
            attachments = request.attachment_ids.len(),
            "send accepted"
        );
        Ok((in_flight, request))
    }

    async fn dispatch(&self, request: &DispatchRequest) -> Result<String, String> {
        match self
            .bridge
            .dispatch_prompt(&request.prompt, &request.attachment_ids)
            .await
        {
            Ok(response) => response.into_outcome(),
            Err(err) => Err(err.to_string()),
        }
    }

    fn settle(
        &self,
        in_flight: InFlight<'_>,
        outcome: Result<String, String>,
    ) -> Result<String, SendError> {
        let event = SessionEvent::DispatchSettled {
            outcome: outcome.clone(),
            at: self.clock.utc(),
        };
        let result = transition(self.state(), event, &self.config)?;

        // The reply lands in the log before the session accepts another send.
        let applied = self.apply(result.effects);
        drop(in_flight);
        for notification in applied.notifications {
            self.notifier.notify(notification);
        }

        match outcome {
            Ok(reply) => {
                info!(session_id = %self.id, "send settled");
                Ok(reply)
            }
            Err(reason) => {
                warn!(session_id = %self.id, error = %reason, "send failed");
                Err(SendError::DispatchFailure(reason))
            }
        }
    }

    /// Appends messages immediately and hands back the remaining effects.
    fn apply(&self, effects: Vec<Effect>) -> Applied {
        let mut applied = Applied::default();
        for effect in effects {
            match effect {
                Effect::AppendMessage(message) => {
                    self.write_log().append(message);
                }
                Effect::Dispatch(request) => applied.dispatch = Some(request),
                Effect::Notify(notification) => applied.notifications.push(notification),
            }
        }
        applied
    }

    fn notify_limit(&self, capacity: usize) {
        warn!(session_id = %self.id, capacity, "attachment limit reached");
        self.notifier.notify(Notification::new(
            "Limit Reached",
            format!("You can attach up to {capacity} screenshots."),
            Severity::Neutral,
        ));
    }

    fn read_log(&self) -> RwLockReadGuard<'_, ConversationLog> {
        self.log.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_log(&self) -> RwLockWriteGuard<'_, ConversationLog> {
        self.log.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Effects left over after messages have been appended.
#[derive(Default)]
struct Applied {
    dispatch: Option<DispatchRequest>,
    notifications: Vec<Notification>,
}

/// Marks a send as in flight; returns the session to idle when dropped.
///
/// Dropping the send future before it settles also lands here, so the
/// session cannot stay in [`SessionState::Sending`].
struct InFlight<'a> {
    state: &'a Mutex<SessionState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *lock(self.state) = SessionState::Idle;
    }
}

// Every guarded value is left consistent between statements, so a poisoned
// lock still holds valid data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
