//! Shared fixtures for session flow integration tests.

use std::{io, sync::Arc};

use hoverchat::session::{
    adapters::memory::{InMemoryBridge, InMemoryCaptureFeed, RecordingNotifier},
    config::SessionConfig,
    ports::{CaptureEvent, Subscription},
    services::SessionController,
};
use mockable::DefaultClock;
use rstest::fixture;
use tokio::runtime::Runtime;

/// Controller type wired to the in-memory adapters.
pub type TestController = SessionController<InMemoryBridge, RecordingNotifier, DefaultClock>;

/// A controller together with the adapters it talks to.
pub struct Session {
    pub bridge: Arc<InMemoryBridge>,
    pub notifier: Arc<RecordingNotifier>,
    pub feed: InMemoryCaptureFeed,
    pub controller: Arc<TestController>,
    pub subscription: Subscription,
}

impl Session {
    /// Builds a session with `config`, subscribed to a connected capture feed.
    pub fn with_config(config: SessionConfig) -> Self {
        let bridge = Arc::new(InMemoryBridge::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let feed = InMemoryCaptureFeed::new();
        bridge.connect_feed(feed.clone());
        let controller = Arc::new(SessionController::with_config(
            Arc::clone(&bridge),
            Arc::clone(&notifier),
            Arc::new(DefaultClock),
            config,
        ));
        let subscription = controller.subscribe_captures(&feed);
        Self {
            bridge,
            notifier,
            feed,
            controller,
            subscription,
        }
    }

    /// Queues a screenshot and triggers it through the host.
    ///
    /// # Errors
    ///
    /// Returns the controller's error when the trigger is refused.
    pub async fn take_screenshot(
        &self,
        id: &str,
    ) -> Result<(), hoverchat::session::error::AttachmentError> {
        self.bridge
            .queue_capture(CaptureEvent::captured(id, format!("data:image/png;base64,{id}")));
        self.controller.trigger_capture().await
    }
}

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Provides a session with the default configuration.
#[fixture]
pub fn session() -> Session {
    Session::with_config(SessionConfig::default())
}
