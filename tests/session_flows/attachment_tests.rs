//! Attachment flow tests covering capture, deletion and capacity.

use std::io;

use crate::session_flows::helpers::{Session, runtime, session};
use hoverchat::session::{
    domain::{AttachmentId, MAX_ATTACHMENTS},
    error::AttachmentError,
    ports::{CaptureEvent, Notification, Severity},
};
use rstest::rstest;
use tokio::runtime::Runtime;

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// The sixth screenshot is refused before the host is asked.
#[rstest]
fn sixth_screenshot_is_refused(runtime: io::Result<Runtime>, session: Session) -> TestResult {
    let rt = runtime?;

    let results = rt.block_on(async {
        let mut results = Vec::new();
        for index in 0..=MAX_ATTACHMENTS {
            results.push(session.take_screenshot(&format!("/tmp/{index}.png")).await);
        }
        results
    });

    assert!(results.iter().take(MAX_ATTACHMENTS).all(Result::is_ok));
    assert_eq!(
        results.last(),
        Some(&Err(AttachmentError::CapacityExceeded {
            capacity: MAX_ATTACHMENTS
        }))
    );
    assert_eq!(session.bridge.capture_triggers(), MAX_ATTACHMENTS);
    assert_eq!(
        session.notifier.last(),
        Some(Notification::new(
            "Limit Reached",
            "You can attach up to 5 screenshots.",
            Severity::Neutral,
        ))
    );
    Ok(())
}

/// Completions arriving directly on the feed are still capacity-checked.
#[rstest]
fn feed_events_respect_capacity(session: Session) {
    for index in 0..MAX_ATTACHMENTS + 2 {
        let delivered = session
            .feed
            .emit(&CaptureEvent::captured(format!("/tmp/{index}.png"), "data:x"));
        assert_eq!(delivered, 1);
    }

    assert_eq!(session.controller.attachments().len(), MAX_ATTACHMENTS);
}

/// A malformed completion is dropped with a toast.
#[rstest]
fn malformed_capture_is_dropped(session: Session) -> TestResult {
    let event: CaptureEvent = serde_json::from_str(r#"{"path":"/tmp/a.png"}"#)?;

    assert_eq!(session.feed.emit(&event), 1);

    assert!(session.controller.attachments().is_empty());
    assert_eq!(
        session.notifier.last(),
        Some(Notification::error("Screenshot capture failed."))
    );
    Ok(())
}

/// Deleting goes through the host and then leaves the strip.
#[rstest]
fn delete_removes_through_host(runtime: io::Result<Runtime>, session: Session) -> TestResult {
    let rt = runtime?;
    let id = AttachmentId::new("/tmp/doomed.png");

    rt.block_on(async {
        session.take_screenshot("/tmp/kept.png").await?;
        session.take_screenshot(id.as_str()).await?;
        session.controller.delete_attachment(&id).await
    })?;

    let remaining: Vec<String> = session
        .controller
        .attachments()
        .iter()
        .map(|attachment| attachment.id().to_string())
        .collect();
    assert_eq!(remaining, vec!["/tmp/kept.png"]);
    assert_eq!(session.bridge.deleted(), vec![id]);
    Ok(())
}

/// Cancelling the subscription stops capture delivery.
#[rstest]
fn cancelled_subscription_stops_delivery(runtime: io::Result<Runtime>, session: Session) -> TestResult {
    let rt = runtime?;
    let Session {
        bridge,
        controller,
        feed,
        subscription,
        ..
    } = session;

    subscription.cancel();
    rt.block_on(async {
        bridge.queue_capture(CaptureEvent::captured("/tmp/late.png", "data:late"));
        controller.trigger_capture().await
    })?;

    assert_eq!(feed.subscriber_count(), 0);
    assert!(controller.attachments().is_empty());
    Ok(())
}
