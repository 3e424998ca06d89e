//! Send flow tests for [`SessionController`].
//!
//! [`SessionController`]: hoverchat::session::services::SessionController

use std::{io, sync::Arc};

use crate::session_flows::helpers::{Session, runtime, session};
use hoverchat::session::{
    domain::{Sender, SessionState},
    error::SendError,
    ports::{DispatchResponse, Notification, Severity},
};
use rstest::rstest;
use tokio::runtime::Runtime;

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// A screenshot plus prompt round-trips into a two-message history.
#[rstest]
fn prompt_with_screenshot_produces_reply(runtime: io::Result<Runtime>, session: Session) -> TestResult {
    let rt = runtime?;
    session
        .bridge
        .push_response(DispatchResponse::from_json(
            r#"{"success":true,"data":"That is a terminal window."}"#,
        )?);

    rt.block_on(session.take_screenshot("/tmp/shot-1.png"))?;
    let reply = rt.block_on(session.controller.submit("what is this?"))?;

    assert_eq!(reply, "That is a terminal window.");
    let history = session.controller.history();
    let turns: Vec<(Sender, &str, usize)> = history
        .iter()
        .map(|message| (message.sender(), message.text(), message.attachments().len()))
        .collect();
    assert_eq!(
        turns,
        vec![
            (Sender::User, "what is this?", 1),
            (Sender::Assistant, "That is a terminal window.", 0),
        ]
    );
    assert!(session.controller.attachments().is_empty());
    Ok(())
}

/// A backend refusal becomes an error turn and a toast.
#[rstest]
fn backend_refusal_is_visible(runtime: io::Result<Runtime>, session: Session) -> TestResult {
    let rt = runtime?;
    session
        .bridge
        .push_response(DispatchResponse::from_json(r#"{"success":false}"#)?);

    let result = rt.block_on(session.controller.submit("hello"));

    assert_eq!(
        result,
        Err(SendError::DispatchFailure("Unknown error".to_owned()))
    );
    assert_eq!(
        session
            .controller
            .history()
            .last()
            .map(|message| message.text().to_owned()),
        Some("Error: Unknown error".to_owned())
    );
    let toasts = session.notifier.notifications();
    assert_eq!(toasts.len(), 1);
    assert_eq!(
        toasts.first().map(|toast| toast.severity),
        Some(Severity::Error)
    );
    Ok(())
}

/// Only one send may be outstanding; the second is refused silently.
#[rstest]
fn overlapping_sends_are_serialized(runtime: io::Result<Runtime>, session: Session) -> TestResult {
    let rt = runtime?;
    session.bridge.push_response(DispatchResponse::success("done"));
    let gate = session.bridge.hold_dispatches();

    let (first, second) = rt.block_on(async {
        let controller = Arc::clone(&session.controller);
        let pending = tokio::spawn(async move { controller.submit("first").await });
        while session.controller.state() != SessionState::Sending {
            tokio::task::yield_now().await;
        }
        let second = session.controller.submit("second").await;
        gate.notify_one();
        (pending.await, second)
    });

    assert_eq!(first?, Ok("done".to_owned()));
    assert_eq!(second, Err(SendError::AlreadyInFlight));
    assert_eq!(session.bridge.dispatches().len(), 1);
    assert!(session.notifier.notifications().is_empty());
    Ok(())
}

/// A custom error prefix shapes the recorded failure text.
#[rstest]
fn error_prefix_is_configurable(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let session = Session::with_config(
        hoverchat::session::config::SessionConfig::from_json(r#"{"error_prefix":"Failed: "}"#)?,
    );
    session.bridge.push_fault("offline");

    let result = rt.block_on(session.controller.submit("ping"));

    assert!(result.is_err());
    assert_eq!(
        session
            .controller
            .history()
            .last()
            .map(|message| message.text().to_owned()),
        Some("Failed: offline".to_owned())
    );
    assert_eq!(
        session.notifier.last(),
        Some(Notification::error("offline"))
    );
    Ok(())
}
