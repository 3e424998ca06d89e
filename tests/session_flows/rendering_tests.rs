//! Rendering recorded replies into prose and code segments.

use std::io;

use crate::session_flows::helpers::{Session, runtime, session};
use hoverchat::session::{
    domain::{Segment, render_raw, segment},
    ports::DispatchResponse,
};
use rstest::rstest;
use tokio::runtime::Runtime;

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// A reply with a fenced block renders as prose, code, prose.
#[rstest]
fn reply_segments_for_display(runtime: io::Result<Runtime>, session: Session) -> TestResult {
    let rt = runtime?;
    let reply = "Try this:\n```rust\nfn main() {}\n```\nThen run it.";
    session.bridge.push_response(DispatchResponse::success(reply));

    rt.block_on(session.controller.submit("show me"))?;

    let history = session.controller.history();
    let recorded = history.last().ok_or("no reply recorded")?;
    let segments = segment(recorded.text());
    assert_eq!(
        segments,
        vec![
            Segment::prose("Try this:\n"),
            Segment::code(Some("rust"), "fn main() {}\n"),
            Segment::prose("\nThen run it."),
        ]
    );
    assert_eq!(
        session.controller.config().fallback_language,
        "plaintext"
    );
    assert_eq!(
        segments.get(1).and_then(|block| block.language_or("plaintext")),
        Some("rust")
    );
    assert_eq!(render_raw(&segments), reply);
    Ok(())
}

/// An unterminated fence in a reply stays prose.
#[rstest]
fn unterminated_fence_stays_prose() {
    let reply = "Partial:\n```python\nprint(1)";

    assert_eq!(segment(reply), vec![Segment::prose(reply)]);
}
