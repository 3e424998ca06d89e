//! Notifier that writes notifications to the `tracing` log stream.

use crate::session::ports::{Notification, Notifier, Severity};
use tracing::{error, info, warn};

/// [`Notifier`] for hosts without a toast surface.
///
/// Maps [`Severity::Error`] to `error!`, [`Severity::Neutral`] to `warn!`
/// and [`Severity::Info`] to `info!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let Notification {
            title,
            message,
            severity,
        } = notification;
        match severity {
            Severity::Error => error!(%title, "{message}"),
            Severity::Neutral => warn!(%title, "{message}"),
            Severity::Info => info!(%title, "{message}"),
        }
    }
}
