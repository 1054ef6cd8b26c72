use std::time::Duration;

use tokio::sync::mpsc::Sender;
use tracing::{debug, info};
use webkeybind_protocol::Notice;

use crate::{Error, Result};

/// Sends transient notices to the host page.
#[derive(Clone, Debug)]
pub struct NotificationDispatcher {
    /// Host notice queue.
    tx: Sender<Notice>,
    /// How long the host shows each notice.
    duration: Duration,
}

impl NotificationDispatcher {
    /// Create a dispatcher over a host notice channel.
    pub fn new(tx: Sender<Notice>, duration: Duration) -> Self {
        Self { tx, duration }
    }

    /// Display time for each notice.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Send `notice` to the host.
    pub fn send(&self, notice: Notice) -> Result<()> {
        info!(kind = ?notice.kind, text = %notice.text, "notification_display");
        self.tx.try_send(notice).map_err(|_| Error::ChannelClosed)
    }

    /// Send, logging instead of failing when the host is gone.
    pub(crate) fn post(&self, notice: Notice) {
        if let Err(e) = self.send(notice) {
            debug!(error = %e, "notice dropped");
        }
    }
}
