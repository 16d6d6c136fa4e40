//! Payload-less change notifications.
//!
//! Each service owns its own [`Notifier`] (cart-changed, auth-changed).
//! Listeners hold a [`Subscription`]; dropping it unsubscribes. Delivery is
//! fire-and-forget and always happens after the change was persisted, so a
//! listener that re-reads on receipt sees the new state. Ordering across
//! listeners is unspecified.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::trace;

const CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub struct Notifier {
    name: &'static str,
    sender: broadcast::Sender<()>,
}

impl Notifier {
    pub fn new(name: &'static str) -> Self {
        let (sender, _) = broadcast::channel(CAPACITY);
        Self { name, sender }
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Broadcasts to current subscribers. Having none is fine.
    pub fn notify(&self) {
        let delivered = self.sender.send(()).unwrap_or(0);
        trace!(signal = self.name, delivered, "Signal emitted");
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Handle to a [`Notifier`]. Dropping it (or calling [`Subscription::unsubscribe`])
/// ends the subscription.
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<()>,
}

impl Subscription {
    /// Waits for the next signal. Returns `false` once the notifier is gone.
    ///
    /// Missed signals collapse into one: listeners only need to re-read.
    pub async fn changed(&mut self) -> bool {
        match self.receiver.recv().await {
            Ok(()) | Err(RecvError::Lagged(_)) => true,
            Err(RecvError::Closed) => false,
        }
    }

    /// Non-blocking check; drains everything pending.
    pub fn has_changed(&mut self) -> bool {
        let mut seen = false;
        loop {
            match self.receiver.try_recv() {
                Ok(()) | Err(TryRecvError::Lagged(_)) => seen = true,
                Err(TryRecvError::Empty | TryRecvError::Closed) => return seen,
            }
        }
    }

    pub fn unsubscribe(self) {}
}
