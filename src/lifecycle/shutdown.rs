//! Process-wide stop signal.
//!
//! `main` owns one `Shutdown`. The signal task holds a clone and fires it on
//! SIGINT/SIGTERM; the server holds a receiver and starts draining when it
//! arrives. Tests fire it directly to stop a server they started.

use tokio::sync::broadcast;

/// Fan-out stop signal shared between the signal task and the server.
#[derive(Debug, Clone)]
pub struct Shutdown {
    notify: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (notify, _) = broadcast::channel(1);
        Self { notify }
    }

    /// A receiver that resolves once `trigger` is called. Subscribe before
    /// triggering; a receiver created afterwards never sees the signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.notify.subscribe()
    }

    /// Wake every current receiver. Firing with nobody listening, or firing
    /// twice, is a no-op.
    pub fn trigger(&self) {
        let _ = self.notify.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
