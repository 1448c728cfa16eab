//! Turns process termination signals into the in-band quit event.

use tokio::sync::watch;
use tracing::{error, info, warn};

/// Read side of the quit flag, polled by the input source
#[derive(Debug, Clone)]
pub struct QuitSignal {
    receiver: watch::Receiver<bool>,
}

impl QuitSignal {
    pub fn channel() -> (watch::Sender<bool>, Self) {
        let (sender, receiver) = watch::channel(false);
        (sender, Self { receiver })
    }

    /// A signal that is never raised
    #[cfg(test)]
    pub fn never() -> Self {
        Self::channel().1
    }

    pub fn is_raised(&self) -> bool {
        *self.receiver.borrow()
    }
}

/// Spawns a task that raises the returned signal on Ctrl-C or SIGTERM.
///
/// Must be called from within a tokio runtime.
pub fn spawn_listener() -> QuitSignal {
    let (sender, signal) = QuitSignal::channel();
    tokio::spawn(async move {
        let name = wait_for_quit().await;
        info!("Received {}, shutting down", name);
        if sender.send(true).is_err() {
            warn!("Quit signal has no listeners left");
        }
    });
    signal
}

async fn wait_for_ctrl_c() -> &'static str {
    match tokio::signal::ctrl_c().await {
        Ok(()) => "SIGINT",
        Err(e) => {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending().await
        }
    }
}

#[cfg(unix)]
async fn wait_for_quit() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to listen for SIGTERM: {}", e);
            return wait_for_ctrl_c().await;
        }
    };

    tokio::select! {
        name = wait_for_ctrl_c() => name,
        _ = terminate.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn wait_for_quit() -> &'static str {
    wait_for_ctrl_c().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_stays_lowered() {
        assert!(!QuitSignal::never().is_raised());
    }

    #[test]
    fn test_raise_is_seen_by_clones() {
        let (sender, signal) = QuitSignal::channel();
        let clone = signal.clone();
        sender.send(true).unwrap();
        assert!(signal.is_raised());
        assert!(clone.is_raised());
    }

    #[test]
    fn test_raised_flag_survives_sender_drop() {
        let (sender, signal) = QuitSignal::channel();
        sender.send(true).unwrap();
        drop(sender);
        assert!(signal.is_raised());
    }
}
