//! Cancellation for in-flight loads.
//!
//! A screen that goes away while its fetch is outstanding cancels the load,
//! and the loader drops the results instead of applying them.

use tokio::sync::watch;

/// Owner side. Dropping the handle does not cancel.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Observer side, cheap to clone into each load.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: Option<watch::Receiver<bool>>,
}

/// Create a linked handle and signal.
#[must_use]
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx: Some(rx) })
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    #[must_use]
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: Some(self.tx.subscribe()),
        }
    }
}

impl CancelSignal {
    /// A signal that never fires.
    #[must_use]
    pub fn never() -> Self {
        Self { rx: None }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once cancelled. Pending forever if the handle is dropped
    /// without cancelling.
    pub async fn cancelled(&self) {
        if let Some(rx) = &self.rx {
            let mut rx = rx.clone();
            if rx.wait_for(|cancelled| *cancelled).await.is_ok() {
                return;
            }
        }
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready, task};

    #[test]
    fn cancel_wakes_waiter() {
        let (handle, signal) = cancel_pair();
        let mut waiter = task::spawn(signal.cancelled());
        assert_pending!(waiter.poll());

        handle.cancel();
        assert!(waiter.is_woken());
        assert_ready!(waiter.poll());
        assert!(signal.is_cancelled());
    }

    #[test]
    fn dropped_handle_never_cancels() {
        let (handle, signal) = cancel_pair();
        drop(handle);
        let mut waiter = task::spawn(signal.cancelled());
        assert_pending!(waiter.poll());
        assert!(!signal.is_cancelled());
    }

    #[test]
    fn never_signal_stays_pending() {
        let signal = CancelSignal::never();
        let mut waiter = task::spawn(signal.cancelled());
        assert_pending!(waiter.poll());
    }

    #[test]
    fn subscribed_signals_share_state() {
        let (handle, _signal) = cancel_pair();
        let other = handle.signal();
        handle.cancel();
        assert!(other.is_cancelled());
    }
}
