use std::time::Duration;

use tokio::task::JoinHandle;

/// An owned one-shot timer.
///
/// Arming always cancels any previously armed task first, so one timer
/// purpose can never have two pending firings. The callback runs on the
/// tokio runtime after the delay elapses, unless the timer is cancelled or
/// dropped before then.
#[derive(Debug, Default)]
pub struct ResettableTimer {
    handle: Option<JoinHandle<()>>,
}

impl ResettableTimer {
    /// Create a disarmed timer.
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Arm the timer, cancelling any pending firing first.
    pub fn arm<F>(&mut self, delay: Duration, on_fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire();
        }));
    }

    /// Cancel without re-arming. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Whether a firing is still pending.
    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for ResettableTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::sync::mpsc;

    #[tokio::test]
    async fn fires_once_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = ResettableTimer::new();

        timer.arm(Duration::from_millis(10), move || {
            let _ = tx.send(());
        });

        assert!(rx.recv().await.is_some());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn rearming_cancels_the_previous_firing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = ResettableTimer::new();

        let first = tx.clone();
        timer.arm(Duration::from_millis(20), move || {
            let _ = first.send("first");
        });
        timer.arm(Duration::from_millis(40), move || {
            let _ = tx.send("second");
        });

        assert_eq!(rx.recv().await, Some("second"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn cancel_prevents_firing() {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        let mut timer = ResettableTimer::new();

        timer.arm(Duration::from_millis(10), move || {
            let _ = tx.send(());
        });
        timer.cancel();
        assert!(!timer.is_armed());

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(rx.try_recv().is_err());
    }
}
