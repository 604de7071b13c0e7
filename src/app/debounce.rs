use log::debug;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

/// Runs only the last of a burst of scheduled actions, once `delay` has
/// passed without a newer one.
pub struct Debouncer {
    delay: Duration,
    pending: Option<CancellationToken>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel whatever is waiting and arm `action` to run after the delay.
    pub fn schedule<F>(&mut self, handle: &Handle, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let token = CancellationToken::new();
        let child = token.clone();
        let delay = self.delay;
        handle.spawn(async move {
            tokio::select! {
                _ = child.cancelled() => {
                    debug!("Debounced action superseded");
                }
                _ = tokio::time::sleep(delay) => {
                    action.await;
                }
            }
        });
        self.pending = Some(token);
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_only_last_action_runs() {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let mut debouncer = Debouncer::new(Duration::from_millis(40));
        let handle = Handle::current();

        for query in ["a", "ai", "air"] {
            let fired = fired.clone();
            debouncer.schedule(&handle, async move {
                fired.lock().unwrap().push(query);
            });
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(*fired.lock().unwrap(), vec!["air"]);
    }

    #[tokio::test]
    async fn test_cancel_prevents_action() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(20));
        let counter = count.clone();
        debouncer.schedule(&Handle::current(), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
