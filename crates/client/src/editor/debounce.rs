use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Trailing-edge debounce timer.
///
/// Arming replaces any pending action. Once the delay elapses the action is
/// spawned on its own task, so cancelling afterwards does not interrupt it.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    timer: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, timer: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn arm<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action);
        }));
    }

    /// Cancel the pending action. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) if !timer.is_finished() => {
                timer.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
