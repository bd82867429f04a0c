//! Cancellable timers for debounced input and payment countdowns.
//!
//! A scheduled callback lives in a spawned task owned by a [`TimerHandle`].
//! Dropping or cancelling the handle aborts the task, so nothing fires after
//! its owner is gone.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

#[derive(Debug)]
pub struct TimerHandle {
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// True once the callback has run or the timer was cancelled.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |t| t.is_finished())
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Run `callback` after `delay` unless the returned handle is dropped first.
pub fn schedule<F>(delay: Duration, callback: F) -> TimerHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        callback.await;
    });
    TimerHandle { task: Some(task) }
}

/// Keeps at most one pending callback; each call supersedes the previous one.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<TimerHandle>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn call<F>(&mut self, callback: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // Replacing the handle drops, and so aborts, the superseded callback.
        self.pending = Some(schedule(self.delay, callback));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

/// A fixed-length countdown that runs `on_expire` when it reaches zero.
#[derive(Debug)]
pub struct Countdown {
    deadline: Instant,
    handle: TimerHandle,
}

impl Countdown {
    pub fn start<F>(duration: Duration, on_expire: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            deadline: Instant::now() + duration,
            handle: schedule(duration, on_expire),
        }
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn cancel(&mut self) {
        self.handle.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// `MM:SS`, rounding partial seconds up so the label reads 01:00 at the start.
pub fn countdown_label(remaining: Duration) -> String {
    let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_only_fires_latest() {
        let fired = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        for i in 1..=3 {
            let (fired, last) = (fired.clone(), last.clone());
            debouncer.call(async move {
                fired.fetch_add(1, Ordering::SeqCst);
                last.store(i, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(last.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handle_never_fires() {
        let fired = Arc::new(AtomicUsize::new(0));
        let f = fired.clone();
        let handle = schedule(Duration::from_secs(1), async move {
            f.fetch_add(1, Ordering::SeqCst);
        });
        drop(handle);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_expiry_and_remaining() {
        let fired = Arc::new(AtomicUsize::new(0));
        let f = fired.clone();
        let countdown = Countdown::start(Duration::from_secs(60), async move {
            f.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(countdown_label(countdown.remaining()), "01:00");

        tokio::time::sleep(Duration::from_secs(15)).await;
        assert_eq!(countdown_label(countdown.remaining()), "00:45");

        tokio::time::sleep(Duration::from_secs(46)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(countdown.is_finished());
    }
}
