use crate::error::{Result, SquadsSdkError};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Trailing-edge debouncer for async work.
///
/// Each `call` restarts the quiet window and replaces the previously scheduled
/// task. Only the task of the latest call runs, and a task can ask its
/// [`DebounceTicket`] whether a newer call superseded it before applying
/// results. Dropping the debouncer aborts whatever is still scheduled.
pub struct Debouncer {
    window: Duration,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

/// Identifies one scheduled run of a [`Debouncer`]
#[derive(Debug, Clone)]
pub struct DebounceTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl DebounceTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// False once a later call or a cancel superseded this run
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    /// Schedule `task` to run once the window passes without another call.
    ///
    /// Fails only when called outside a tokio runtime.
    pub fn call<F, Fut>(&self, task: F) -> Result<DebounceTicket>
    where
        F: FnOnce(DebounceTicket) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let runtime = Handle::try_current()
            .map_err(|e| SquadsSdkError::Other(format!("No async runtime: {}", e)))?;

        let ticket = DebounceTicket {
            generation: self.generation.fetch_add(1, Ordering::SeqCst) + 1,
            latest: Arc::clone(&self.generation),
        };

        let window = self.window;
        let scheduled = ticket.clone();
        let handle = runtime.spawn(async move {
            tokio::time::sleep(window).await;
            if scheduled.is_current() {
                task(scheduled).await;
            }
        });

        if let Some(previous) = self.lock_pending().replace(handle) {
            previous.abort();
        }

        Ok(ticket)
    }

    /// Drop the scheduled task, including one that is already running
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.lock_pending().take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
