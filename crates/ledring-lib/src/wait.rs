//! Cancellable waiting — the only place the crate blocks on wall-clock time.
//!
//! Pacing before each remote call, 429 backoff, and animation steps all go
//! through a [`Sleeper`]. A cancelled wait returns [`Interrupted`] instead of
//! elapsing normally, and callers propagate it with `?`.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// A wait was cancelled before its duration elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wait interrupted")
    }
}

impl std::error::Error for Interrupted {}

/// Blocks the current thread for a duration, or until cancelled.
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted>;
}

impl<T: Sleeper + ?Sized> Sleeper for &T {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        (**self).sleep(duration)
    }
}

impl<T: Sleeper + ?Sized> Sleeper for Arc<T> {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        (**self).sleep(duration)
    }
}

// ── Cancel token ──

/// Shared cancellation flag. Cloning shares the same underlying flag.
///
/// Once cancelled it stays cancelled: every later wait returns immediately.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel all current and future waits on this token.
    pub fn cancel(&self) {
        let (lock, cvar) = &*self.inner;
        match lock.lock() {
            Ok(mut cancelled) => *cancelled = true,
            Err(e) => *e.into_inner() = true,
        }
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        match self.inner.0.lock() {
            Ok(cancelled) => *cancelled,
            Err(e) => *e.into_inner(),
        }
    }

    /// Wait up to `timeout`. Returns `true` if cancelled (now or earlier).
    ///
    /// A timeout too large to represent as a deadline waits until cancelled.
    fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let (lock, cvar) = &*self.inner;
        let mut guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        // Loop to absorb spurious wakeups.
        while !*guard {
            guard = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    match cvar.wait_timeout(guard, deadline - now) {
                        Ok((g, _)) => g,
                        Err(e) => e.into_inner().0,
                    }
                }
                None => cvar.wait(guard).unwrap_or_else(|e| e.into_inner()),
            };
        }
        true
    }
}

// ── Real sleeper ──

/// Wall-clock sleeper that can be woken early by its [`CancelToken`].
#[derive(Debug, Clone, Default)]
pub struct CancellableSleeper {
    token: CancelToken,
}

impl CancellableSleeper {
    pub fn new(token: CancelToken) -> Self {
        Self { token }
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }
}

impl Sleeper for CancellableSleeper {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        if self.token.wait(duration) {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }
}

// ── Recording sleeper for testing ──

/// Fast-forward sleeper for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use crate::service::mock::{Event, Journal};
    use std::cell::{Cell, RefCell};

    /// Records requested durations without blocking.
    #[derive(Default)]
    pub struct RecordingSleeper {
        /// Every requested duration, in call order.
        pub sleeps: RefCell<Vec<Duration>>,
        /// If set, the Nth call (0-based) returns `Interrupted`.
        pub interrupt_at: Cell<Option<usize>>,
        journal: Option<Journal>,
    }

    impl RecordingSleeper {
        pub fn new() -> Self {
            Self::default()
        }

        /// Also append each sleep to a shared event journal.
        pub fn with_journal(journal: Journal) -> Self {
            Self {
                journal: Some(journal),
                ..Self::default()
            }
        }

        pub fn count(&self) -> usize {
            self.sleeps.borrow().len()
        }
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
            let index = self.sleeps.borrow().len();
            self.sleeps.borrow_mut().push(duration);
            if let Some(journal) = &self.journal {
                journal.borrow_mut().push(Event::Sleep(duration));
            }
            if self.interrupt_at.get() == Some(index) {
                return Err(Interrupted);
            }
            Ok(())
        }
    }
}
