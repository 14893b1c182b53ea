//! Cancellation and deadline signal threaded through every store call.
//!
//! A `Context` is a cheap, cloneable handle. Cancelling a context cancels every
//! context derived from it with [`Context::child`] or [`Context::with_timeout`];
//! cancelling a child never affects its parent.
//!
//! ## Example
//!
//! ```ignore
//! use std::time::Duration;
//! use bookstore::Context;
//!
//! let root = Context::background();
//! let request = root.with_timeout(Duration::from_secs(30));
//! books.get(&request, 1)?;
//!
//! root.cancel(); // request is now cancelled too
//! ```

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, PoisonError, Weak};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Why a context stopped being live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// `cancel()` was called on this context or one of its ancestors.
    Cancelled,
    /// The context's deadline has passed.
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Cancelled => write!(f, "context cancelled"),
            CancelReason::DeadlineExceeded => write!(f, "context deadline exceeded"),
        }
    }
}

/// Cancellation handle backed by `Mutex<Option<CancelReason>>` + `Condvar`.
#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<Option<CancelReason>>,
    wake: Condvar,
    deadline: Option<Instant>,
    children: Mutex<Vec<Weak<Inner>>>,
}

impl Inner {
    fn new(deadline: Option<Instant>) -> Self {
        Inner {
            state: Mutex::new(None),
            wake: Condvar::new(),
            deadline,
            children: Mutex::new(Vec::new()),
        }
    }

    fn cancel(&self, reason: CancelReason) {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.is_some() {
                return;
            }
            *state = Some(reason);
            self.wake.notify_all();
        }

        let children = std::mem::take(
            &mut *self
                .children
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for child in children.iter().filter_map(Weak::upgrade) {
            child.cancel(reason);
        }
    }
}

impl Context {
    /// A root context that is never cancelled unless `cancel()` is called.
    pub fn background() -> Self {
        Context {
            inner: Arc::new(Inner::new(None)),
        }
    }

    /// Derive a context cancelled together with `self`, keeping its deadline.
    pub fn child(&self) -> Self {
        self.derive(self.inner.deadline)
    }

    /// Derive a context that additionally expires after `timeout`.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a context that additionally expires at `deadline`.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.inner.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        };
        self.derive(Some(deadline))
    }

    fn derive(&self, deadline: Option<Instant>) -> Self {
        let child = Arc::new(Inner::new(deadline));
        {
            let mut children = self
                .inner
                .children
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            children.retain(|weak| weak.strong_count() > 0);
            children.push(Arc::downgrade(&child));
        }

        // Registered first so a concurrent cancel either sees the child or is seen here.
        if let Some(reason) = *self.inner.state.lock().unwrap_or_else(PoisonError::into_inner) {
            child.cancel(reason);
        }

        Context { inner: child }
    }

    /// Cancel this context and every context derived from it.
    pub fn cancel(&self) {
        self.inner.cancel(CancelReason::Cancelled);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Returns the reason this context is no longer live, if any.
    pub fn err(&self) -> Option<CancelReason> {
        if let Some(reason) = *self.inner.state.lock().unwrap_or_else(PoisonError::into_inner) {
            return Some(reason);
        }
        match self.inner.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.err().is_some()
    }

    /// Fail fast with `Error::Cancelled` when the context is no longer live.
    pub fn check(&self) -> Result<()> {
        match self.err() {
            Some(reason) => Err(Error::Cancelled(reason)),
            None => Ok(()),
        }
    }

    /// Block for up to `timeout`, returning early when the context is cancelled
    /// or its deadline passes.
    ///
    /// Returns `None` when the full timeout elapsed with the context still live.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<CancelReason> {
        let until = Instant::now() + timeout;
        let mut state = self.inner.state.lock().unwrap_or_else(PoisonError::into_inner);

        loop {
            if let Some(reason) = *state {
                return Some(reason);
            }

            let now = Instant::now();
            if let Some(deadline) = self.inner.deadline {
                if now >= deadline {
                    return Some(CancelReason::DeadlineExceeded);
                }
            }
            if now >= until {
                return None;
            }

            let limit = match self.inner.deadline {
                Some(deadline) => deadline.min(until),
                None => until,
            };
            let (guard, _) = self
                .inner
                .wake
                .wait_timeout(state, limit - now)
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("deadline", &self.inner.deadline)
            .field("err", &self.err())
            .finish()
    }
}
