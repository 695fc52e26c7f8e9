//! Single-session guard for navigation requests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

/// Raised when a session is requested while another one is active.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("another language server session is already active")]
pub struct SessionBusy;

/// Admits at most one active language server session at a time.
///
/// Clones share the same slot, so a guard obtained through any clone blocks
/// every other clone until it is dropped.
#[derive(Debug, Clone, Default)]
pub struct SessionGate {
    active: Arc<AtomicBool>,
}

impl SessionGate {
    /// Creates an idle gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the session slot without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`SessionBusy`] if a [`SessionGuard`] from this gate is alive.
    pub fn acquire(&self) -> Result<SessionGuard, SessionBusy> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| SessionGuard {
                active: Arc::clone(&self.active),
            })
            .map_err(|_| SessionBusy)
    }

    /// Whether a session currently holds the slot.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// Proof of an active session. Dropping it releases the slot.
#[derive(Debug)]
#[must_use = "the session ends as soon as the guard is dropped"]
pub struct SessionGuard {
    active: Arc<AtomicBool>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}
