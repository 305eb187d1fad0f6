//! Process-wide cooperative cancellation.
//!
//! One flag is shared by every session. Clearing it stops all in-flight
//! generations at their next checkpoint; it is a kill switch, not a
//! per-session token.
//!
//! A session can still tell *why* its generation ended: [`CancellationFlag::watch`]
//! hands out a clone that remembers whether it ever read the cleared state,
//! independent of later `resume` calls or of interrupts that land after the
//! session stopped polling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared "generation allowed" flag. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct CancellationFlag {
    allowed: Arc<AtomicBool>,
    /// Set once a read through this handle (or its clones) saw `false`.
    tripped: Arc<AtomicBool>,
}

impl Default for CancellationFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationFlag {
    /// A fresh flag in the "allowed" state.
    pub fn new() -> Self {
        Self {
            allowed: Arc::new(AtomicBool::new(true)),
            tripped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A handle on the same flag with its own trip record.
    pub fn watch(&self) -> Self {
        Self {
            allowed: Arc::clone(&self.allowed),
            tripped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop every generation polling this flag. Idempotent.
    pub fn interrupt(&self) {
        self.allowed.store(false, Ordering::Release);
    }

    /// Whether producers may emit another event.
    pub fn is_allowed(&self) -> bool {
        let allowed = self.allowed.load(Ordering::Acquire);
        if !allowed {
            self.tripped.store(true, Ordering::Relaxed);
        }
        allowed
    }

    /// Whether a poll through this handle ever found generation stopped.
    pub fn was_tripped(&self) -> bool {
        self.tripped.load(Ordering::Relaxed)
    }

    /// Re-allow generation. Never called implicitly.
    pub fn resume(&self) {
        self.allowed.store(true, Ordering::Release);
    }
}
