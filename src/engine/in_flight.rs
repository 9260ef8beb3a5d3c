use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// At-most-one-cycle-in-flight token.
///
/// Owned by a controller; clones share the same flag, so handing one token to
/// several controllers serializes them against each other.
#[derive(Debug, Clone, Default)]
pub struct InFlightToken {
    busy: Arc<AtomicBool>,
}

impl InFlightToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the token, or None if a cycle already holds it.
    pub fn try_acquire(&self) -> Option<InFlightGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                busy: self.busy.clone(),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the token on drop, including when the owning future is cancelled.
#[derive(Debug)]
pub struct InFlightGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
