/// Single-slot refresh request tracker.
///
/// At most one cycle is outstanding at any time: requesting while armed is a no-op, and the display
/// loop consumes the slot when it runs the cycle. A cycle that wants to continue requests again.
#[derive(Clone, Copy, Debug, Default)]
pub struct RefreshScheduler {
    armed: bool,
}

impl RefreshScheduler {
    /// Idle scheduler with nothing outstanding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a cycle at the next refresh. Returns `true` if this call armed the slot, which is
    /// when a host needs to request a redraw.
    pub fn request(&mut self) -> bool {
        if self.armed {
            return false;
        }
        self.armed = true;
        true
    }

    /// Consume the outstanding request, returning whether a cycle should run now.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }

    /// Drop the outstanding request without running it.
    pub fn cancel(&mut self) {
        self.armed = false;
    }

    /// Number of outstanding requests (0 or 1).
    pub fn outstanding(&self) -> usize {
        usize::from(self.armed)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
