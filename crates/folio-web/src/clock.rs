#![forbid(unsafe_code)]

use core::time::Duration;

/// Deterministic monotonic clock controlled by the host.
///
/// The web shell sets it from `performance.now()` before every timed
/// operation; tests advance it explicitly.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Going backwards is ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_never_moves_backwards() {
        let mut clock = DeterministicClock::new();
        clock.set(Duration::from_millis(40));
        clock.set(Duration::from_millis(10));
        assert_eq!(clock.now(), Duration::from_millis(40));
        clock.advance(Duration::from_millis(5));
        assert_eq!(clock.now(), Duration::from_millis(45));
    }
}
