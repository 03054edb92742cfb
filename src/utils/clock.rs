use chrono::{DateTime, Duration, Local};

/// Clock source with an adjustable signed offset, so "now" can be
/// simulated without touching the system clock.
///
/// The offset is applied on every read; jumping it backward or forward
/// between ticks is legal and the tracker recomputes from scratch.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    offset: Duration,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self {
            offset: Duration::zero(),
        }
    }

    /// Current (possibly simulated) local time.
    pub fn now(&self) -> DateTime<Local> {
        Local::now() + self.offset
    }

    pub fn offset(&self) -> Duration {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Duration) {
        self.offset = offset;
    }

    /// Pins the clock so that a read taken right now reports `target`.
    pub fn simulate(&mut self, target: DateTime<Local>) {
        self.offset = target.signed_duration_since(Local::now());
    }

    /// Drops any simulation and returns to the real clock.
    pub fn reset(&mut self) {
        self.offset = Duration::zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_clock_has_no_offset() {
        let clock = Clock::new();
        assert_eq!(clock.offset(), Duration::zero());
    }

    #[test]
    fn simulate_moves_now_close_to_target() {
        let mut clock = Clock::new();
        let target = Local::now() + Duration::days(3);
        clock.simulate(target);
        let drift = (clock.now() - target).num_seconds().abs();
        assert!(drift <= 1, "simulated now drifted {}s from target", drift);
    }

    #[test]
    fn reset_returns_to_real_time() {
        let mut clock = Clock::new();
        clock.simulate(Local::now() - Duration::days(10));
        clock.reset();
        assert_eq!(clock.offset(), Duration::zero());
    }
}
