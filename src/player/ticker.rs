use std::time::{Duration, Instant};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Slot {
    Idle,
    Immediate,
    At(Instant),
}

/// Single-slot, self-rescheduling timer.
///
/// The owner polls it with the current instant; nothing runs in the
/// background, so a cancelled ticker can never fire.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    slot: Slot,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            slot: Slot::Idle,
        }
    }

    /// Schedule the next firing for the next poll.
    pub fn start(&mut self) {
        self.slot = Slot::Immediate;
    }

    /// Schedule the next firing one interval after `now`.
    pub fn reschedule(&mut self, now: Instant) {
        self.slot = Slot::At(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.slot = Slot::Idle;
    }

    #[cfg(test)]
    pub fn is_scheduled(&self) -> bool {
        self.slot != Slot::Idle
    }

    /// Consume the pending firing if it is due at `now`.
    pub fn fire(&mut self, now: Instant) -> bool {
        let due = match self.slot {
            Slot::Idle => false,
            Slot::Immediate => true,
            Slot::At(at) => at <= now,
        };
        if due {
            self.slot = Slot::Idle;
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_schedule() {
        let now = Instant::now();
        let mut t = Ticker::new(Duration::from_secs(1));
        assert!(!t.fire(now));

        t.start();
        assert!(t.fire(now));
        assert!(!t.fire(now));

        t.reschedule(now);
        assert!(!t.fire(now + Duration::from_millis(999)));
        assert!(t.fire(now + Duration::from_secs(1)));
    }

    #[test]
    fn cancel_prevents_firing() {
        let now = Instant::now();
        let mut t = Ticker::new(Duration::from_secs(1));
        t.reschedule(now);
        t.cancel();
        assert!(!t.is_scheduled());
        assert!(!t.fire(now + Duration::from_secs(60)));
    }
}
