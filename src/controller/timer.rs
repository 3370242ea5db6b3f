//! Auto-refresh timer driven by the caller's clock

use std::time::{Duration, Instant};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(120);

/// Periodic timer owned by one controller.
///
/// The timer never sleeps or spawns; the owner polls it with the current
/// instant, which keeps it testable with a virtual clock.
#[derive(Debug, Clone)]
pub struct RefreshTimer {
    period: Duration,
    next_due: Option<Instant>,
}

impl RefreshTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period: if period.is_zero() {
                DEFAULT_REFRESH_INTERVAL
            } else {
                period
            },
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Time left until the next tick, `None` when disarmed
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Returns true when a tick is due. Fires at most once per call; after a
    /// long stall the schedule restarts from `now` instead of catching up.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        let mut next = due + self.period;
        if next <= now {
            next = now + self.period;
        }
        self.next_due = Some(next);
        true
    }
}

impl Default for RefreshTimer {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_period() {
        let start = Instant::now();
        let mut timer = RefreshTimer::default();
        assert!(!timer.poll(start + Duration::from_secs(500)), "disarmed timer fired");

        timer.arm(start);
        assert!(!timer.poll(start + Duration::from_secs(119)));
        assert!(timer.poll(start + Duration::from_secs(120)));
        assert!(!timer.poll(start + Duration::from_secs(121)));
        assert!(timer.poll(start + Duration::from_secs(240)));
    }

    #[test]
    fn test_no_burst_after_stall() {
        let start = Instant::now();
        let mut timer = RefreshTimer::new(Duration::from_secs(10));
        timer.arm(start);
        let late = start + Duration::from_secs(55);
        assert!(timer.poll(late));
        assert!(!timer.poll(late));
        assert_eq!(timer.remaining(late), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_disarm() {
        let start = Instant::now();
        let mut timer = RefreshTimer::default();
        timer.arm(start);
        timer.disarm();
        assert!(!timer.is_armed());
        assert!(!timer.poll(start + Duration::from_secs(600)));
        assert_eq!(RefreshTimer::new(Duration::ZERO).period(), DEFAULT_REFRESH_INTERVAL);
    }
}
