//! One-second clock for hosts that drive a [`TimerEngine`](super::TimerEngine).

use std::time::{Duration, Instant};

/// Tick source armed only while the engine runs.
///
/// A disarmed ticker yields nothing, so paused time never reaches the
/// engine. Dropping the ticker disarms it.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    last: Option<Instant>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Ticker {
    /// Create a disarmed ticker.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Arm when `running` turns true, disarm when it turns false.
    pub fn sync(&mut self, running: bool, now: Instant) {
        match (running, self.last) {
            (true, None) => self.last = Some(now),
            (false, Some(_)) => self.last = None,
            _ => {}
        }
    }

    /// Disarm unconditionally.
    pub fn disarm(&mut self) {
        self.last = None;
    }

    /// Whether the ticker is armed.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.last.is_some()
    }

    /// Number of whole intervals elapsed since the last call.
    ///
    /// The remainder carries over to the next call.
    pub fn due(&mut self, now: Instant) -> u32 {
        let Some(last) = self.last else {
            return 0;
        };
        if self.interval.is_zero() {
            return 0;
        }

        let elapsed = now.saturating_duration_since(last);
        let count =
            u32::try_from(elapsed.as_nanos() / self.interval.as_nanos()).unwrap_or(u32::MAX);
        self.last = Some(last + self.interval * count);
        count
    }

    /// Time until the next tick is due, if armed.
    #[must_use]
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.last
            .map(|last| (last + self.interval).saturating_duration_since(now))
    }
}
