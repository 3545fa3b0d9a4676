use chrono::{DateTime, Duration, Utc};

pub const IDLE_LOCK_LABEL: &str = "[  ]";

/// Upper bound applied to lock-wait durations reported by the attack process.
pub const MAX_WAIT_SECS: u64 = 7 * 24 * 60 * 60;

/// A lock-wait deadline tagged with the generation that scheduled it.
///
/// Timer callbacks carry the generation back so that a countdown replaced by
/// a newer lock-wait cannot clear or redraw the newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub deadline: DateTime<Utc>,
    pub generation: u64,
}

impl Countdown {
    pub fn start(now: DateTime<Utc>, seconds: u64, generation: u64) -> Self {
        let seconds = clamp_wait(seconds) as i64;
        Self {
            deadline: now + Duration::seconds(seconds),
            generation,
        }
    }

    /// Whole seconds left, rounded up and never negative. A fresh wait of
    /// `N` seconds reads `N` until a full second has elapsed.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        let millis = (self.deadline - now).num_milliseconds();
        if millis <= 0 {
            0
        } else {
            (millis + 999) / 1_000
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline
    }

    pub fn label(&self, now: DateTime<Utc>) -> String {
        format!("[{}]", self.remaining_secs(now))
    }
}

pub fn clamp_wait(seconds: u64) -> u64 {
    seconds.min(MAX_WAIT_SECS)
}
