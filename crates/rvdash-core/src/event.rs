use std::fmt;

/// Semantic events recognised in attack-process output.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    RawLine(String),
    Associated,
    EssidFound(String),
    TrialAttempted(String),
    /// Seconds spent per trial.
    SpeedMeasured(u64),
    PercentUpdated(f64),
    /// Seconds the attack process will sleep before resuming.
    LockWaitStarted(u64),
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::RawLine(_) => "raw-line",
            Event::Associated => "associated",
            Event::EssidFound(_) => "essid-found",
            Event::TrialAttempted(_) => "trial-attempted",
            Event::SpeedMeasured(_) => "speed-measured",
            Event::PercentUpdated(_) => "percent-updated",
            Event::LockWaitStarted(_) => "lock-wait-started",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::RawLine(line) => write!(f, "{}: {line}", self.kind()),
            Event::Associated => f.write_str(self.kind()),
            Event::EssidFound(essid) => write!(f, "{}: {essid}", self.kind()),
            Event::TrialAttempted(pin) => write!(f, "{}: {pin}", self.kind()),
            Event::SpeedMeasured(secs) => write!(f, "{}: {secs}s", self.kind()),
            Event::PercentUpdated(percent) => write!(f, "{}: {percent}%", self.kind()),
            Event::LockWaitStarted(secs) => write!(f, "{}: {secs}s", self.kind()),
        }
    }
}
