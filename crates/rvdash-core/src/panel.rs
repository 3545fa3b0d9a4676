use crate::countdown::{clamp_wait, Countdown, IDLE_LOCK_LABEL};
use crate::event::Event;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::collections::VecDeque;

pub const LOG_TAIL_LEN: usize = 3;

/// When a panel joins the visible stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Shown as soon as it is created.
    Immediate,
    /// Hidden until the first ESSID is reported.
    OnEssid,
}

/// Side effects the runtime must carry out after an event is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelUpdate {
    pub redraw: bool,
    pub revealed: bool,
    pub countdown: Option<CountdownRequest>,
}

impl PanelUpdate {
    fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownRequest {
    pub generation: u64,
    pub seconds: u64,
}

/// Display state of one attack session.
#[derive(Debug, Clone)]
pub struct PanelState {
    pub bssid: String,
    pub essid: Option<String>,
    pub associated: bool,
    pub current_trial: Option<String>,
    pub countdown: Option<Countdown>,
    pub percent: f64,
    /// Seconds per trial; zero until the attack process reports it.
    pub speed_secs: u64,
    pub projected_finish: Option<DateTime<Utc>>,
    pub tail: VecDeque<String>,
    pub visible: bool,
    visibility: Visibility,
    generation: u64,
}

impl PanelState {
    pub fn new(bssid: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            bssid: bssid.into(),
            essid: None,
            associated: false,
            current_trial: None,
            countdown: None,
            percent: 0.0,
            speed_secs: 0,
            projected_finish: None,
            tail: VecDeque::with_capacity(LOG_TAIL_LEN),
            visible: visibility == Visibility::Immediate,
            visibility,
            generation: 0,
        }
    }

    pub fn apply(&mut self, event: &Event, now: DateTime<Utc>) -> PanelUpdate {
        match event {
            Event::RawLine(line) => self.on_line(line),
            Event::Associated => self.on_associated(),
            Event::EssidFound(essid) => self.on_essid(essid),
            Event::TrialAttempted(pin) => self.on_trial(pin),
            Event::SpeedMeasured(secs) => self.on_speed(*secs),
            Event::PercentUpdated(percent) => self.on_percent(*percent, now),
            Event::LockWaitStarted(secs) => self.on_lock_wait(*secs, now),
        }
    }

    fn on_line(&mut self, line: &str) -> PanelUpdate {
        if self.tail.len() == LOG_TAIL_LEN {
            self.tail.pop_front();
        }
        self.tail.push_back(line.to_string());
        PanelUpdate::redraw()
    }

    fn on_associated(&mut self) -> PanelUpdate {
        if self.associated {
            return PanelUpdate::default();
        }
        self.associated = true;
        PanelUpdate::redraw()
    }

    fn on_essid(&mut self, essid: &str) -> PanelUpdate {
        self.essid = Some(essid.to_string());
        let mut update = PanelUpdate::redraw();
        if !self.visible && self.visibility == Visibility::OnEssid {
            self.visible = true;
            update.revealed = true;
        }
        update
    }

    /// Shows a hidden panel regardless of its visibility rule. Returns true
    /// only when the panel was hidden.
    pub fn reveal(&mut self) -> bool {
        if self.visible {
            return false;
        }
        self.visible = true;
        true
    }

    fn on_trial(&mut self, pin: &str) -> PanelUpdate {
        self.current_trial = Some(pin.to_string());
        PanelUpdate::redraw()
    }

    fn on_speed(&mut self, secs: u64) -> PanelUpdate {
        self.speed_secs = secs;
        PanelUpdate::default()
    }

    // With no speed yet the previous projection is left in place.
    fn on_percent(&mut self, percent: f64, now: DateTime<Utc>) -> PanelUpdate {
        self.percent = percent;
        if let Some(finish) = project_finish(now, self.speed_secs, percent) {
            self.projected_finish = Some(finish);
        }
        PanelUpdate::redraw()
    }

    fn on_lock_wait(&mut self, secs: u64, now: DateTime<Utc>) -> PanelUpdate {
        self.generation += 1;
        let seconds = clamp_wait(secs);
        self.countdown = Some(Countdown::start(now, seconds, self.generation));
        PanelUpdate {
            redraw: true,
            revealed: false,
            countdown: Some(CountdownRequest {
                generation: self.generation,
                seconds,
            }),
        }
    }

    pub fn is_current_countdown(&self, generation: u64) -> bool {
        self.countdown
            .map(|countdown| countdown.generation == generation)
            .unwrap_or(false)
    }

    /// Clears the countdown if `generation` is still the active one.
    pub fn expire_countdown(&mut self, generation: u64) -> bool {
        if !self.is_current_countdown(generation) {
            return false;
        }
        self.countdown = None;
        true
    }

    pub fn lock_label(&self, now: DateTime<Utc>) -> String {
        match &self.countdown {
            Some(countdown) => countdown.label(now),
            None => IDLE_LOCK_LABEL.to_string(),
        }
    }

    pub fn percent_label(&self) -> String {
        format!("{}%", self.percent)
    }

    pub fn gauge_percent(&self) -> u16 {
        self.percent.round().clamp(0.0, 100.0) as u16
    }

    pub fn finish_label(&self) -> String {
        self.projected_finish
            .map(|finish| finish.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_default()
    }

    pub fn essid_label(&self) -> String {
        format!("({})", self.essid.as_deref().unwrap_or_default())
    }

    pub fn trial_label(&self) -> &str {
        self.current_trial.as_deref().unwrap_or_default()
    }
}

/// Projected completion: `speed * 100 * (100 - percent)` seconds from `now`.
pub fn project_finish(now: DateTime<Utc>, speed_secs: u64, percent: f64) -> Option<DateTime<Utc>> {
    if speed_secs == 0 {
        return None;
    }
    let millis = speed_secs as f64 * 100.0 * (100.0 - percent) * 1_000.0;
    let delta = Duration::try_milliseconds(millis.round() as i64)?;
    now.checked_add_signed(delta)
}
