use crate::config::{Config, Mode};
use crate::source::{ProcessEventSource, Route};
use crate::terminal::Surface;
use chrono::{DateTime, Utc};
use crossterm::event::{Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::{Stream, StreamExt};
use ratatui::backend::Backend;
use rvdash_core::{
    args::{attack_args, monitor_args},
    panel::CountdownRequest,
    Dashboard, Event, EventExtractor, LineClassifier, PanelId, RvdashError, Visibility,
};
use std::{
    collections::{HashMap, HashSet},
    io,
    sync::Arc,
    time::Duration,
};
use tokio::{sync::mpsc, task::JoinHandle, time::Instant};
use tracing::{debug, info, warn};

const CHANNEL_CAPACITY: usize = 1024;
const CLOCK_TICK: Duration = Duration::from_secs(1);
const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub enum RuntimeMessage {
    MonitorLine(String),
    Panel {
        panel: PanelId,
        event: Event,
    },
    CountdownTick {
        panel: PanelId,
        generation: u64,
    },
    CountdownExpired {
        panel: PanelId,
        generation: u64,
    },
    Exited {
        route: Route,
        program: String,
        code: Option<i32>,
    },
}

/// Owns every piece of mutable dashboard state for one run.
///
/// All child output, timer callbacks and terminal input funnel into
/// [`DashboardRuntime::handle`] on a single task, one message at a time.
pub struct DashboardRuntime {
    config: Config,
    dashboard: Dashboard,
    extractor: EventExtractor,
    seen: HashSet<String>,
    classifier: Arc<LineClassifier>,
    countdowns: HashMap<PanelId, JoinHandle<()>>,
    sources: Vec<ProcessEventSource>,
    tx: mpsc::Sender<RuntimeMessage>,
}

impl DashboardRuntime {
    pub fn new(config: Config) -> (Self, mpsc::Receiver<RuntimeMessage>) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let runtime = Self {
            config,
            dashboard: Dashboard::new(),
            extractor: EventExtractor::new(),
            seen: HashSet::new(),
            classifier: Arc::new(LineClassifier::new()),
            countdowns: HashMap::new(),
            sources: Vec::new(),
            tx,
        };
        (runtime, rx)
    }

    /// Spawns the monitor in discovery mode, or every attack up front in
    /// targets mode.
    pub fn start(&mut self) -> Result<(), RvdashError> {
        match self.config.mode.clone() {
            Mode::Discovery => {
                let args = monitor_args(&self.config.interface, &self.config.channel);
                let source =
                    ProcessEventSource::monitor(&self.config.monitor_bin, &args, self.tx.clone())?;
                self.sources.push(source);
            }
            Mode::Targets(targets) => {
                for bssid in targets {
                    if self.seen.insert(bssid.clone()) {
                        self.add_target(&bssid, Visibility::Immediate);
                    }
                }
            }
        }
        Ok(())
    }

    /// Applies one message and reports whether the surface needs a redraw.
    pub fn handle(&mut self, message: RuntimeMessage, now: DateTime<Utc>) -> bool {
        match message {
            RuntimeMessage::MonitorLine(line) => self.discover(&line),
            RuntimeMessage::Panel { panel, event } => {
                debug!(?panel, event = %event, "panel_event");
                let update = self.dashboard.apply(panel, &event, now);
                if update.revealed {
                    info!(?panel, "panel_revealed");
                }
                if let Some(request) = update.countdown {
                    self.start_countdown(panel, request);
                }
                update.redraw
            }
            RuntimeMessage::CountdownTick { panel, generation } => self
                .dashboard
                .panel(panel)
                .map(|state| state.is_current_countdown(generation))
                .unwrap_or(false),
            RuntimeMessage::CountdownExpired { panel, generation } => {
                let cleared = self
                    .dashboard
                    .panel_mut(panel)
                    .map(|state| state.expire_countdown(generation))
                    .unwrap_or(false);
                if cleared {
                    self.countdowns.remove(&panel);
                }
                cleared
            }
            RuntimeMessage::Exited {
                route,
                program,
                code,
            } => {
                info!(?route, program = %program, ?code, "source_finished");
                false
            }
        }
    }

    fn discover(&mut self, line: &str) -> bool {
        let Some(record) = self.extractor.push_line(line) else {
            return false;
        };
        debug!(bssid = %record.bssid, beacons = record.beacons, data = record.data, "target_sighted");
        if !self.seen.insert(record.bssid.clone()) {
            return false;
        }
        info!(
            bssid = %record.bssid,
            channel = record.channel,
            encryption = %record.encryption,
            "target_discovered"
        );
        self.add_target(&record.bssid, Visibility::OnEssid);
        true
    }

    fn add_target(&mut self, bssid: &str, visibility: Visibility) -> PanelId {
        let panel = self.dashboard.add_panel(bssid, visibility);
        let args = attack_args(&self.config.interface, &self.config.channel, bssid);
        match ProcessEventSource::attack(
            &self.config.attack_bin,
            &args,
            panel,
            self.classifier.clone(),
            self.tx.clone(),
        ) {
            Ok(source) => self.sources.push(source),
            Err(err) => {
                warn!(bssid, "attack_spawn_failed: {err}");
                self.dashboard
                    .apply(panel, &Event::RawLine(err.to_string()), Utc::now());
                // No ESSID will ever arrive for a panel without a process.
                if self.dashboard.reveal(panel) {
                    info!(?panel, "panel_revealed");
                }
            }
        }
        panel
    }

    // A newer lock-wait replaces the running countdown rather than stacking.
    fn start_countdown(&mut self, panel: PanelId, request: CountdownRequest) {
        if let Some(previous) = self.countdowns.remove(&panel) {
            previous.abort();
            debug!(?panel, "countdown_reset");
        }
        info!(?panel, seconds = request.seconds, "countdown_started");
        let handle = spawn_countdown(self.tx.clone(), panel, request);
        self.countdowns.insert(panel, handle);
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub async fn run<B, S>(
        mut self,
        mut rx: mpsc::Receiver<RuntimeMessage>,
        surface: &mut Surface<B>,
        mut input: S,
    ) -> Result<(), RvdashError>
    where
        B: Backend,
        S: Stream<Item = io::Result<TermEvent>> + Unpin,
    {
        surface.prepare(&self.dashboard, Utc::now())?;
        let mut clock = tokio::time::interval(CLOCK_TICK);

        loop {
            tokio::select! {
                Some(message) = rx.recv() => {
                    if self.handle(message, Utc::now()) {
                        surface.redraw(&self.dashboard, Utc::now())?;
                    }
                }
                _ = clock.tick() => {
                    surface.redraw(&self.dashboard, Utc::now())?;
                }
                maybe_event = input.next() => {
                    match maybe_event {
                        Some(Ok(TermEvent::Key(key))) if is_quit_key(key) => break,
                        Some(Ok(TermEvent::Resize(cols, rows))) => {
                            debug!(cols, rows, "terminal_resized");
                            surface.resize(&self.dashboard, Utc::now())?;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(err)) => {
                            warn!("terminal_input_failed: {err}");
                            break;
                        }
                        None => break,
                    }
                }
            }
        }

        self.shutdown();
        Ok(())
    }

    fn shutdown(&mut self) {
        for (_, handle) in self.countdowns.drain() {
            handle.abort();
        }
        for source in &self.sources {
            debug!(program = source.program(), pid = ?source.pid(), "source_released");
        }
        info!(sources = self.sources.len(), "dashboard_closed");
    }
}

fn spawn_countdown(
    tx: mpsc::Sender<RuntimeMessage>,
    panel: PanelId,
    request: CountdownRequest,
) -> JoinHandle<()> {
    let generation = request.generation;
    tokio::spawn(async move {
        let start = Instant::now();
        let expiry = tokio::time::sleep_until(start + Duration::from_secs(request.seconds));
        tokio::pin!(expiry);
        let mut ticker = tokio::time::interval_at(start + COUNTDOWN_TICK, COUNTDOWN_TICK);
        loop {
            tokio::select! {
                biased;
                _ = &mut expiry => {
                    let _ = tx.send(RuntimeMessage::CountdownExpired { panel, generation }).await;
                    break;
                }
                _ = ticker.tick() => {
                    if tx.send(RuntimeMessage::CountdownTick { panel, generation }).await.is_err() {
                        break;
                    }
                }
            }
        }
    })
}

fn is_quit_key(key: KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rvdash_core::countdown::IDLE_LOCK_LABEL;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn config(mode: Mode) -> Config {
        Config {
            mode,
            interface: "mon0".to_string(),
            channel: "6".to_string(),
            monitor_bin: "/nonexistent/rvdash-monitor".to_string(),
            attack_bin: "true".to_string(),
            log_dir: None,
        }
    }

    fn row(bssid: &str, beacons: u32) -> String {
        format!(" {bssid}  -45  100  {beacons:>7}       15    0   6  54e  WPA2 CCMP   PSK  HomeNet")
    }

    #[tokio::test]
    async fn resighted_target_spawns_one_attack() {
        let (mut runtime, _rx) = DashboardRuntime::new(config(Mode::Discovery));

        assert!(runtime.handle(RuntimeMessage::MonitorLine(row("00:11:22:33:44:55", 10)), now()));
        assert!(!runtime.handle(RuntimeMessage::MonitorLine(row("00:11:22:33:44:55", 10)), now()));
        assert!(!runtime.handle(RuntimeMessage::MonitorLine(row("00:11:22:33:44:55", 11)), now()));
        assert!(!runtime.handle(RuntimeMessage::MonitorLine("garbage".to_string()), now()));

        assert_eq!(runtime.source_count(), 1);
        assert_eq!(runtime.dashboard().len(), 1);
        assert_eq!(runtime.dashboard().visible_len(), 0);

        assert!(runtime.handle(RuntimeMessage::MonitorLine(row("AA:BB:CC:DD:EE:FF", 1)), now()));
        assert_eq!(runtime.source_count(), 2);
    }

    #[tokio::test]
    async fn discovered_panel_appears_on_first_essid() {
        let (mut runtime, _rx) = DashboardRuntime::new(config(Mode::Discovery));
        runtime.handle(RuntimeMessage::MonitorLine(row("00:11:22:33:44:55", 10)), now());

        let panel = PanelId(0);
        runtime.handle(
            RuntimeMessage::Panel {
                panel,
                event: Event::EssidFound("TestNet".to_string()),
            },
            now(),
        );
        assert_eq!(runtime.dashboard().visible_len(), 1);
    }

    #[tokio::test]
    async fn monitor_output_drives_discovery_end_to_end() {
        let script = format!(
            "printf '%s\\n%s\\n%s\\n' '{}' '{}' 'CH  6 ][ Elapsed: 1 s' >&2",
            row("00:11:22:33:44:55", 10),
            row("00:11:22:33:44:55", 10)
        );
        let mut config = config(Mode::Discovery);
        config.monitor_bin = "sh".to_string();
        config.channel = script;

        let (mut runtime, mut rx) = DashboardRuntime::new(config);
        runtime.start().expect("monitor spawns");

        let drive = async {
            let mut monitor_done = false;
            while !(monitor_done && runtime.dashboard().len() > 0) {
                let message = rx.recv().await.expect("runtime keeps a sender");
                if let RuntimeMessage::Exited {
                    route: Route::Monitor,
                    ..
                } = &message
                {
                    monitor_done = true;
                }
                runtime.handle(message, Utc::now());
            }
            while let Ok(Some(message)) =
                tokio::time::timeout(Duration::from_millis(300), rx.recv()).await
            {
                runtime.handle(message, Utc::now());
            }
        };
        tokio::time::timeout(Duration::from_secs(10), drive)
            .await
            .expect("monitor exits");

        assert_eq!(runtime.dashboard().len(), 1);
        assert_eq!(runtime.source_count(), 2);
    }

    #[tokio::test]
    async fn missing_monitor_is_fatal() {
        let (mut runtime, _rx) = DashboardRuntime::new(config(Mode::Discovery));
        assert!(matches!(runtime.start(), Err(RvdashError::Spawn { .. })));
    }

    #[tokio::test]
    async fn targets_mode_shows_every_panel_immediately() {
        let targets = vec![
            "00:11:22:33:44:55".to_string(),
            "AA:BB:CC:DD:EE:FF".to_string(),
            "00:11:22:33:44:55".to_string(),
        ];
        let (mut runtime, _rx) = DashboardRuntime::new(config(Mode::Targets(targets)));
        runtime.start().expect("targets start");

        assert_eq!(runtime.dashboard().len(), 2);
        assert_eq!(runtime.dashboard().visible_len(), 2);
        assert_eq!(runtime.source_count(), 2);
    }

    #[tokio::test]
    async fn failed_attack_spawn_is_shown_in_panel_tail() {
        let mut config = config(Mode::Targets(vec!["00:11:22:33:44:55".to_string()]));
        config.attack_bin = "/nonexistent/rvdash-attack".to_string();
        let (mut runtime, _rx) = DashboardRuntime::new(config);
        runtime.start().expect("attack failures are not fatal");

        let panel = runtime.dashboard().panel(PanelId(0)).expect("panel exists");
        assert_eq!(runtime.source_count(), 0);
        assert!(panel
            .tail
            .back()
            .map(|line| line.contains("/nonexistent/rvdash-attack"))
            .unwrap_or(false));
    }

    #[tokio::test]
    async fn failed_attack_spawn_reveals_discovered_panel() {
        let mut config = config(Mode::Discovery);
        config.attack_bin = "/nonexistent/rvdash-attack".to_string();
        let (mut runtime, _rx) = DashboardRuntime::new(config);

        assert!(runtime.handle(RuntimeMessage::MonitorLine(row("00:11:22:33:44:55", 10)), now()));
        assert_eq!(runtime.source_count(), 0);
        assert_eq!(runtime.dashboard().visible_len(), 1);

        let panel = runtime.dashboard().panel(PanelId(0)).expect("panel exists");
        assert!(panel.visible);
        assert!(panel
            .tail
            .back()
            .map(|line| line.contains("/nonexistent/rvdash-attack"))
            .unwrap_or(false));
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_ticks_each_second_then_expires() {
        let (tx, mut rx) = mpsc::channel(64);
        let request = CountdownRequest {
            generation: 4,
            seconds: 10,
        };
        let started = Instant::now();
        spawn_countdown(tx, PanelId(1), request);

        let mut ticks = 0;
        loop {
            match rx.recv().await.expect("countdown message") {
                RuntimeMessage::CountdownTick { generation, .. } => {
                    assert_eq!(generation, 4);
                    ticks += 1;
                }
                RuntimeMessage::CountdownExpired { panel, generation } => {
                    assert_eq!(panel, PanelId(1));
                    assert_eq!(generation, 4);
                    break;
                }
                other => panic!("unexpected message: {other:?}"),
            }
        }
        assert_eq!(ticks, 9);
        assert!(started.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test]
    async fn fresh_lock_wait_shows_full_duration() {
        let (mut runtime, _rx) = DashboardRuntime::new(config(Mode::Targets(vec![
            "00:11:22:33:44:55".to_string(),
        ])));
        runtime.start().expect("targets start");
        let panel = PanelId(0);

        assert!(runtime.handle(
            RuntimeMessage::Panel {
                panel,
                event: Event::LockWaitStarted(4),
            },
            now(),
        ));
        let state = runtime.dashboard().panel(panel).expect("panel exists");
        let labels: Vec<String> = (0..4)
            .map(|sec| state.lock_label(now() + chrono::Duration::milliseconds(sec * 1_000 + 5)))
            .collect();
        assert_eq!(labels, vec!["[4]", "[3]", "[2]", "[1]"]);
    }

    #[tokio::test]
    async fn new_lock_wait_resets_countdown() {
        let (mut runtime, _rx) = DashboardRuntime::new(config(Mode::Targets(vec![
            "00:11:22:33:44:55".to_string(),
        ])));
        runtime.start().expect("targets start");
        let panel = PanelId(0);

        runtime.handle(
            RuntimeMessage::Panel {
                panel,
                event: Event::LockWaitStarted(60),
            },
            now(),
        );
        runtime.handle(
            RuntimeMessage::Panel {
                panel,
                event: Event::LockWaitStarted(10),
            },
            now(),
        );
        assert_eq!(runtime.countdowns.len(), 1);

        assert!(!runtime.handle(RuntimeMessage::CountdownExpired { panel, generation: 1 }, now()));
        assert!(!runtime.handle(RuntimeMessage::CountdownTick { panel, generation: 1 }, now()));
        assert!(runtime.handle(RuntimeMessage::CountdownTick { panel, generation: 2 }, now()));
        assert!(runtime.handle(RuntimeMessage::CountdownExpired { panel, generation: 2 }, now()));

        let state = runtime.dashboard().panel(panel).expect("panel exists");
        assert_eq!(state.lock_label(now()), IDLE_LOCK_LABEL);
        assert!(runtime.countdowns.is_empty());
    }

    #[test]
    fn quit_keys() {
        assert!(is_quit_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
    }
}
