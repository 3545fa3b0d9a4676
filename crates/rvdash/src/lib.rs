pub mod cli;
pub mod config;
pub mod logging;
pub mod runtime;
pub mod source;
pub mod terminal;
pub mod theme;
pub mod ui;

use crate::config::Config;
use crate::runtime::DashboardRuntime;
use anyhow::Context;
use crossterm::event::EventStream;
use rvdash_core::RvdashError;

/// Runs the dashboard until the user quits.
pub async fn run(config: Config) -> anyhow::Result<()> {
    logging::init_logging(&config);
    tracing::info!(
        mode = config.mode.label(),
        interface = %config.interface,
        channel = %config.channel,
        "dashboard_starting"
    );

    let (mut runtime, rx) = DashboardRuntime::new(config);
    runtime
        .start()
        .context("failed to start supervised processes")?;

    let mut surface = terminal::enter_terminal().context("failed to prepare terminal")?;
    let result = runtime.run(rx, &mut surface, EventStream::new()).await;
    let restored = terminal::restore_terminal(&mut surface);
    settle(result, restored)
}

/// The loop's own error wins; a restore failure is reported only when the
/// loop ended cleanly.
fn settle(result: Result<(), RvdashError>, restored: std::io::Result<()>) -> anyhow::Result<()> {
    if let Err(err) = &restored {
        tracing::warn!("terminal_restore_failed: {err}");
    }
    result.context("dashboard loop failed")?;
    restored.context("failed to restore terminal")
}
