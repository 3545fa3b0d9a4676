use crate::config::Config;
use std::{
    env,
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// Stdout belongs to the dashboard, so records go either to
/// `<log_dir>/rvdash-<mode>.log` or nowhere.
pub fn init_logging(config: &Config) {
    let level = env::var("RVDASH_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file = config
        .log_dir
        .as_deref()
        .and_then(|dir| match open_log_file(dir, config.mode.label()) {
            Ok(file) => Some(file),
            Err(err) => {
                eprintln!("log_file_error: {err}");
                None
            }
        });

    match file {
        Some(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .try_init();
        }
    }
}

fn open_log_file(log_dir: &Path, mode: &str) -> io::Result<fs::File> {
    fs::create_dir_all(log_dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(log_dir, mode))
}

fn log_path(log_dir: &Path, mode: &str) -> PathBuf {
    log_dir.join(format!("rvdash-{}.log", sanitize_component(mode)))
}

fn sanitize_component(input: &str) -> String {
    input
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect()
}
