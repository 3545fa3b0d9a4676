use crate::cli::{DiscoveryArgs, TargetsArgs};
use rvdash_core::RvdashError;
use std::{env, path::PathBuf};

pub const DEFAULT_MONITOR_BIN: &str = "airodump-ng";
pub const DEFAULT_ATTACK_BIN: &str = "reaver";
pub const DEFAULT_INTERFACE: &str = "mon0";
pub const DEFAULT_CHANNEL: &str = "6";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Discovery,
    Targets(Vec<String>),
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Discovery => "discovery",
            Mode::Targets(_) => "targets",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub mode: Mode,
    pub interface: String,
    pub channel: String,
    pub monitor_bin: String,
    pub attack_bin: String,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_discovery(args: DiscoveryArgs) -> Result<Self, RvdashError> {
        let config = Self {
            mode: Mode::Discovery,
            interface: args.interface,
            channel: args.channel,
            monitor_bin: resolve_value(&args.monitor_bin, env_value("RVDASH_MONITOR_BIN"), DEFAULT_MONITOR_BIN),
            attack_bin: resolve_value(&args.attack_bin, env_value("RVDASH_ATTACK_BIN"), DEFAULT_ATTACK_BIN),
            log_dir: resolve_log_dir(&args.log_dir, env_value("RVDASH_LOG_DIR")),
        };
        config.validate()
    }

    pub fn from_targets(args: TargetsArgs) -> Result<Self, RvdashError> {
        let config = Self {
            mode: Mode::Targets(args.targets),
            interface: resolve_value(&args.interface, env_value("RVDASH_INTERFACE"), DEFAULT_INTERFACE),
            channel: resolve_value(&args.channel, env_value("RVDASH_CHANNEL"), DEFAULT_CHANNEL),
            monitor_bin: resolve_value("", env_value("RVDASH_MONITOR_BIN"), DEFAULT_MONITOR_BIN),
            attack_bin: resolve_value(&args.attack_bin, env_value("RVDASH_ATTACK_BIN"), DEFAULT_ATTACK_BIN),
            log_dir: resolve_log_dir(&args.log_dir, env_value("RVDASH_LOG_DIR")),
        };
        config.validate()
    }

    fn validate(self) -> Result<Self, RvdashError> {
        if self.interface.trim().is_empty() {
            return Err(RvdashError::Config("interface must not be empty".to_string()));
        }
        if self.channel.trim().is_empty() {
            return Err(RvdashError::Config("channel must not be empty".to_string()));
        }
        if let Mode::Targets(targets) = &self.mode {
            if let Some(blank) = targets.iter().position(|target| target.trim().is_empty()) {
                return Err(RvdashError::Config(format!("target #{} is empty", blank + 1)));
            }
        }
        Ok(self)
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Flag wins over environment, environment over the built-in default.
fn resolve_value(flag: &str, env_value: Option<String>, default: &str) -> String {
    if !flag.trim().is_empty() {
        return flag.trim().to_string();
    }
    match env_value {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => default.to_string(),
    }
}

fn resolve_log_dir(flag: &str, env_value: Option<String>) -> Option<PathBuf> {
    let value = resolve_value(flag, env_value, "");
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}
