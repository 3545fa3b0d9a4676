use clap::Parser;

/// Discover WPS targets on a channel and attack each one as it appears.
#[derive(Parser, Debug)]
#[command(name = "rvdash")]
pub struct DiscoveryArgs {
    /// Monitor-mode wireless interface.
    pub interface: String,
    /// Channel to lock the monitor and attacks to.
    pub channel: String,
    #[arg(long, default_value = "")]
    pub monitor_bin: String,
    #[arg(long, default_value = "")]
    pub attack_bin: String,
    #[arg(long, default_value = "")]
    pub log_dir: String,
}

/// Attack a fixed list of targets without running a monitor.
#[derive(Parser, Debug)]
#[command(name = "rvdash-targets")]
pub struct TargetsArgs {
    /// BSSIDs to attack.
    #[arg(required = true, num_args = 1..)]
    pub targets: Vec<String>,
    #[arg(long, default_value = "")]
    pub interface: String,
    #[arg(long, default_value = "")]
    pub channel: String,
    #[arg(long, default_value = "")]
    pub attack_bin: String,
    #[arg(long, default_value = "")]
    pub log_dir: String,
}
