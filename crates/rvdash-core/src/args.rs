/// Ordered command-line arguments made of flag/value pairs.
///
/// A pair without a value renders as a single bare argument, which also
/// covers plain positionals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessArgs {
    pairs: Vec<(String, Option<String>)>,
}

impl ProcessArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bare(mut self, flag: impl Into<String>) -> Self {
        self.pairs.push((flag.into(), None));
        self
    }

    pub fn pair(mut self, flag: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((flag.into(), Some(value.into())));
        self
    }

    pub fn to_argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.pairs.len() * 2);
        for (flag, value) in &self.pairs {
            argv.push(flag.clone());
            if let Some(value) = value {
                argv.push(value.clone());
            }
        }
        argv
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Arguments for the channel-locked monitor listing.
pub fn monitor_args(interface: &str, channel: &str) -> ProcessArgs {
    ProcessArgs::new().pair("-c", channel).bare(interface)
}

/// Arguments for one verbose attack run against `bssid`.
pub fn attack_args(interface: &str, channel: &str, bssid: &str) -> ProcessArgs {
    ProcessArgs::new()
        .bare("-vv")
        .pair("-i", interface)
        .pair("-c", channel)
        .pair("-b", bssid)
}
