use regex::{Captures, Regex};
use std::collections::HashMap;
use tracing::debug;

/// Column layout of an access-point row in the monitor's channel-locked
/// listing: BSSID, PWR, RXQ, Beacons, #Data, #/s, CH, MB, ENC, CIPHER, AUTH.
const TARGET_ROW_PATTERN: &str = r"([0-9A-F:]+)\s+([0-9\-]+)\s+([0-9\-]+)\s+([0-9\-]+)\s+([0-9]+)\s+([0-9]+)\s+([0-9]+)\s+(.+?)\s+(WPA.+?)\s+(.+?)\s+(.+?)\s+";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRecord {
    pub bssid: String,
    pub power: i32,
    pub rx_quality: i32,
    pub beacons: i64,
    pub data: u64,
    pub data_rate: u32,
    pub channel: u32,
    pub link_speed: String,
    pub encryption: String,
    pub cipher: String,
    pub auth: String,
}

impl TargetRecord {
    fn counters_differ(&self, other: &TargetRecord) -> bool {
        self.beacons != other.beacons || self.data != other.data
    }
}

/// Turns monitor output lines into target announcements.
///
/// A record is announced when its BSSID has never been seen or when its
/// beacon/data counters moved since the last matching line. The cache is
/// refreshed on every match, announced or not.
pub struct EventExtractor {
    pattern: Regex,
    cache: HashMap<String, TargetRecord>,
}

impl Default for EventExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EventExtractor {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(TARGET_ROW_PATTERN).expect("valid regex"),
            cache: HashMap::new(),
        }
    }

    pub fn push_line(&mut self, line: &str) -> Option<TargetRecord> {
        let record = self.parse_line(line)?;
        let announce = match self.cache.get(&record.bssid) {
            Some(cached) => cached.counters_differ(&record),
            None => true,
        };
        self.cache.insert(record.bssid.clone(), record.clone());
        announce.then_some(record)
    }

    pub fn parse_line(&self, line: &str) -> Option<TargetRecord> {
        let captures = self.pattern.captures(line)?;
        let record = record_from_captures(&captures);
        if record.is_none() {
            debug!("target_row_malformed: {line}");
        }
        record
    }

    pub fn cached(&self, bssid: &str) -> Option<&TargetRecord> {
        self.cache.get(bssid)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

fn record_from_captures(captures: &Captures<'_>) -> Option<TargetRecord> {
    let text = |idx: usize| captures.get(idx).map(|m| m.as_str()).unwrap_or_default();
    Some(TargetRecord {
        bssid: text(1).to_string(),
        power: text(2).parse().ok()?,
        rx_quality: text(3).parse().ok()?,
        beacons: text(4).parse().ok()?,
        data: text(5).parse().ok()?,
        data_rate: text(6).parse().ok()?,
        channel: text(7).parse().ok()?,
        link_speed: text(8).to_string(),
        encryption: text(9).to_string(),
        cipher: text(10).to_string(),
        auth: text(11).to_string(),
    })
}
