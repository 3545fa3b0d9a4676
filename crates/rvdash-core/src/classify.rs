use crate::event::Event;
use regex::Regex;
use tracing::debug;

/// Stateless matcher for attack-process status lines.
///
/// Every line yields [`Event::RawLine`] first, followed by any events whose
/// pattern matches. Patterns are independent, so one line may produce several
/// events. A numeric capture that does not parse drops only that event.
pub struct LineClassifier {
    associated: Regex,
    trying: Regex,
    speed: Regex,
    percent: Regex,
    waiting: Regex,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LineClassifier {
    pub fn new() -> Self {
        Self {
            associated: Regex::new(r"Associated with \S+(?: \(ESSID: (.+)\))?").expect("valid regex"),
            trying: Regex::new(r"Trying pin ([0-9]+)").expect("valid regex"),
            speed: Regex::new(r"([0-9]+) seconds/pin").expect("valid regex"),
            percent: Regex::new(r"([0-9.]+)% complete").expect("valid regex"),
            waiting: Regex::new(r"waiting ([0-9]+) seconds before").expect("valid regex"),
        }
    }

    pub fn classify(&self, line: &str) -> Vec<Event> {
        let mut events = vec![Event::RawLine(line.to_string())];

        if let Some(captures) = self.associated.captures(line) {
            events.push(Event::Associated);
            if let Some(essid) = captures.get(1) {
                events.push(Event::EssidFound(essid.as_str().to_string()));
            }
        }

        if let Some(pin) = first_capture(&self.trying, line) {
            events.push(Event::TrialAttempted(pin.to_string()));
        }

        if let Some(raw) = first_capture(&self.speed, line) {
            match raw.parse::<u64>() {
                Ok(secs) => events.push(Event::SpeedMeasured(secs)),
                Err(_) => debug!("speed_malformed: {raw}"),
            }
        }

        if let Some(raw) = first_capture(&self.percent, line) {
            match parse_percent(raw) {
                Some(percent) => events.push(Event::PercentUpdated(percent)),
                None => debug!("percent_malformed: {raw}"),
            }
        }

        if let Some(raw) = first_capture(&self.waiting, line) {
            match raw.parse::<u64>() {
                Ok(secs) => events.push(Event::LockWaitStarted(secs)),
                Err(_) => debug!("lock_wait_malformed: {raw}"),
            }
        }

        events
    }
}

fn first_capture<'a>(pattern: &Regex, line: &'a str) -> Option<&'a str> {
    pattern
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

fn parse_percent(raw: &str) -> Option<f64> {
    let value = raw.parse::<f64>().ok()?;
    (0.0..=100.0).contains(&value).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(line: &str) -> Vec<Event> {
        LineClassifier::new().classify(line)
    }

    fn raw(line: &str) -> Event {
        Event::RawLine(line.to_string())
    }

    #[test]
    fn trying_pin_keeps_leading_zeros() {
        let line = "[+] Trying pin 01234567";
        assert_eq!(
            classify(line),
            vec![raw(line), Event::TrialAttempted("01234567".to_string())]
        );
        assert_eq!(
            classify("Trying pin 12345678"),
            vec![raw("Trying pin 12345678"), Event::TrialAttempted("12345678".to_string())]
        );
    }

    #[test]
    fn speed_line() {
        let line = "[+] 0.05% complete @ 2026-10-17 12:00:00 (1 seconds/pin)";
        let events = classify(line);
        assert_eq!(
            events,
            vec![raw(line), Event::SpeedMeasured(1), Event::PercentUpdated(0.05)]
        );
        assert_eq!(
            classify("1 seconds/pin"),
            vec![raw("1 seconds/pin"), Event::SpeedMeasured(1)]
        );
    }

    #[test]
    fn percent_line() {
        assert_eq!(
            classify("42.50% complete"),
            vec![raw("42.50% complete"), Event::PercentUpdated(42.5)]
        );
    }

    #[test]
    fn waiting_line() {
        let line = "[!] WARNING: Detected AP rate limiting, waiting 60 seconds before re-checking";
        assert_eq!(classify(line), vec![raw(line), Event::LockWaitStarted(60)]);
        assert_eq!(
            classify("waiting 60 seconds before"),
            vec![raw("waiting 60 seconds before"), Event::LockWaitStarted(60)]
        );
    }

    #[test]
    fn association_with_essid() {
        let line = "Associated with 00:11:22:33:44:55 (ESSID: TestNet)";
        assert_eq!(
            classify(line),
            vec![raw(line), Event::Associated, Event::EssidFound("TestNet".to_string())]
        );
    }

    #[test]
    fn association_keeps_parentheses_inside_essid() {
        let line = "[+] Associated with 00:11:22:33:44:55 (ESSID: Guest (5G))";
        assert_eq!(
            classify(line),
            vec![raw(line), Event::Associated, Event::EssidFound("Guest (5G)".to_string())]
        );
    }

    #[test]
    fn association_without_essid_only_signals_join() {
        let line = "[+] Associated with 00:11:22:33:44:55";
        assert_eq!(classify(line), vec![raw(line), Event::Associated]);
    }

    #[test]
    fn unmatched_line_is_raw_only() {
        let line = "[+] Sending EAPOL START request";
        assert_eq!(classify(line), vec![raw(line)]);
    }

    #[test]
    fn malformed_percent_is_skipped() {
        assert_eq!(classify("1.2.3% complete"), vec![raw("1.2.3% complete")]);
        assert_eq!(classify(".% complete"), vec![raw(".% complete")]);
        assert_eq!(classify("180.5% complete"), vec![raw("180.5% complete")]);
    }

    #[test]
    fn overflowing_wait_is_skipped() {
        let line = "waiting 99999999999999999999999 seconds before";
        assert_eq!(classify(line), vec![raw(line)]);
    }

    #[test]
    fn event_kinds_are_stable() {
        assert_eq!(Event::Associated.kind(), "associated");
        assert_eq!(Event::LockWaitStarted(3).to_string(), "lock-wait-started: 3s");
    }
}
