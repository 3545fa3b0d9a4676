use crate::event::Event;
use crate::panel::{PanelState, PanelUpdate, Visibility};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(pub usize);

/// All panels of a run plus the order in which they became visible.
#[derive(Debug, Default)]
pub struct Dashboard {
    panels: Vec<PanelState>,
    stack: Vec<PanelId>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_panel(&mut self, bssid: impl Into<String>, visibility: Visibility) -> PanelId {
        let id = PanelId(self.panels.len());
        let panel = PanelState::new(bssid, visibility);
        if panel.visible {
            self.stack.push(id);
        }
        self.panels.push(panel);
        id
    }

    pub fn apply(&mut self, id: PanelId, event: &Event, now: DateTime<Utc>) -> PanelUpdate {
        let Some(panel) = self.panels.get_mut(id.0) else {
            return PanelUpdate::default();
        };
        let update = panel.apply(event, now);
        if update.revealed {
            self.stack.push(id);
        }
        update
    }

    /// Pushes a hidden panel onto the visible stack. Returns false for an
    /// unknown or already visible panel.
    pub fn reveal(&mut self, id: PanelId) -> bool {
        let revealed = self
            .panels
            .get_mut(id.0)
            .map(PanelState::reveal)
            .unwrap_or(false);
        if revealed {
            self.stack.push(id);
        }
        revealed
    }

    pub fn panel(&self, id: PanelId) -> Option<&PanelState> {
        self.panels.get(id.0)
    }

    pub fn panel_mut(&mut self, id: PanelId) -> Option<&mut PanelState> {
        self.panels.get_mut(id.0)
    }

    pub fn visible(&self) -> impl Iterator<Item = &PanelState> {
        self.stack.iter().filter_map(|id| self.panels.get(id.0))
    }

    pub fn visible_len(&self) -> usize {
        self.stack.len()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn stack_follows_reveal_order() {
        let mut dashboard = Dashboard::new();
        let first = dashboard.add_panel("00:00:00:00:00:01", Visibility::OnEssid);
        let second = dashboard.add_panel("00:00:00:00:00:02", Visibility::OnEssid);
        assert_eq!(dashboard.len(), 2);
        assert_eq!(dashboard.visible_len(), 0);

        dashboard.apply(second, &Event::EssidFound("Second".to_string()), now());
        dashboard.apply(first, &Event::EssidFound("First".to_string()), now());
        dashboard.apply(second, &Event::EssidFound("Second".to_string()), now());

        let order: Vec<&str> = dashboard.visible().map(|p| p.bssid.as_str()).collect();
        assert_eq!(order, vec!["00:00:00:00:00:02", "00:00:00:00:00:01"]);
    }

    #[test]
    fn immediate_panels_are_stacked_on_creation() {
        let mut dashboard = Dashboard::new();
        dashboard.add_panel("00:00:00:00:00:01", Visibility::Immediate);
        dashboard.add_panel("00:00:00:00:00:02", Visibility::Immediate);
        assert_eq!(dashboard.visible_len(), 2);
    }

    #[test]
    fn forced_reveal_joins_stack_once() {
        let mut dashboard = Dashboard::new();
        let id = dashboard.add_panel("00:00:00:00:00:01", Visibility::OnEssid);
        assert!(dashboard.reveal(id));
        assert!(!dashboard.reveal(id));
        dashboard.apply(id, &Event::EssidFound("Lab".to_string()), now());
        assert_eq!(dashboard.visible_len(), 1);
        assert!(!dashboard.reveal(PanelId(9)));
    }

    #[test]
    fn unknown_panel_is_ignored() {
        let mut dashboard = Dashboard::new();
        let update = dashboard.apply(PanelId(7), &Event::Associated, now());
        assert_eq!(update, PanelUpdate::default());
        assert!(dashboard.is_empty());
    }
}
