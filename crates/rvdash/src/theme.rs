use ratatui::style::{Color, Modifier, Style};

pub const CLOCK_STYLE: Style = Style::new()
    .fg(Color::Rgb(191, 219, 254))
    .add_modifier(Modifier::BOLD);
pub const BSSID_STYLE: Style = Style::new().fg(Color::Rgb(226, 232, 240));
pub const TRIAL_STYLE: Style = Style::new()
    .fg(Color::Rgb(56, 189, 248))
    .add_modifier(Modifier::BOLD);
pub const FINISH_STYLE: Style = Style::new().fg(Color::Rgb(148, 163, 184));
pub const ESSID_STYLE: Style = Style::new()
    .fg(Color::Rgb(142, 192, 124))
    .add_modifier(Modifier::BOLD);
pub const TAIL_STYLE: Style = Style::new().fg(Color::Rgb(148, 163, 184));
pub const GAUGE_STYLE: Style = Style::new()
    .fg(Color::Rgb(34, 197, 94))
    .bg(Color::Rgb(17, 26, 46));
pub const PERCENT_STYLE: Style = Style::new().fg(Color::Rgb(226, 232, 240));
pub const FOOTER_STYLE: Style = Style::new().fg(Color::Rgb(71, 85, 105));

pub mod icons {
    pub const ASSOCIATED: &str = "*";
    pub const PENDING: &str = " ";
}

pub fn lock_style(locked: bool) -> Style {
    if locked {
        Style::new()
            .fg(Color::Rgb(245, 158, 11))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::new().fg(Color::Rgb(71, 85, 105))
    }
}
