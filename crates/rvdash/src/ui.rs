use crate::theme::{self, icons};
use chrono::{DateTime, SecondsFormat, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Gauge, Paragraph},
    Frame,
};
use rvdash_core::{panel::LOG_TAIL_LEN, Dashboard, PanelState};

pub const HEADER_HEIGHT: u16 = 2;
/// Info row, progress row, log tail and a blank separator.
pub const PANEL_HEIGHT: u16 = 2 + LOG_TAIL_LEN as u16 + 1;

const BSSID_WIDTH: usize = 18;
const TRIAL_WIDTH: usize = 9;
const LOCK_WIDTH: usize = 5;
const FINISH_WIDTH: usize = 25;
const PERCENT_WIDTH: u16 = 7;

pub fn render(f: &mut Frame, dashboard: &Dashboard, now: DateTime<Utc>) {
    let area = f.size();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    f.render_widget(render_clock(now), layout[0]);
    render_panels(f, dashboard, now, layout[1]);
    f.render_widget(render_footer(dashboard), layout[2]);
}

fn render_clock(now: DateTime<Utc>) -> Paragraph<'static> {
    Paragraph::new(now.to_rfc3339_opts(SecondsFormat::Millis, true))
        .style(theme::CLOCK_STYLE)
        .alignment(Alignment::Center)
}

fn render_footer(dashboard: &Dashboard) -> Paragraph<'static> {
    Paragraph::new(format!(
        "{} targets  {} shown  q quit",
        dashboard.len(),
        dashboard.visible_len()
    ))
    .style(theme::FOOTER_STYLE)
}

fn render_panels(f: &mut Frame, dashboard: &Dashboard, now: DateTime<Utc>, area: Rect) {
    if dashboard.visible_len() == 0 {
        let waiting = Paragraph::new("waiting for targets...")
            .style(theme::FOOTER_STYLE)
            .alignment(Alignment::Center);
        f.render_widget(waiting, area);
        return;
    }

    let bottom = area.y.saturating_add(area.height);
    let mut y = area.y;
    for panel in dashboard.visible() {
        if y.saturating_add(PANEL_HEIGHT) > bottom {
            break;
        }
        render_panel(f, panel, now, Rect::new(area.x, y, area.width, PANEL_HEIGHT));
        y += PANEL_HEIGHT;
    }
}

fn render_panel(f: &mut Frame, panel: &PanelState, now: DateTime<Utc>, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(LOG_TAIL_LEN as u16),
            Constraint::Min(0),
        ])
        .split(area);

    f.render_widget(Paragraph::new(info_line(panel, now)), rows[0]);

    let progress = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(PERCENT_WIDTH)])
        .split(rows[1]);
    let gauge = Gauge::default()
        .gauge_style(theme::GAUGE_STYLE)
        .percent(panel.gauge_percent())
        .label(Span::raw(""))
        .use_unicode(true);
    f.render_widget(gauge, progress[0]);
    f.render_widget(
        Paragraph::new(panel.percent_label())
            .style(theme::PERCENT_STYLE)
            .alignment(Alignment::Right),
        progress[1],
    );

    let tail: Vec<Line> = panel.tail.iter().map(|line| Line::from(line.as_str())).collect();
    f.render_widget(Paragraph::new(Text::from(tail)).style(theme::TAIL_STYLE), rows[2]);
}

fn info_line(panel: &PanelState, now: DateTime<Utc>) -> Line<'static> {
    let marker = if panel.associated {
        icons::ASSOCIATED
    } else {
        icons::PENDING
    };
    Line::from(vec![
        Span::styled(fit(&panel.bssid, BSSID_WIDTH), theme::BSSID_STYLE),
        Span::styled(fit(panel.trial_label(), TRIAL_WIDTH), theme::TRIAL_STYLE),
        Span::styled(
            fit(&panel.lock_label(now), LOCK_WIDTH),
            theme::lock_style(panel.countdown.is_some()),
        ),
        Span::styled(fit(&panel.finish_label(), FINISH_WIDTH), theme::FINISH_STYLE),
        Span::styled(format!("{marker} "), theme::ESSID_STYLE),
        Span::styled(panel.essid_label(), theme::ESSID_STYLE),
    ])
}

/// Pads or truncates to exactly `width` columns.
fn fit(text: &str, width: usize) -> String {
    let clipped: String = text.chars().take(width).collect();
    format!("{clipped:<width$}")
}
