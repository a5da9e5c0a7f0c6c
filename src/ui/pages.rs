use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Tabs, Wrap};

use super::Theme;
use crate::app::Route;

/// Render the navigation tab bar
pub fn render_tabs(frame: &mut Frame, area: Rect, route: Route, theme: &Theme) {
    let titles: Vec<Line> = Route::all()
        .iter()
        .enumerate()
        .map(|(i, r)| Line::from(format!("{} {}", i + 1, r.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(route.index())
        .style(theme.tab_inactive)
        .highlight_style(theme.tab_active)
        .divider(Span::styled("│", theme.tab_divider));

    frame.render_widget(tabs, area);
}

/// Render the static home page
pub fn render_home(frame: &mut Frame, area: Rect, record_count: usize, theme: &Theme) {
    let lines = vec![
        Line::from(Span::styled("Period registry", theme.page_title)),
        Line::default(),
        Line::from(Span::styled(
            "Keep track of academic periods and the coordinator responsible for each one.",
            theme.page_text,
        )),
        Line::default(),
        Line::from(Span::styled(
            format!("{} period(s) registered. Press 2 to open the list.", record_count),
            theme.page_text,
        )),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

/// Render the static about page
pub fn render_about(frame: &mut Frame, area: Rect, storage: &str, theme: &Theme) {
    let lines = vec![
        Line::from(Span::styled("About", theme.page_title)),
        Line::default(),
        Line::from(Span::styled(
            format!("periodr {}", env!("CARGO_PKG_VERSION")),
            theme.page_text,
        )),
        Line::from(Span::styled(env!("CARGO_PKG_DESCRIPTION"), theme.page_text)),
        Line::default(),
        Line::from(vec![
            Span::styled("Storage: ", theme.help_footer),
            Span::styled(storage.to_string(), theme.page_text),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}
