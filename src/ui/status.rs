use log::Level;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::Theme;
use crate::app::{AppMode, Route};
use crate::logging::FlashMessage;

const NAVIGATION_HINTS: &[(&[&str], &str)] = &[
    (&["Tab"], "next page"),
    (&["?"], "help"),
    (&["q"], "quit"),
];

const PERIODS_HINTS: &[(&[&str], &str)] = &[
    (&["j", "k"], "move"),
    (&["a"], "add"),
    (&["e"], "edit"),
    (&["d"], "delete"),
    (&["Tab"], "next page"),
    (&["?"], "help"),
    (&["q"], "quit"),
];

const FORM_HINTS: &[(&[&str], &str)] = &[
    (&["Tab"], "switch field"),
    (&["Enter"], "confirm"),
    (&["Esc"], "close"),
];

const ALERT_HINTS: &[(&[&str], &str)] = &[(&["any key"], "back to form")];

const HELP_HINTS: &[(&[&str], &str)] = &[
    (&["j", "k"], "scroll"),
    (&["?", "Esc"], "close help"),
];

fn hints_for(mode: AppMode, route: Route) -> &'static [(&'static [&'static str], &'static str)] {
    match mode {
        AppMode::Normal if route == Route::Periods => PERIODS_HINTS,
        AppMode::Normal => NAVIGATION_HINTS,
        AppMode::Form => FORM_HINTS,
        AppMode::Alert => ALERT_HINTS,
        AppMode::Help => HELP_HINTS,
    }
}

/// Render keyboard hints bar showing mode-specific shortcuts
pub fn render_keyboard_hints(
    frame: &mut Frame,
    area: Rect,
    mode: AppMode,
    route: Route,
    theme: &Theme,
) {
    let mut hints = Vec::new();

    for (keys, description) in hints_for(mode, route) {
        for (i, key) in keys.iter().enumerate() {
            if i > 0 {
                hints.push(Span::styled("/", theme.status_desc.add_modifier(Modifier::DIM)));
            }
            hints.push(Span::styled(*key, theme.status_key));
        }

        hints.push(Span::raw(" "));
        hints.push(Span::styled(*description, theme.status_desc));
        hints.push(Span::raw("  "));
    }

    let paragraph =
        Paragraph::new(Line::from(hints)).style(theme.status_desc.bg(theme.status_bar_bg));

    frame.render_widget(paragraph, area);
}

/// Render the most recent flash message on a single line
pub fn render_flash_messages(
    frame: &mut Frame,
    area: Rect,
    messages: &[FlashMessage],
    theme: &Theme,
) {
    let Some(latest) = messages.last() else {
        return;
    };

    let style = match latest.level {
        Level::Error => theme.flash_error,
        Level::Warn => theme.flash_warn,
        _ => theme.flash_info,
    };

    let mut spans = vec![Span::styled(latest.message.clone(), style)];
    if messages.len() > 1 {
        spans.push(Span::styled(
            format!("  (+{} more, c to clear)", messages.len() - 1),
            theme.status_desc.add_modifier(Modifier::DIM),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
