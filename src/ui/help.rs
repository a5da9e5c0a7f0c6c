use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use super::Theme;
use super::layout::centered_rect;

/// Height reserved for help modal padding (2 top + 2 bottom)
const HELP_MODAL_PADDING: u16 = 4;

struct HelpSection {
    title: &'static str,
    items: &'static [(&'static [&'static str], &'static str)],
}

const HELP_SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "Navigation",
        items: &[
            (&["Tab", "Shift-Tab"], "Next/previous page"),
            (&["1", "2", "3"], "Home / Periods / About"),
            (&["k", "↑", "j", "↓"], "Move up/down"),
            (&["Home", "End"], "Jump to first/last period"),
        ],
    },
    HelpSection {
        title: "Periods",
        items: &[
            (&["a"], "Add a period"),
            (&["e", "Enter"], "Edit selected period"),
            (&["d", "Del"], "Delete selected period"),
        ],
    },
    HelpSection {
        title: "Form",
        items: &[
            (&["Tab", "↑", "↓"], "Switch field"),
            (&["Enter"], "Add / save changes"),
            (&["Esc"], "Close without saving"),
        ],
    },
    HelpSection {
        title: "General",
        items: &[
            (&["c"], "Clear flash messages"),
            (&["?"], "Show/hide this help"),
            (&["q", "Esc"], "Quit"),
        ],
    },
];

/// Add help content with proper styling and fixed-width columns
fn add_help_content(content: &mut Vec<Line<'_>>, section: &HelpSection, theme: &Theme) {
    const KEY_COLUMN_WIDTH: usize = 20;

    content.push(Line::from(vec![Span::styled(
        section.title,
        theme.help_header,
    )]));
    content.push(Line::default());

    for (keys, description) in section.items {
        let mut line_spans = Vec::new();
        for (i, key) in keys.iter().enumerate() {
            if i > 0 {
                line_spans.push(Span::styled(
                    "/",
                    theme.help_desc.add_modifier(Modifier::DIM),
                ));
            }
            line_spans.push(Span::styled(*key, theme.help_key));
        }

        let keys_width = keys.iter().map(|k| k.width()).sum::<usize>() + keys.len().saturating_sub(1);
        let padding = KEY_COLUMN_WIDTH.saturating_sub(keys_width);

        line_spans.push(Span::raw(" ".repeat(padding)));
        line_spans.push(Span::styled(*description, theme.help_desc));

        content.push(Line::from(line_spans));
    }

    content.push(Line::default());
}

/// Render help overlay with keybindings
/// Returns (clamped_scroll, max_scroll) to prevent scroll from going out of bounds
pub fn render_help_overlay(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    scroll: usize,
) -> (usize, usize) {
    let overlay_area = centered_rect(60, 80, area);

    frame.render_widget(Clear, overlay_area);

    let mut content = Vec::new();
    content.push(Line::from(vec![Span::styled("Help", theme.help_title)]));
    content.push(Line::default());

    for section in HELP_SECTIONS {
        add_help_content(&mut content, section, theme);
    }

    content.push(Line::from(vec![Span::styled(
        "Press ?/Esc to close, j/k to scroll",
        theme.help_footer,
    )]));

    let available_height = overlay_area.height.saturating_sub(HELP_MODAL_PADDING) as usize;
    let max_scroll = content.len().saturating_sub(available_height);
    let clamped_scroll = scroll.min(max_scroll);

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .style(Style::default().bg(theme.modal_bg))
                .padding(ratatui::widgets::Padding::uniform(2)),
        )
        .scroll((clamped_scroll as u16, 0))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, overlay_area);

    (clamped_scroll, max_scroll)
}
