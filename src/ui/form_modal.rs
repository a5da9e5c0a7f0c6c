use ratatui::layout::{Constraint, Direction, Layout, Position};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};
use tui_input::Input;

use super::Theme;
use super::layout::centered_fixed_height;
use crate::models::{Field, FormState};

/// Height of the form modal including borders and padding
const FORM_HEIGHT: u16 = 13;

/// Context for rendering the form modal
pub struct FormRenderContext<'a> {
    pub state: FormState,
    pub name_input: &'a Input,
    pub email_input: &'a Input,
    pub focus: Field,
    pub theme: &'a Theme,
}

fn render_input(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    input: &Input,
    focused: bool,
    theme: &Theme,
) {
    let border_style = if focused {
        theme.form_input_focused_border
    } else {
        theme.form_input_border
    };

    // Keep the cursor in view for values wider than the box
    let inner_width = area.width.saturating_sub(2) as usize;
    let scroll = input.visual_scroll(inner_width.saturating_sub(1));

    let paragraph = Paragraph::new(input.value())
        .style(theme.form_input)
        .scroll((0, scroll as u16))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled(format!(" {} ", label), theme.form_label)),
        );
    frame.render_widget(paragraph, area);

    if focused {
        let cursor_x = area.x + 1 + (input.visual_cursor().saturating_sub(scroll)) as u16;
        frame.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

/// Render the create/edit form over the current page
pub fn render_form_modal(frame: &mut Frame, area: Rect, ctx: FormRenderContext) {
    let overlay_area = centered_fixed_height(60, FORM_HEIGHT, area);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(ctx.theme.form_input_border)
        .title(Span::styled(format!(" {} ", ctx.state.title()), ctx.theme.form_title))
        .style(Style::default().bg(ctx.theme.modal_bg))
        .padding(Padding::horizontal(2));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Spacing
            Constraint::Length(3), // Period input
            Constraint::Length(1), // Spacing
            Constraint::Length(3), // Email input
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Buttons
        ])
        .split(inner);

    render_input(
        frame,
        chunks[1],
        "Period",
        ctx.name_input,
        ctx.focus == Field::Name,
        ctx.theme,
    );
    render_input(
        frame,
        chunks[3],
        "Coordinator email",
        ctx.email_input,
        ctx.focus == Field::Email,
        ctx.theme,
    );

    let buttons = Line::from(vec![
        Span::styled("[Esc] Close", ctx.theme.form_button),
        Span::raw("   "),
        Span::styled(
            format!("[Enter] {}", ctx.state.confirm_label()),
            ctx.theme.form_button_primary,
        ),
    ])
    .alignment(Alignment::Right);
    frame.render_widget(Paragraph::new(buttons), chunks[5]);
}
