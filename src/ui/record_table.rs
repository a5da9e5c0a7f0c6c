use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};

use super::Theme;
use crate::models::Record;
use crate::models::record::truncate_to_width;

/// Width of the actions column ("e edit  d delete")
const ACTIONS_COL_WIDTH: u16 = 17;

/// Build one row per record: label, email, actions
fn build_rows<'a>(
    records: &'a [Record],
    selected: usize,
    label_width: usize,
    theme: &'a Theme,
) -> Vec<Row<'a>> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let is_selected = i == selected;

            let label_style = if is_selected {
                theme.row_text_selected
            } else {
                theme.row_text
            };
            let label = Cell::from(Span::styled(record.label_preview(label_width), label_style));
            let email = Cell::from(Span::styled(record.email.as_str(), theme.row_email));

            let actions_style = if is_selected {
                theme.row_actions
            } else {
                theme.row_actions.add_modifier(Modifier::DIM)
            };
            let actions = Cell::from(Span::styled("e edit  d delete", actions_style));

            let row = Row::new(vec![label, email, actions]);
            if is_selected {
                row.style(Style::default().bg(theme.selection_bg))
            } else {
                row
            }
        })
        .collect()
}

/// Render the period list: header line with count, then the table
pub fn render_record_table(
    frame: &mut Frame,
    area: Rect,
    records: &[Record],
    selected: usize,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title + count
            Constraint::Length(1), // Spacing
            Constraint::Min(1),    // Table
        ])
        .split(area);

    let count_text = match records.len() {
        1 => "1 period".to_string(),
        n => format!("{} periods", n),
    };
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(count_text.len() as u16),
        ])
        .split(chunks[0]);

    frame.render_widget(
        Paragraph::new(Span::styled("Period registry", theme.page_title)),
        header_chunks[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(count_text, theme.table_item_count)),
        header_chunks[1],
    );

    if records.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No periods registered yet. Press 'a' to add one.",
                theme.empty_text,
            )),
            chunks[2],
        );
        return;
    }

    let label_width = (chunks[2].width.saturating_sub(ACTIONS_COL_WIDTH) / 2) as usize;
    let rows = build_rows(records, selected, label_width.saturating_sub(1), theme);

    let header = Row::new(vec![
        Cell::from("Period"),
        Cell::from("Coordinator email"),
        Cell::from("Actions"),
    ])
    .style(theme.table_header)
    .bottom_margin(1);

    let widths = [
        Constraint::Percentage(40),
        Constraint::Min(10),
        Constraint::Length(ACTIONS_COL_WIDTH),
    ];
    let table = Table::new(rows, widths).header(header).column_spacing(2);

    let mut table_state = TableState::default();
    table_state.select(Some(selected));

    frame.render_stateful_widget(table, chunks[2], &mut table_state);
}

/// Plain-text rendering used by the `list` command
pub fn format_record_lines(records: &[Record], label_width: usize) -> Vec<String> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let label = truncate_to_width(&r.name, label_width);
            format!("{:3}. {:<width$}  {}  (id {})", i + 1, label, r.email, r.id, width = label_width)
        })
        .collect()
}
