use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState},
};

use crate::{
    app::{Focus, ViewState},
    ui::theme::Theme,
};

const COLUMNS: [&str; 5] = ["ID", "Amount", "Category", "Date", "Description"];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &ViewState, theme: &Theme) {
    let focused = state.focus == Focus::Table;
    let rows = state
        .rows()
        .into_iter()
        .map(|row| {
            Row::new(vec![
                Cell::from(row.id.to_string()),
                Cell::from(row.amount),
                Cell::from(row.category),
                Cell::from(row.date),
                Cell::from(row.description),
            ])
        })
        .collect::<Vec<_>>();
    let has_rows = !rows.is_empty();

    let header = Row::new(COLUMNS).style(
        Style::default()
            .fg(theme.dim)
            .add_modifier(Modifier::BOLD),
    );
    let widths = [
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Length(16),
        Constraint::Length(12),
        Constraint::Min(10),
    ];

    let border = if focused {
        theme.border_focused
    } else {
        theme.border
    };
    let title = format!(" transactions (last {}) ", state.visible_rows);
    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(theme.accent)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    let mut table_state = TableState::default();
    if has_rows && focused {
        table_state.select(Some(state.selected));
    }
    frame.render_stateful_widget(table, area, &mut table_state);
}
