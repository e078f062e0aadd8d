use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::{
    app::{Focus, ViewState},
    form::{FormField, FormMode},
    ui::theme::Theme,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &ViewState, theme: &Theme) {
    let form = &state.form;
    let title = match form.mode() {
        FormMode::Create => " new transaction ".to_string(),
        FormMode::Edit(id) => format!(" edit transaction {id} "),
    };

    let kind_label = match form.kind {
        api_types::transaction::TransactionKind::Expense => "Expense",
        _ => "Income",
    };
    let category = form
        .selected_category()
        .map(|option| option.label)
        .unwrap_or("-");

    let mut lines = vec![
        field_line("Type", &format!("‹ {kind_label} ›"), FormField::Type, state, theme),
        field_line("Category", &format!("‹ {category} ›"), FormField::Category, state, theme),
        field_line("Amount", &form.amount, FormField::Amount, state, theme),
        field_line("Description", &form.description, FormField::Description, state, theme),
        Line::from(""),
    ];

    match &form.error {
        Some(err) => lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(theme.error),
        ))),
        None => lines.push(Line::from(Span::styled(
            "Enter saves, Esc cancels",
            Style::default().fg(theme.dim),
        ))),
    }

    let focused = matches!(state.focus, Focus::Form(_));
    let border = if focused {
        theme.border_focused
    } else {
        theme.border
    };
    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(theme.accent)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_line(
    label: &'static str,
    value: &str,
    field: FormField,
    state: &ViewState,
    theme: &Theme,
) -> Line<'static> {
    let focused = state.focus == Focus::Form(field);
    let marker = if focused { "› " } else { "  " };
    let value_style = if focused {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    let cursor = if focused && field.is_text() { "_" } else { "" };

    Line::from(vec![
        Span::styled(marker, Style::default().fg(theme.accent)),
        Span::styled(format!("{label:<12}"), Style::default().fg(theme.dim)),
        Span::styled(format!("{value}{cursor}"), value_style),
    ])
}
