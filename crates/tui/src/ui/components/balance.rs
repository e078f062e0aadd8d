use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::{balance::Balance, ui::theme::Theme};

/// Balance header. A negative balance switches to the negative color.
pub fn render(frame: &mut Frame<'_>, area: Rect, balance: Balance, count: usize, theme: &Theme) {
    let amount_style = if balance.is_negative() {
        Style::default()
            .fg(theme.negative)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
    };

    let line = Line::from(vec![
        Span::styled("Balance", Style::default().fg(theme.dim)),
        Span::raw(": "),
        Span::styled(balance.to_string(), amount_style),
        Span::raw("   "),
        Span::styled("Transactions", Style::default().fg(theme.dim)),
        Span::raw(format!(": {count}")),
    ]);

    let block = Block::default()
        .title(Span::styled(" budget ", Style::default().fg(theme.accent)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    frame.render_widget(Paragraph::new(line).block(block), area);
}
