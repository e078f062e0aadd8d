use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{StatusLevel, ViewState},
    ui::theme::Theme,
};

/// One-line banner under the table. Failures stay until the next
/// successful command replaces them; a request in flight takes precedence.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &ViewState, theme: &Theme) {
    if let Some(operation) = state.pending {
        let line = Line::from(vec![
            Span::styled(
                format!("Waiting to {}...", operation.label()),
                Style::default().fg(theme.accent),
            ),
            Span::raw("  "),
            Span::styled("Esc", Style::default().fg(theme.accent)),
            Span::styled(" to stop waiting", Style::default().fg(theme.dim)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let Some(status) = state.status.as_ref() else {
        return;
    };

    let style = match status.level {
        StatusLevel::Info => Style::default().fg(theme.text),
        StatusLevel::Success => Style::default().fg(theme.positive),
        StatusLevel::Error => Style::default()
            .fg(theme.error)
            .add_modifier(Modifier::BOLD),
    };

    let mut spans = vec![Span::styled(status.message.clone(), style)];
    if status.retry.is_some() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("r", Style::default().fg(theme.accent)));
        spans.push(Span::styled(" to retry", Style::default().fg(theme.dim)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
