use ratatui::{style::Style, text::Span};

use crate::{
    app::{Focus, ViewState},
    ui::theme::Theme,
};

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

/// Hints for the current focus; the retry hint only shows while a
/// retryable failure is on screen.
pub fn hints_for(state: &ViewState) -> Vec<KeyHint> {
    if state.pending.is_some() {
        return vec![KeyHint::new("Esc", "stop waiting"), KeyHint::new("Ctrl+C", "quit")];
    }

    let mut hints = match state.focus {
        Focus::Table => vec![
            KeyHint::new("↑↓", "select"),
            KeyHint::new("e", "edit"),
            KeyHint::new("d", "delete"),
            KeyHint::new("l", "load"),
            KeyHint::new("x", "export"),
            KeyHint::new("Tab", "form"),
        ],
        Focus::Form(field) if field.is_text() => vec![
            KeyHint::new("Enter", "save"),
            KeyHint::new("Tab", "next"),
            KeyHint::new("Esc", "cancel"),
        ],
        Focus::Form(_) => vec![
            KeyHint::new("←→", "change"),
            KeyHint::new("Enter", "save"),
            KeyHint::new("Tab", "next"),
            KeyHint::new("Esc", "cancel"),
        ],
    };

    let retryable = state
        .status
        .as_ref()
        .is_some_and(|status| status.retry.is_some());
    if retryable && !state.focus.is_text() {
        hints.push(KeyHint::new("r", "retry"));
    }
    if !state.focus.is_text() {
        hints.push(KeyHint::new("q", "quit"));
    }
    hints
}

/// Converts a list of key hints into styled spans for rendering.
pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}
