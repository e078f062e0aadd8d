pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    text::Line,
    widgets::Paragraph,
};

use crate::app::ViewState;

pub use terminal::{
    AppTerminal as Terminal, CrosstermKeys, KeySource, restore_terminal, setup_terminal,
};
pub use theme::Theme;

const FORM_WIDTH: u16 = 44;

pub fn render(frame: &mut Frame<'_>, state: &ViewState) {
    let theme = Theme::default();
    let area = frame.area();

    // Balance, content, status banner, key hints
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    components::balance::render(
        frame,
        layout[0],
        state.balance(),
        state.store.len(),
        &theme,
    );

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(FORM_WIDTH)])
        .split(layout[1]);
    screens::transactions::render(frame, content[0], state, &theme);
    screens::form::render(frame, content[1], state, &theme);

    components::status::render(frame, layout[2], state, &theme);

    let hints = components::hints::hints_for(state);
    let bar = Paragraph::new(Line::from(components::hints::hints_to_spans(&hints, &theme)));
    frame.render_widget(bar, layout[3]);
}
