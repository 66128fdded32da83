//! New-task input box rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, Focus};
use crate::persistence::PersistenceAdapter;

/// Render the draft input box, with the last validation error underneath.
pub fn render<P: PersistenceAdapter>(frame: &mut Frame, area: Rect, app: &App<P>) {
    let focused = app.focus == Focus::Input && app.dialog().is_none();

    // The edit dialog shares the draft; keep this box empty meanwhile.
    let draft = if app.store.is_editing() {
        ""
    } else {
        app.store.draft_name()
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(draft, theme::normal()),
        Span::styled(if focused { "█" } else { "" }, theme::input_cursor()),
    ])];
    if !app.store.is_editing()
        && let Some(err) = app.store.last_error()
    {
        lines.push(Line::from(Span::styled(err.to_string(), theme::error())));
    }

    let block = Block::default()
        .title("New task")
        .borders(Borders::ALL)
        .border_style(theme::border(focused));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
