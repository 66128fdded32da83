//! Modal dialogs for renaming and deleting a task.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::theme;
use crate::app::{App, Dialog};
use crate::persistence::PersistenceAdapter;

const DIALOG_WIDTH: u16 = 50;

/// Render whichever dialog is open, centered over `area`.
pub fn render<P: PersistenceAdapter>(frame: &mut Frame, area: Rect, app: &App<P>) {
    match app.dialog() {
        Some(Dialog::Edit) => render_edit(frame, area, app),
        Some(Dialog::ConfirmDelete) => render_confirm_delete(frame, area, app),
        None => {}
    }
}

fn render_edit<P: PersistenceAdapter>(frame: &mut Frame, area: Rect, app: &App<P>) {
    let mut lines = vec![
        Line::from(Span::styled("Task name", theme::dimmed())),
        Line::from(vec![
            Span::styled(app.store.draft_name(), theme::normal()),
            Span::styled("█", theme::input_cursor()),
        ]),
    ];
    if let Some(err) = app.store.last_error() {
        lines.push(Line::from(Span::styled(err.to_string(), theme::error())));
    } else {
        lines.push(Line::default());
    }
    lines.push(Line::from(Span::styled(
        "Enter: update | Esc: cancel",
        theme::dimmed(),
    )));

    show(frame, area, "Update task", lines);
}

fn render_confirm_delete<P: PersistenceAdapter>(frame: &mut Frame, area: Rect, app: &App<P>) {
    let name = app
        .store
        .pending_delete()
        .and_then(|id| app.store.task(id))
        .map_or("this task", |t| t.name.as_str());

    let lines = vec![
        Line::from(vec![
            Span::raw("Delete "),
            Span::styled(format!("\"{name}\""), theme::bold()),
            Span::raw("?"),
        ]),
        Line::default(),
        Line::from(Span::styled("y/Enter: delete | n/Esc: cancel", theme::dimmed())),
    ];

    show(frame, area, "Confirm delete", lines);
}

fn show(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let rect = centered(area, DIALOG_WIDTH, height);

    let block = Block::default()
        .title(Span::styled(title, theme::bold()))
        .borders(Borders::ALL)
        .border_style(theme::highlighted());

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        rect,
    );
}

/// A `width` x `height` rectangle centered in `area`, clipped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
