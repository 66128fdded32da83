//! Terminal UI rendering.

pub mod dialog;
pub mod input_panel;
pub mod status_bar;
pub mod task_panel;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::App;
use crate::persistence::PersistenceAdapter;

/// Main draw function for the entire UI.
pub fn draw<P: PersistenceAdapter>(frame: &mut Frame, app: &App<P>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Input + error line
            Constraint::Min(3),    // Task list
            Constraint::Length(1), // Summary
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    input_panel::render(frame, chunks[0], app);
    task_panel::render(frame, chunks[1], app);
    status_bar::render_summary(frame, chunks[2], app);
    status_bar::render(frame, chunks[3], app);

    // Dialogs draw last so they sit on top.
    dialog::render(frame, frame.area(), app);
}
