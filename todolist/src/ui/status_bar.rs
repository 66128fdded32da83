//! Completion summary and status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, Dialog, Focus};
use crate::persistence::PersistenceAdapter;
use crate::tasks::CompletionSummary;

/// Text shown under the task list.
#[must_use]
pub fn summary_text(summary: CompletionSummary) -> String {
    if summary.is_all_done() {
        "All tasks completed".to_string()
    } else {
        format!("Completed: {}/{}", summary.completed, summary.total)
    }
}

/// Render the completion summary line.
pub fn render_summary<P: PersistenceAdapter>(frame: &mut Frame, area: Rect, app: &App<P>) {
    let summary = app.store.summary();
    let style = if summary.is_all_done() {
        theme::bold().fg(theme::SUCCESS)
    } else {
        theme::normal()
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(summary_text(summary), style))),
        area,
    );
}

/// Render the status bar at the bottom of the screen.
pub fn render<P: PersistenceAdapter>(frame: &mut Frame, area: Rect, app: &App<P>) {
    let help_text = match (app.dialog(), app.focus) {
        (Some(Dialog::Edit), _) => "Enter: update | Esc: cancel",
        (Some(Dialog::ConfirmDelete), _) => "y/Enter: delete | n/Esc: cancel",
        (None, Focus::Input) => "Enter: add | Tab: task list | Esc: quit",
        (None, Focus::List) if app.load_notice.is_some() => {
            "↑↓/jk: navigate | Space: toggle | e: edit | d: delete | x: dismiss | Tab: input | Esc: quit"
        }
        (None, Focus::List) => {
            "↑↓/jk: navigate | Space: toggle | e: edit | d: delete | Tab: input | Esc: quit"
        }
    };

    let mut spans = vec![
        Span::styled(
            concat!("Todolist v", env!("CARGO_PKG_VERSION")),
            theme::bold(),
        ),
        Span::raw(" | "),
    ];
    for notice in [&app.load_notice, &app.notice].into_iter().flatten() {
        spans.push(Span::styled(notice.as_str(), theme::normal().fg(theme::WARNING)));
        spans.push(Span::raw(" | "));
    }
    spans.push(Span::styled(help_text, theme::dimmed()));

    let paragraph = Paragraph::new(Line::from(spans)).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
