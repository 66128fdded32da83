//! Task list rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use super::theme;
use crate::app::{App, Focus};
use crate::persistence::PersistenceAdapter;

/// Render the task list with checkboxes.
pub fn render<P: PersistenceAdapter>(frame: &mut Frame, area: Rect, app: &App<P>) {
    let items: Vec<ListItem> = app
        .store
        .tasks()
        .iter()
        .map(|task| {
            let checkbox = if task.completed { "[✓]" } else { "[ ]" };
            let style = if task.completed {
                theme::completed()
            } else {
                theme::normal()
            };

            ListItem::new(Line::from(vec![
                Span::styled(checkbox, style),
                Span::raw(" "),
                Span::styled(task.name.as_str(), style),
            ]))
        })
        .collect();

    let focused = app.focus == Focus::List && app.dialog().is_none();
    let block = Block::default()
        .title(Span::styled("Tasks", theme::panel_title(theme::TASKS_TITLE)))
        .borders(Borders::ALL)
        .border_style(theme::border(focused));

    let list = if items.is_empty() {
        List::new([ListItem::new(Span::styled(
            "No tasks yet",
            theme::dimmed(),
        ))])
        .block(block)
    } else {
        List::new(items)
            .block(block)
            .highlight_style(theme::selected())
    };

    let mut state = ListState::default().with_selected(
        (focused && !app.store.tasks().is_empty()).then_some(app.selected),
    );
    frame.render_stateful_widget(list, area, &mut state);
}
