// src/ui/layout.rs

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen regions for every widget, computed once per frame.
pub struct AppLayout {
    pub header: Rect,
    pub form: Rect,
    pub report: Rect,
    pub reports: Rect,
    pub status: Rect,
    pub footer: Rect,
    pub log_panel: Rect,
}

/// Splits the frame into header, content, status line and footer.
///
/// The content row holds the scan form on the left and, on the right, the
/// last report above the report list. When `show_logs` is set a third
/// column is added for the log panel.
pub fn create_layout(frame_size: Rect, show_logs: bool) -> AppLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame_size);

    let content_constraints = if show_logs {
        vec![Constraint::Percentage(35), Constraint::Percentage(40), Constraint::Percentage(25)]
    } else {
        vec![Constraint::Percentage(40), Constraint::Percentage(60)]
    };

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(content_constraints)
        .split(main_chunks[1]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(content_chunks[1]);

    AppLayout {
        header: main_chunks[0],
        form: content_chunks[0],
        report: right_chunks[0],
        reports: right_chunks[1],
        status: main_chunks[2],
        footer: main_chunks[3],
        log_panel: if show_logs { content_chunks[2] } else { Rect::default() },
    }
}
