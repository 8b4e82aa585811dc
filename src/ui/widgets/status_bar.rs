// src/ui/widgets/status_bar.rs

use crate::app::{App, StatusKind, SPINNER_CHARS};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// Renders the status line, with a spinner while a scan is running.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Estado");

    let Some(status) = &app.status else {
        frame.render_widget(block, area);
        return;
    };

    let (prefix, color) = match status.kind {
        StatusKind::Info => ("ℹ ".to_string(), Color::Cyan),
        StatusKind::Scanning => (format!("{} ", SPINNER_CHARS[app.spinner_frame]), Color::Yellow),
        StatusKind::Completed => ("✓ ".to_string(), Color::Green),
        StatusKind::Error => ("✗ ".to_string(), Color::Red),
    };

    let line = Line::from(vec![
        Span::styled(prefix, Style::default().fg(color)),
        Span::styled(status.text.as_str(), Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(line).block(block.border_style(Style::default().fg(color))), area);
}
