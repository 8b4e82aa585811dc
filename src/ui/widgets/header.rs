// src/ui/widgets/header.rs

use crate::app::App;
use crate::core::health::HealthUpdate;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// Renders the title bar with the service connectivity indicator.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (dot, color) = match &app.connection {
        Some(HealthUpdate::Online { .. }) => ("●", Color::Green),
        Some(HealthUpdate::Offline(_)) => ("●", Color::Red),
        None => ("○", Color::DarkGray),
    };

    let mut spans = vec![
        Span::styled(" Scan Console ", Style::new().bold().fg(Color::Cyan)),
        Span::raw("  API: "),
        Span::styled(format!("{} ", dot), Style::default().fg(color)),
        Span::styled(app.connection_label(), Style::default().fg(color)),
    ];
    if app.degraded {
        spans.push(Span::styled("  (conectividad degradada)", Style::default().fg(Color::Yellow)));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}
