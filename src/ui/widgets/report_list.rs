// src/ui/widgets/report_list.rs

use crate::app::{App, Focus};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

/// Renders the saved reports.
///
/// With more than one report a final "delete all" row is appended. An empty
/// list shows a placeholder instead. The selection lives in
/// `app.report_list_state`, which is why the app is borrowed mutably.
///
/// # Arguments
///
/// * `frame` - The frame to render onto.
/// * `app` - Application state holding the reports and the list state.
/// * `area` - The `Rect` in which to render the list.
pub fn render_report_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let border_style = if app.focus == Focus::Reports {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!("Reportes ({})", app.reports.len()));

    if let Some(error) = &app.reports_error {
        let p = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)).block(block);
        frame.render_widget(p, area);
        return;
    }
    if app.reports.is_empty() {
        let p = Paragraph::new("No hay reportes disponibles")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(p, area);
        return;
    }

    let mut items: Vec<ListItem> = app
        .reports
        .iter()
        .map(|report| {
            let target = if report.ports.is_empty() {
                report.host.clone()
            } else {
                format!("{}:{}", report.host, report.ports)
            };
            ListItem::new(Line::from(vec![
                Span::styled(report.name.clone(), Style::default().fg(Color::Cyan)),
                Span::raw("  "),
                Span::styled(report.created_at.clone(), Style::default().fg(Color::DarkGray)),
                Span::raw(format!("  {}  {:.2} KB", target, report.size_kb())),
            ]))
        })
        .collect();

    if app.reports.len() > 1 {
        items.push(ListItem::new(Line::from(Span::styled(
            format!("🗑 Eliminar todos los reportes ({})", app.reports.len()),
            Style::default().fg(Color::Red),
        ))));
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(list, area, &mut app.report_list_state);
}
