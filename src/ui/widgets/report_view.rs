// src/ui/widgets/report_view.rs

use crate::app::{App, ScanPhase, SPINNER_CHARS};
use crate::core::models::ReportContent;
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Metadata lines shown above a report body.
pub fn report_header(report: &ReportContent) -> Vec<Line<'_>> {
    let meta = |label: &'static str, value: &str| {
        Line::from(vec![
            Span::styled(format!("{:<9}", label), Style::default().fg(Color::DarkGray)),
            Span::raw(value.to_string()),
        ])
    };
    let mut lines = vec![
        meta("Host", &report.host),
        meta("Puertos", &report.ports),
        meta("Fecha", &report.created_at),
    ];
    if let Some(scan_type) = &report.scan_type {
        lines.push(meta("Tipo", scan_type));
    }
    if let Some(scripts) = &report.scripts {
        lines.push(meta("Scripts", scripts));
    }
    lines.push(Line::from(""));
    lines.extend(report.content.lines().map(Line::from));
    lines
}

/// Renders the panel holding the most recently completed scan report.
///
/// # Arguments
///
/// * `frame` - The frame to render onto.
/// * `app` - Application state; `app.last_report` and its scroll offset are read.
/// * `area` - The `Rect` in which to render the panel.
pub fn render_report_view(frame: &mut Frame, app: &App, area: Rect) {
    let title = match &app.last_report {
        Some(report) => format!("Último reporte: {} (PgUp/PgDn)", report.name),
        None => "Último reporte".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let paragraph = match (&app.last_report, app.phase) {
        (Some(report), _) => Paragraph::new(report_header(report))
            .wrap(Wrap { trim: false })
            .scroll((app.report_scroll, 0)),
        (None, ScanPhase::Idle) => Paragraph::new("Los resultados del escaneo aparecerán aquí...")
            .alignment(Alignment::Center),
        (None, _) => Paragraph::new(Line::from(vec![
            Span::styled(format!("{} ", SPINNER_CHARS[app.spinner_frame]), Style::default().fg(Color::Cyan)),
            Span::raw("Escaneando... espera por favor."),
        ]))
        .alignment(Alignment::Center),
    };

    frame.render_widget(paragraph.block(block), area);
}
