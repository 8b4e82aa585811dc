// src/ui/widgets/form.rs

use crate::app::{App, Focus, FormField};
use crate::core::options;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

const LABEL_WIDTH: usize = 18;

fn field_label(field: FormField) -> &'static str {
    match field {
        FormField::Host => "Host",
        FormField::Ports => "Puertos",
        FormField::Scripts => "Scripts",
        FormField::ScanType => "Tipo de escaneo",
        FormField::Speed => "Velocidad",
        FormField::OsDetection => "Detección de SO",
        FormField::VersionDetection => "Detección de versión",
        FormField::Fragmentation => "Fragmentar paquetes",
        FormField::FirewallEvasion => "Evasión (señuelos)",
        FormField::ExtraArgs => "Argumentos extra",
    }
}

fn field_value(app: &App, field: FormField) -> String {
    let check = |on: bool| (if on { "[x]" } else { "[ ]" }).to_string();
    match field {
        FormField::Host => app.form.host.clone(),
        FormField::Ports => app.form.ports.clone(),
        FormField::Scripts => format!("‹ {} ›", app.form.scripts),
        FormField::ScanType => match app.form.scan_type {
            Some(scan_type) => format!("‹ {} ›", scan_type.label()),
            None => "‹ ? ›".to_string(),
        },
        FormField::Speed => format!("‹ {} ›", app.form.speed.label()),
        FormField::OsDetection => check(app.form.os_detection),
        FormField::VersionDetection => check(app.form.version_detection),
        FormField::Fragmentation => check(app.form.fragmentation),
        FormField::FirewallEvasion => check(app.form.firewall_evasion),
        FormField::ExtraArgs => app.form.extra_args.clone(),
    }
}

/// Renders the scan form.
///
/// Each visible field is drawn on its own row. The focused one is
/// highlighted and text fields show a cursor. The advanced section is only
/// listed when expanded. The argument string the current form compiles to is
/// previewed underneath, so the operator sees what will be sent.
///
/// # Arguments
///
/// * `frame` - The frame to render onto.
/// * `app` - Application state; the form values and the focus are read from it.
/// * `area` - The `Rect` in which to render the form.
pub fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.show_advanced { "Escaneo (avanzado)" } else { "Escaneo" };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let focused = match app.focus {
        Focus::Form(field) => Some(field),
        Focus::Reports => None,
    };

    let mut lines = Vec::new();
    let mut cursor = None;
    for (row, field) in app.visible_fields().into_iter().enumerate() {
        if row == 4 {
            lines.push(Line::from("── Opciones avanzadas ──".dark_gray()));
        }
        let is_focused = focused == Some(field);
        let label_style = if is_focused {
            Style::new().bold().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let value = field_value(app, field);
        if is_focused && field.is_text() {
            cursor = Some((LABEL_WIDTH + 2 + value.chars().count(), lines.len()));
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{:<width$}", field_label(field), width = LABEL_WIDTH), label_style),
            Span::raw("  "),
            Span::styled(value, Style::default().fg(Color::White)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from("Argumentos:".bold()));
    lines.push(Line::from(Span::styled(
        options::compile_arguments(&app.form),
        Style::default().fg(Color::Cyan),
    )));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);

    if let Some((x, y)) = cursor {
        let x = inner.x.saturating_add(x as u16).min(inner.right().saturating_sub(1));
        let y = inner.y.saturating_add(y as u16);
        if y < inner.bottom() && app.popup.is_none() {
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}
