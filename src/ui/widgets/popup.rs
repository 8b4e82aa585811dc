// src/ui/widgets/popup.rs

use crate::app::{App, Popup};
use crate::ui::widgets::report_view::report_header;
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Renders the active popup, if any, on top of the existing UI.
///
/// The report viewer takes most of the screen and scrolls with the arrow
/// keys. Confirmations are small centered boxes answered with Y or N.
///
/// # Arguments
///
/// * `frame` - The frame to render onto.
/// * `app` - Application state; nothing is drawn when `app.popup` is `None`.
/// * `area` - The full terminal area the popup is centered in.
pub fn render_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(popup) = &app.popup else {
        return;
    };

    let (popup_area, widget) = match popup {
        Popup::ViewReport { content, scroll } => {
            let block = Block::default()
                .title(format!("Reporte: {}", content.name))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan));
            let p = Paragraph::new(report_header(content))
                .block(block)
                .wrap(Wrap { trim: false })
                .scroll((*scroll, 0));
            (centered_rect(85, 85, area), p)
        }
        Popup::ConfirmDelete { name, .. } => (
            centered_rect(50, 25, area),
            confirm(format!("¿Eliminar el reporte {}?", name)),
        ),
        Popup::ConfirmClear { count } => (
            centered_rect(50, 25, area),
            confirm(format!("¿Eliminar los {} reportes? Esta acción no se puede deshacer.", count)),
        ),
    };

    // Clear first so the background does not bleed through.
    frame.render_widget(Clear, popup_area);
    frame.render_widget(widget, popup_area);
}

fn confirm(question: String) -> Paragraph<'static> {
    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(question, Style::new().bold())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Y", Style::new().bold().fg(Color::Yellow)),
            Span::raw(" sí   "),
            Span::styled("N", Style::new().bold().fg(Color::Yellow)),
            Span::raw(" no"),
        ]),
    ]);
    let block = Block::default()
        .title("Confirmar")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
}

/// Returns a rectangle centered in `r`, sized as a percentage of it.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
