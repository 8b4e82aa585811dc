// src/ui/widgets/footer.rs

use crate::app::{App, Focus, Popup};
use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

fn key(label: &str) -> Span<'_> {
    Span::styled(label, Style::new().bold().fg(Color::Yellow))
}

/// Renders the footer bar with the keys available in the current context.
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let spans = match (&app.popup, app.focus) {
        (Some(Popup::ViewReport { .. }), _) => Line::from(vec![
            key("↑↓"),
            Span::raw(" scroll, "),
            key("Esc"),
            Span::raw(" close"),
        ]),
        (Some(_), _) => Line::from(vec![
            key("Y"),
            Span::raw(" confirm, "),
            key("N/Esc"),
            Span::raw(" cancel"),
        ]),
        (None, Focus::Form(_)) => Line::from(vec![
            key("Tab"),
            Span::raw(" next, "),
            key("←→"),
            Span::raw(" change, "),
            key("Space"),
            Span::raw(" toggle, "),
            key("Enter/F5"),
            Span::raw(" scan, "),
            key("F6"),
            Span::raw(" stop, "),
            key("F4"),
            Span::raw(" advanced, "),
            key("F9"),
            Span::raw(" logs, "),
            key("F10"),
            Span::raw(" quit"),
        ]),
        (None, Focus::Reports) => Line::from(vec![
            key("↑↓"),
            Span::raw(" select, "),
            key("Enter"),
            Span::raw(" view, "),
            key("D"),
            Span::raw("ownload, "),
            key("X"),
            Span::raw(" delete, "),
            key("C"),
            Span::raw("lear all, "),
            key("F2"),
            Span::raw(" refresh, "),
            key("F3"),
            Span::raw(" export, "),
            key("F10"),
            Span::raw(" quit"),
        ]),
    };

    let footer = Paragraph::new(spans).alignment(Alignment::Center);
    frame.render_widget(footer, area);
}
