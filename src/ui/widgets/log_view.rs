// src/ui/widgets/log_view.rs

use crate::app::App;
use ratatui::{
    prelude::*,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation},
};

fn level_color(level: &str) -> Color {
    match level {
        "ERROR" => Color::Red,
        "WARN" => Color::Yellow,
        "INFO" => Color::Green,
        "DEBUG" => Color::Blue,
        _ => Color::Magenta,
    }
}

/// Styles one log line: gray timestamp, colored level, plain message.
/// Lines that do not look like `DATE TIME LEVEL MESSAGE` are left as-is.
fn style_log_line(line: &str) -> Line<'_> {
    let mut parts = line.splitn(3, ' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(date), Some(time), Some(rest)) => {
            let rest = rest.trim_start();
            let (level, message) = rest.split_once(' ').unwrap_or((rest, ""));
            Line::from(vec![
                Span::styled(format!("{} {} ", date, time), Style::default().fg(Color::DarkGray)),
                Span::styled(level.to_string(), Style::default().fg(level_color(level))),
                Span::raw(format!(" {}", message)),
            ])
        }
        _ => Line::from(line),
    }
}

/// Renders the log panel.
///
/// Shows the newest lines of the log file that fit in `area`, each styled by
/// `style_log_line`. Long lines are reached with the horizontal scrollbar,
/// whose content length is refreshed here from the widest line.
///
/// # Arguments
///
/// * `frame` - The frame to render onto.
/// * `app` - Application state holding the log lines and the scroll state.
/// * `area` - The `Rect` in which to render this widget.
pub fn render_log_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title("Logs (F9, scroll ← → en reportes)")
        .borders(Borders::ALL);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let max_width = app.log_content.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    app.log_horizontal_scroll_state = app.log_horizontal_scroll_state.content_length(max_width);

    // Show the newest lines that fit.
    let visible = inner_area.height.saturating_sub(1) as usize;
    let skip = app.log_content.len().saturating_sub(visible);
    let log_lines: Vec<Line> = app.log_content.iter().skip(skip).map(|l| style_log_line(l)).collect();

    let log_paragraph = Paragraph::new(log_lines).scroll((0, app.log_horizontal_scroll as u16));
    frame.render_widget(log_paragraph, inner_area);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::HorizontalBottom).thumb_symbol("■");
    let scrollbar_area = Rect {
        x: inner_area.x,
        y: inner_area.y + inner_area.height.saturating_sub(1),
        width: inner_area.width,
        height: 1,
    };
    frame.render_stateful_widget(scrollbar, scrollbar_area, &mut app.log_horizontal_scroll_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_is_split_out_of_the_message() {
        let line = style_log_line("2025-01-01 12:00:00  WARN Status poll failed");
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "WARN");
        assert_eq!(line.spans[2].content, " Status poll failed");
    }

    #[test]
    fn unexpected_lines_are_kept_whole() {
        let line = style_log_line("panic");
        assert_eq!(line.spans.len(), 1);
    }
}
