// src/ui/mod.rs

use crate::app::App;
use ratatui::prelude::*;

mod layout;
mod widgets;

pub fn render(app: &mut App, frame: &mut Frame) {
    let layout = layout::create_layout(frame.area(), app.show_logs);

    widgets::header::render_header(frame, app, layout.header);
    widgets::form::render_form(frame, app, layout.form);
    widgets::report_view::render_report_view(frame, app, layout.report);
    widgets::report_list::render_report_list(frame, app, layout.reports);
    widgets::status_bar::render_status_bar(frame, app, layout.status);
    widgets::footer::render_footer(frame, app, layout.footer);

    if app.show_logs {
        widgets::log_view::render_log_view(frame, app, layout.log_panel);
    }

    // Popups go last so they cover everything else.
    widgets::popup::render_popup(frame, app, frame.area());
}
