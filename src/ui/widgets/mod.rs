// src/ui/widgets/mod.rs

// One module per screen region. Each exposes a `render_*` function taking
// the frame, the application state and the area to draw into.

pub mod footer;
pub mod form;
pub mod header;
pub mod log_view;
pub mod popup;
pub mod report_list;
pub mod report_view;
pub mod status_bar;
