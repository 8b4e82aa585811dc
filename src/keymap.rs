// src/keymap.rs

use crate::app::{App, Focus, Popup};
use crate::event::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Maps a key press to state changes and the actions they trigger.
///
/// Global keys (function keys, Tab, paging, quit) are handled first; the
/// rest depends on whether a popup is open and which panel has focus.
/// Letter shortcuts accept either case.
///
/// # Arguments
/// * `app` - The application state to update.
/// * `key` - The key press read from the terminal.
///
/// # Returns
/// The side effects the dispatcher should run, often none.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Vec<Action> {
    if key.code == KeyCode::F(10)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        app.quit();
        return Vec::new();
    }

    if app.popup.is_some() {
        return handle_popup_input(app, key.code);
    }

    match key.code {
        KeyCode::F(2) => return app.refresh_reports(),
        KeyCode::F(3) => return app.export(),
        KeyCode::F(4) => {
            app.toggle_advanced();
            return Vec::new();
        }
        KeyCode::F(5) => return app.start_scan(),
        KeyCode::F(6) => return app.stop_scan(),
        KeyCode::F(9) => {
            app.toggle_logs();
            return Vec::new();
        }
        KeyCode::Tab => {
            app.focus_next();
            return Vec::new();
        }
        KeyCode::BackTab => {
            app.focus_prev();
            return Vec::new();
        }
        KeyCode::PageUp => {
            app.scroll_up();
            return Vec::new();
        }
        KeyCode::PageDown => {
            app.scroll_down();
            return Vec::new();
        }
        _ => {}
    }

    match app.focus {
        Focus::Form(field) => match key.code {
            KeyCode::Enter => app.start_scan(),
            KeyCode::Up => {
                app.focus_prev();
                Vec::new()
            }
            KeyCode::Down => {
                app.focus_next();
                Vec::new()
            }
            KeyCode::Left => {
                app.cycle(false);
                Vec::new()
            }
            KeyCode::Right => {
                app.cycle(true);
                Vec::new()
            }
            KeyCode::Char(' ') if field.is_toggle() => {
                app.toggle();
                Vec::new()
            }
            KeyCode::Char(c) => {
                app.input_char(c);
                Vec::new()
            }
            KeyCode::Backspace => {
                app.backspace();
                Vec::new()
            }
            _ => Vec::new(),
        },
        Focus::Reports => match key.code {
            KeyCode::Up => {
                app.select_prev_report();
                Vec::new()
            }
            KeyCode::Down => {
                app.select_next_report();
                Vec::new()
            }
            KeyCode::Left => {
                app.scroll_logs_left();
                Vec::new()
            }
            KeyCode::Right => {
                app.scroll_logs_right();
                Vec::new()
            }
            KeyCode::Enter | KeyCode::Char('v' | 'V') => app.activate_selected(),
            KeyCode::Char('d' | 'D') => app.download_selected(),
            KeyCode::Char('x' | 'X') => {
                app.request_delete_selected();
                Vec::new()
            }
            KeyCode::Char('c' | 'C') => {
                app.request_clear_all();
                Vec::new()
            }
            KeyCode::Char('q' | 'Q') => {
                app.quit();
                Vec::new()
            }
            _ => Vec::new(),
        },
    }
}

fn handle_popup_input(app: &mut App, key_code: KeyCode) -> Vec<Action> {
    let viewing = matches!(app.popup, Some(Popup::ViewReport { .. }));
    match key_code {
        KeyCode::Esc => {
            app.close_popup();
            Vec::new()
        }
        KeyCode::Up if viewing => {
            app.scroll_up();
            Vec::new()
        }
        KeyCode::Down if viewing => {
            app.scroll_down();
            Vec::new()
        }
        KeyCode::Enter | KeyCode::Char('q' | 'Q') if viewing => {
            app.close_popup();
            Vec::new()
        }
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => app.confirm_popup(),
        KeyCode::Char('n' | 'N') => {
            app.close_popup();
            Vec::new()
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ReportSummary;
    use crate::core::session::Session;
    use crate::event::AppEvent;
    use std::sync::Arc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_reports(ids: &[&str]) -> App {
        let mut app = App::new(Arc::new(Session::new()));
        let reports = ids
            .iter()
            .map(|id| ReportSummary { id: id.to_string(), name: format!("reporte_{id}"), ..Default::default() })
            .collect();
        app.on_event(AppEvent::ReportsLoaded(Ok(reports)));
        app.focus = Focus::Reports;
        app
    }

    #[test]
    fn report_shortcuts_accept_both_cases() {
        for key in ['d', 'D'] {
            let mut app = app_with_reports(&["a"]);
            assert_eq!(handle_key(&mut app, press(KeyCode::Char(key))), vec![Action::DownloadReport { id: "a".into() }]);
        }
        for key in ['x', 'X'] {
            let mut app = app_with_reports(&["a"]);
            handle_key(&mut app, press(KeyCode::Char(key)));
            assert!(matches!(app.popup, Some(Popup::ConfirmDelete { .. })), "key {key}");
        }
        for key in ['c', 'C'] {
            let mut app = app_with_reports(&["a", "b"]);
            handle_key(&mut app, press(KeyCode::Char(key)));
            assert_eq!(app.popup, Some(Popup::ConfirmClear { count: 2 }), "key {key}");
        }
        for key in ['q', 'Q'] {
            let mut app = app_with_reports(&[]);
            handle_key(&mut app, press(KeyCode::Char(key)));
            assert!(app.should_quit, "key {key}");
        }
    }

    #[test]
    fn letters_in_the_form_are_typed_not_shortcuts() {
        let mut app = App::new(Arc::new(Session::new()));
        for c in "Dx.q".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        assert_eq!(app.form.host, "Dx.q");
        assert!(!app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let mut app = app_with_reports(&["a", "b"]);
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        assert!(app.popup.is_none());
    }

    #[test]
    fn confirmation_popup_takes_y_or_n() {
        let mut app = app_with_reports(&["a"]);
        handle_key(&mut app, press(KeyCode::Char('x')));
        assert!(handle_key(&mut app, press(KeyCode::Char('N'))).is_empty());
        assert!(app.popup.is_none());

        handle_key(&mut app, press(KeyCode::Char('x')));
        assert_eq!(
            handle_key(&mut app, press(KeyCode::Char('Y'))),
            vec![Action::DeleteReport { id: "a".into(), name: "reporte_a".into() }]
        );
    }
}
