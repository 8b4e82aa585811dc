// src/app.rs

use crate::core::error::ApiError;
use crate::core::health::HealthUpdate;
use crate::core::models::{Ack, ReportContent, ReportSummary, ScanConfig, ScanType, SCRIPT_PRESETS};
use crate::core::monitor::{MonitorEvent, MonitorUpdate};
use crate::core::options;
use crate::core::session::Session;
use crate::event::{Action, AppEvent, ReportTarget};
use crate::logging;
use ratatui::widgets::{ListState, ScrollbarState};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Info and completed messages disappear after this long.
pub const STATUS_AUTO_HIDE: Duration = Duration::from_secs(5);
const LOG_REFRESH: Duration = Duration::from_secs(1);
const LOG_TAIL_LINES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Scanning,
    Completed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
    pub shown_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    /// Start request sent, waiting for the service to accept it.
    Starting,
    Scanning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Host,
    Ports,
    Scripts,
    ScanType,
    Speed,
    OsDetection,
    VersionDetection,
    Fragmentation,
    FirewallEvasion,
    ExtraArgs,
}

const BASIC_FIELDS: &[FormField] =
    &[FormField::Host, FormField::Ports, FormField::Scripts, FormField::ScanType];
const ADVANCED_FIELDS: &[FormField] = &[
    FormField::Speed,
    FormField::OsDetection,
    FormField::VersionDetection,
    FormField::Fragmentation,
    FormField::FirewallEvasion,
    FormField::ExtraArgs,
];

impl FormField {
    pub fn is_text(&self) -> bool {
        matches!(self, FormField::Host | FormField::Ports | FormField::ExtraArgs)
    }

    pub fn is_toggle(&self) -> bool {
        matches!(
            self,
            FormField::OsDetection
                | FormField::VersionDetection
                | FormField::Fragmentation
                | FormField::FirewallEvasion
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form(FormField),
    Reports,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Popup {
    ViewReport { content: ReportContent, scroll: u16 },
    ConfirmDelete { id: String, name: String },
    ConfirmClear { count: usize },
}

pub struct App {
    pub should_quit: bool,
    pub session: Arc<Session>,
    pub form: ScanConfig,
    pub show_advanced: bool,
    pub focus: Focus,
    pub phase: ScanPhase,
    /// Monitor whose events are accepted; anything else is stale.
    pub monitor_id: Option<u64>,
    pub connection: Option<HealthUpdate>,
    pub degraded: bool,
    pub status: Option<StatusLine>,
    pub last_report: Option<ReportContent>,
    pub report_scroll: u16,
    pub reports: Vec<ReportSummary>,
    pub reports_error: Option<String>,
    pub report_list_state: ListState,
    pub popup: Option<Popup>,
    pub spinner_frame: usize,
    pub show_logs: bool,
    pub log_content: Vec<String>,
    pub log_horizontal_scroll: usize,
    pub log_horizontal_scroll_state: ScrollbarState,
    last_log_refresh: Option<Instant>,
}

impl App {
    /// Creates the application state with an empty form focused on the host
    /// field and no scan running.
    ///
    /// # Arguments
    ///
    /// * `session` - Shared session state, also held by the dispatcher and the
    ///   health checker. Its reachability flag gates scan starts.
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            should_quit: false,
            session,
            form: ScanConfig::default(),
            show_advanced: false,
            focus: Focus::Form(FormField::Host),
            phase: ScanPhase::Idle,
            monitor_id: None,
            connection: None,
            degraded: false,
            status: None,
            last_report: None,
            report_scroll: 0,
            reports: Vec::new(),
            reports_error: None,
            report_list_state: ListState::default(),
            popup: None,
            spinner_frame: 0,
            show_logs: false,
            log_content: Vec::new(),
            log_horizontal_scroll: 0,
            log_horizontal_scroll_state: ScrollbarState::default(),
            last_log_refresh: None,
        }
    }

    /// Actions to run once at startup.
    pub fn init(&self) -> Vec<Action> {
        vec![Action::RefreshReports]
    }

    /// Cancels any running monitor and the health checker, then ends the loop.
    pub fn quit(&mut self) {
        self.session.shutdown();
        self.should_quit = true;
    }

    // --- Status line ---

    /// Replaces the status line. Info and completion messages hide themselves
    /// after five seconds; scanning and error messages stay until replaced.
    ///
    /// # Arguments
    ///
    /// * `kind` - Decides the color and whether the line auto-hides.
    /// * `text` - The message shown to the operator.
    pub fn show_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusLine { kind, text: text.into(), shown_at: Instant::now() });
    }

    pub fn on_tick(&mut self) {
        self.on_tick_at(Instant::now());
    }

    /// Advances time-driven state: status auto-hide, the spinner and the log
    /// panel refresh. Split from `on_tick` so tests can pass their own clock.
    pub fn on_tick_at(&mut self, now: Instant) {
        if let Some(status) = &self.status {
            let auto_hide = matches!(status.kind, StatusKind::Info | StatusKind::Completed);
            if auto_hide && now.saturating_duration_since(status.shown_at) >= STATUS_AUTO_HIDE {
                self.status = None;
            }
        }
        if self.phase != ScanPhase::Idle {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
        if self.show_logs && self.last_log_refresh.is_none_or(|t| now.saturating_duration_since(t) >= LOG_REFRESH) {
            self.log_content = logging::read_log_tail(LOG_TAIL_LINES);
            self.last_log_refresh = Some(now);
        }
    }

    pub fn connection_label(&self) -> String {
        match &self.connection {
            Some(update) => update.label(),
            None => "Verificando...".to_string(),
        }
    }

    // --- Form editing ---

    pub fn visible_fields(&self) -> Vec<FormField> {
        let mut fields = BASIC_FIELDS.to_vec();
        if self.show_advanced {
            fields.extend_from_slice(ADVANCED_FIELDS);
        }
        fields
    }

    pub fn focus_next(&mut self) {
        let fields = self.visible_fields();
        self.focus = match self.focus {
            Focus::Form(field) => match fields.iter().position(|f| *f == field) {
                Some(i) if i + 1 < fields.len() => Focus::Form(fields[i + 1]),
                _ => Focus::Reports,
            },
            Focus::Reports => Focus::Form(fields[0]),
        };
    }

    pub fn focus_prev(&mut self) {
        let fields = self.visible_fields();
        self.focus = match self.focus {
            Focus::Form(field) => match fields.iter().position(|f| *f == field) {
                Some(0) | None => Focus::Reports,
                Some(i) => Focus::Form(fields[i - 1]),
            },
            Focus::Reports => Focus::Form(fields[fields.len() - 1]),
        };
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Form(FormField::Host) => Some(&mut self.form.host),
            Focus::Form(FormField::Ports) => Some(&mut self.form.ports),
            Focus::Form(FormField::ExtraArgs) => Some(&mut self.form.extra_args),
            _ => None,
        }
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(text) = self.focused_text() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text() {
            text.pop();
        }
    }

    /// Moves a choice field (scripts, type, speed) one step.
    pub fn cycle(&mut self, forward: bool) {
        match self.focus {
            Focus::Form(FormField::Scripts) => {
                let idx = SCRIPT_PRESETS.iter().position(|s| *s == self.form.scripts);
                let len = SCRIPT_PRESETS.len();
                let next = match (idx, forward) {
                    (Some(i), true) => (i + 1) % len,
                    (Some(i), false) => (i + len - 1) % len,
                    (None, _) => 0,
                };
                self.form.scripts = SCRIPT_PRESETS[next].to_string();
            }
            Focus::Form(FormField::ScanType) => {
                let current = self.form.scan_type.unwrap_or(ScanType::Custom);
                let next = if forward { current.next() } else { current.prev() };
                self.select_scan_type(next);
            }
            Focus::Form(FormField::Speed) => {
                self.form.speed = if forward { self.form.speed.next() } else { self.form.speed.prev() };
            }
            _ => {}
        }
    }

    /// Selects a scan type and applies its preset to the form. Choosing the
    /// custom type toggles the advanced section.
    pub fn select_scan_type(&mut self, scan_type: ScanType) {
        if options::apply_preset(&mut self.form, scan_type) {
            self.show_advanced = !self.show_advanced;
        }
        debug!(scan_type = %scan_type, "Scan type selected.");
    }

    /// Preselects the scan type named in the configuration, applying its
    /// preset. An unrecognised name leaves the form without a known type, so
    /// requests carry no `tipo` and no type flags until one is picked.
    ///
    /// # Arguments
    ///
    /// * `name` - The wire name of the scan type, e.g. `basico` or `vuln`.
    pub fn apply_default_scan_type(&mut self, name: &str) {
        self.form.set_scan_type_name(name);
        match self.form.scan_type {
            Some(scan_type) => self.select_scan_type(scan_type),
            None => warn!(scan_type = name, "Unknown default scan type, none preselected."),
        }
    }

    /// Flips the focused checkbox, if the focus is on one.
    pub fn toggle(&mut self) {
        let Focus::Form(field) = self.focus else { return };
        let flag = match field {
            FormField::OsDetection => &mut self.form.os_detection,
            FormField::VersionDetection => &mut self.form.version_detection,
            FormField::Fragmentation => &mut self.form.fragmentation,
            FormField::FirewallEvasion => &mut self.form.firewall_evasion,
            _ => return,
        };
        *flag = !*flag;
    }

    pub fn toggle_advanced(&mut self) {
        self.show_advanced = !self.show_advanced;
        if let Focus::Form(field) = self.focus {
            if !self.visible_fields().contains(&field) {
                self.focus = Focus::Form(FormField::ScanType);
            }
        }
    }

    // --- Scan control ---

    /// Validates the form and asks for a scan to be started.
    ///
    /// Nothing happens while a scan is already starting or running. With the
    /// service unreachable or an empty host, an error is shown instead and no
    /// request is sent. Otherwise the phase moves to `Starting` until the
    /// acknowledgement arrives through `on_event`.
    ///
    /// # Returns
    ///
    /// A single `Action::StartScan` carrying the compiled request, or nothing.
    pub fn start_scan(&mut self) -> Vec<Action> {
        if self.phase != ScanPhase::Idle {
            return Vec::new();
        }
        if !self.session.is_api_online() {
            self.show_status(StatusKind::Error, "API no disponible");
            return Vec::new();
        }
        if self.form.host.trim().is_empty() {
            self.show_status(StatusKind::Error, "Ingresa un host válido");
            return Vec::new();
        }
        self.phase = ScanPhase::Starting;
        vec![Action::StartScan(options::build_request(&self.form))]
    }

    /// Asks the service to stop the current scan. The monitor keeps polling
    /// until the stop is acknowledged.
    pub fn stop_scan(&mut self) -> Vec<Action> {
        if self.phase == ScanPhase::Idle {
            return Vec::new();
        }
        vec![Action::StopScan]
    }

    // --- Reports ---

    /// Number of rows in the report list, including the "delete all" row
    /// offered when more than one report exists.
    pub fn report_rows(&self) -> usize {
        match self.reports.len() {
            0 => 0,
            1 => 1,
            n => n + 1,
        }
    }

    pub fn selected_report(&self) -> Option<&ReportSummary> {
        self.report_list_state.selected().and_then(|i| self.reports.get(i))
    }

    pub fn clear_all_selected(&self) -> bool {
        self.reports.len() > 1 && self.report_list_state.selected() == Some(self.reports.len())
    }

    pub fn select_next_report(&mut self) {
        let rows = self.report_rows();
        if rows == 0 {
            return;
        }
        let next = self.report_list_state.selected().map_or(0, |i| (i + 1).min(rows - 1));
        self.report_list_state.select(Some(next));
    }

    pub fn select_prev_report(&mut self) {
        if self.report_rows() == 0 {
            return;
        }
        let prev = self.report_list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.report_list_state.select(Some(prev));
    }

    pub fn refresh_reports(&mut self) -> Vec<Action> {
        self.show_status(StatusKind::Info, "Actualizando lista de reportes...");
        vec![Action::RefreshReports]
    }

    /// Enter on the report list: view the report, or ask to delete all.
    pub fn activate_selected(&mut self) -> Vec<Action> {
        if self.clear_all_selected() {
            self.request_clear_all();
            return Vec::new();
        }
        match self.selected_report() {
            Some(report) => vec![Action::FetchReport {
                id: report.key().to_string(),
                target: ReportTarget::Popup,
            }],
            None => Vec::new(),
        }
    }

    /// Downloads the selected report into the configured directory.
    pub fn download_selected(&mut self) -> Vec<Action> {
        match self.selected_report() {
            Some(report) => vec![Action::DownloadReport { id: report.key().to_string() }],
            None => Vec::new(),
        }
    }

    /// Opens the confirmation popup for deleting the selected report.
    /// Nothing is deleted until `confirm_popup` is called.
    pub fn request_delete_selected(&mut self) {
        if let Some(report) = self.selected_report() {
            self.popup = Some(Popup::ConfirmDelete {
                id: report.key().to_string(),
                name: report.name.clone(),
            });
        }
    }

    pub fn request_clear_all(&mut self) {
        if self.reports.len() > 1 {
            self.popup = Some(Popup::ConfirmClear { count: self.reports.len() });
        }
    }

    pub fn export(&mut self) -> Vec<Action> {
        vec![Action::ExportReports]
    }

    /// Answers "yes" to the open popup and closes it.
    ///
    /// # Returns
    ///
    /// The delete or clear action the popup was asking about. The report
    /// viewer has nothing to confirm and just closes.
    pub fn confirm_popup(&mut self) -> Vec<Action> {
        match self.popup.take() {
            Some(Popup::ConfirmDelete { id, name }) => vec![Action::DeleteReport { id, name }],
            Some(Popup::ConfirmClear { .. }) => vec![Action::ClearReports],
            Some(Popup::ViewReport { .. }) | None => Vec::new(),
        }
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    pub fn scroll_up(&mut self) {
        match &mut self.popup {
            Some(Popup::ViewReport { scroll, .. }) => *scroll = scroll.saturating_sub(1),
            _ => self.report_scroll = self.report_scroll.saturating_sub(1),
        }
    }

    pub fn scroll_down(&mut self) {
        match &mut self.popup {
            Some(Popup::ViewReport { scroll, .. }) => *scroll = scroll.saturating_add(1),
            _ => self.report_scroll = self.report_scroll.saturating_add(1),
        }
    }

    /// Shows or hides the log panel; the tail is reloaded on the next tick.
    pub fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
        self.last_log_refresh = None;
    }

    pub fn scroll_logs_left(&mut self) {
        self.log_horizontal_scroll = self.log_horizontal_scroll.saturating_sub(4);
        self.log_horizontal_scroll_state =
            self.log_horizontal_scroll_state.position(self.log_horizontal_scroll);
    }

    pub fn scroll_logs_right(&mut self) {
        self.log_horizontal_scroll = self.log_horizontal_scroll.saturating_add(4);
        self.log_horizontal_scroll_state =
            self.log_horizontal_scroll_state.position(self.log_horizontal_scroll);
    }

    // --- Background results ---

    /// Applies the result of a background task to the state.
    ///
    /// Monitor updates carrying an id other than the current monitor's are
    /// dropped, so a cancelled monitor can never touch a newer scan.
    ///
    /// # Arguments
    ///
    /// * `event` - A result sent back by the dispatcher, the monitor or the
    ///   health checker.
    ///
    /// # Returns
    ///
    /// Follow-up actions, such as fetching the report of a completed scan or
    /// refreshing the list after a delete.
    pub fn on_event(&mut self, event: AppEvent) -> Vec<Action> {
        match event {
            AppEvent::Health(update) => {
                self.connection = Some(update);
                Vec::new()
            }
            AppEvent::Monitor(update) => self.on_monitor(update),
            AppEvent::ScanStarted(result) => self.on_scan_started(result),
            AppEvent::ScanStopped(result) => {
                match result {
                    Ok(_) => {
                        self.session.stop_monitor();
                        self.monitor_id = None;
                        self.phase = ScanPhase::Idle;
                        self.show_status(StatusKind::Info, "Escaneo detenido");
                    }
                    Err(e) => self.show_error("Error al detener escaneo", &e),
                }
                Vec::new()
            }
            AppEvent::ReportLoaded { target, result } => {
                match result {
                    Ok(content) => match target {
                        ReportTarget::LastReport => {
                            self.last_report = Some(content);
                            self.report_scroll = 0;
                        }
                        ReportTarget::Popup => {
                            self.popup = Some(Popup::ViewReport { content, scroll: 0 });
                        }
                    },
                    Err(ApiError::Rejected(message)) => self.show_status(
                        StatusKind::Error,
                        format!("Error al cargar el reporte: {}", message),
                    ),
                    Err(e) => self.show_error("Error al obtener reporte", &e),
                }
                Vec::new()
            }
            AppEvent::ReportsLoaded(result) => {
                match result {
                    Ok(reports) => {
                        self.reports = reports;
                        self.reports_error = None;
                    }
                    Err(e) => {
                        self.reports.clear();
                        self.reports_error = Some(format!("Error al cargar reportes: {}", e));
                    }
                }
                self.clamp_report_selection();
                Vec::new()
            }
            AppEvent::ReportDeleted { name, result } => match result {
                Ok(ack) => {
                    self.show_status(StatusKind::Completed, ack.message.unwrap_or_default());
                    if self.last_report.as_ref().is_some_and(|r| r.name == name) {
                        self.last_report = None;
                    }
                    vec![Action::RefreshReports]
                }
                Err(e) => {
                    self.show_error("Error al eliminar reporte", &e);
                    Vec::new()
                }
            },
            AppEvent::ReportsCleared(result) => match result {
                Ok(ack) => {
                    self.show_status(StatusKind::Completed, ack.message.unwrap_or_default());
                    self.last_report = None;
                    vec![Action::RefreshReports]
                }
                Err(e) => {
                    self.show_error("Error al limpiar reportes", &e);
                    Vec::new()
                }
            },
            AppEvent::Downloaded(result) => {
                match result {
                    Ok(path) => self.show_status(
                        StatusKind::Completed,
                        format!("Reporte guardado en {}", path.display()),
                    ),
                    Err(e) => self.show_error("Error al descargar reporte", &e),
                }
                Vec::new()
            }
            AppEvent::Exported(result) => {
                match result {
                    Ok(path) => self.show_status(
                        StatusKind::Completed,
                        format!("Reportes exportados a {}", path.display()),
                    ),
                    Err(e) => self.show_error("Error al exportar", &e),
                }
                Vec::new()
            }
        }
    }

    fn on_scan_started(&mut self, result: Result<Ack, ApiError>) -> Vec<Action> {
        match result {
            Ok(_) => {
                let handle = self.session.arm_monitor();
                self.monitor_id = Some(handle.id());
                self.phase = ScanPhase::Scanning;
                self.degraded = false;
                self.show_status(StatusKind::Info, "Escaneo iniciado correctamente");
                info!(monitor_id = handle.id(), "Scan accepted, monitoring progress.");
                vec![Action::Monitor(handle)]
            }
            Err(e) => {
                self.phase = ScanPhase::Idle;
                self.show_error("Error al iniciar escaneo", &e);
                Vec::new()
            }
        }
    }

    fn on_monitor(&mut self, update: MonitorUpdate) -> Vec<Action> {
        if self.monitor_id != Some(update.monitor_id) {
            debug!(monitor_id = update.monitor_id, "Dropping event from a replaced monitor.");
            return Vec::new();
        }
        match update.event {
            MonitorEvent::Progress(message) => {
                self.phase = ScanPhase::Scanning;
                self.show_status(StatusKind::Scanning, message);
                Vec::new()
            }
            MonitorEvent::Completed { report_id, message } => {
                self.finish_scan();
                self.show_status(
                    StatusKind::Completed,
                    message.unwrap_or_else(|| "Escaneo completado".to_string()),
                );
                vec![
                    Action::FetchReport { id: report_id, target: ReportTarget::LastReport },
                    Action::RefreshReports,
                ]
            }
            MonitorEvent::Failed(message) => {
                self.finish_scan();
                self.show_status(StatusKind::Error, message);
                Vec::new()
            }
            MonitorEvent::Stopped => {
                self.finish_scan();
                Vec::new()
            }
            MonitorEvent::Degraded { failures } => {
                self.degraded = true;
                self.show_status(
                    StatusKind::Error,
                    format!("Conectividad degradada: {} consultas de estado fallidas", failures),
                );
                Vec::new()
            }
            MonitorEvent::Recovered => {
                self.degraded = false;
                Vec::new()
            }
        }
    }

    fn finish_scan(&mut self) {
        self.monitor_id = None;
        self.phase = ScanPhase::Idle;
        self.degraded = false;
    }

    /// Application rejections are shown verbatim; anything else gets context.
    fn show_error(&mut self, context: &str, error: &ApiError) {
        let text = match error {
            ApiError::Rejected(message) => message.clone(),
            other => format!("{}: {}", context, other),
        };
        self.show_status(StatusKind::Error, text);
    }

    fn clamp_report_selection(&mut self) {
        let rows = self.report_rows();
        match (rows, self.report_list_state.selected()) {
            (0, _) => self.report_list_state.select(None),
            (_, None) => self.report_list_state.select(Some(0)),
            (n, Some(i)) if i >= n => self.report_list_state.select(Some(n - 1)),
            _ => {}
        }
    }
}
