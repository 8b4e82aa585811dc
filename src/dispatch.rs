// src/dispatch.rs

use crate::core::api::ApiClient;
use crate::core::monitor::{MonitorSettings, StatusMonitor};
use crate::core::session::Session;
use crate::event::{Action, AppEvent};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Runs [`Action`]s on background tasks and reports their outcome to the UI
/// loop as [`AppEvent`]s. The UI thread never waits on the network.
#[derive(Clone)]
pub struct Dispatcher {
    api: ApiClient,
    session: Arc<Session>,
    tx: mpsc::Sender<AppEvent>,
    settings: MonitorSettings,
    download_dir: PathBuf,
}

impl Dispatcher {
    pub fn new(
        api: ApiClient,
        session: Arc<Session>,
        tx: mpsc::Sender<AppEvent>,
        settings: MonitorSettings,
        download_dir: PathBuf,
    ) -> Self {
        Self { api, session, tx, settings, download_dir }
    }

    pub fn dispatch_all(&self, actions: Vec<Action>) {
        for action in actions {
            self.dispatch(action);
        }
    }

    pub fn dispatch(&self, action: Action) -> JoinHandle<()> {
        debug!(?action, "Dispatching action.");
        if let Action::Monitor(handle) = action {
            let monitor = StatusMonitor::new(self.api.clone(), self.session.clone(), handle, self.settings);
            let task = monitor.spawn(self.tx.clone());
            return tokio::spawn(async move {
                match task.await {
                    Ok(state) => debug!(?state, "Monitor task finished."),
                    Err(e) => error!(error = %e, "Monitor task ended abnormally."),
                }
            });
        }

        let api = self.api.clone();
        let tx = self.tx.clone();
        let download_dir = self.download_dir.clone();
        tokio::spawn(async move {
            let event = match action {
                Action::StartScan(request) => AppEvent::ScanStarted(api.start_scan(&request).await),
                Action::StopScan => AppEvent::ScanStopped(api.stop_scan().await),
                Action::FetchReport { id, target } => {
                    let result = api.report_content(&id).await;
                    AppEvent::ReportLoaded { target, result }
                }
                Action::RefreshReports => AppEvent::ReportsLoaded(api.list_reports().await),
                Action::DownloadReport { id } => {
                    AppEvent::Downloaded(api.download_report(&id, &download_dir).await)
                }
                Action::DeleteReport { id, name } => {
                    let result = api.delete_report(&id).await;
                    AppEvent::ReportDeleted { name, result }
                }
                Action::ClearReports => AppEvent::ReportsCleared(api.clear_reports().await),
                Action::ExportReports => {
                    let today = chrono::Local::now().date_naive();
                    AppEvent::Exported(api.export_reports(&download_dir, today).await)
                }
                Action::Monitor(_) => return,
            };
            if tx.send(event).await.is_err() {
                debug!("UI loop gone, dropping result.");
            }
        })
    }
}

